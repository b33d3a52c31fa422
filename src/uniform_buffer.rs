//! # Per-object uniforms
//!
//! Everything the mesh shader needs to shade one draw: transforms, the
//! material's parameters and the scene's lights. The layout mirrors the
//! `Object` struct in `mesh.wgsl`; every member is a `mat4x4` or a 16-byte
//! vector so that the Rust and WGSL layouts agree without manual padding.

use nalgebra_glm as glm;

use crate::camera::Camera;
use crate::material::{Material, MaterialKind};
use crate::scene::Light;

/// Directional lights beyond this count are ignored by the shader.
pub const MAX_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Default, Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub mvp: glm::Mat4,
    pub model: glm::Mat4,
    /// Inverse transpose of `model`, for normals.
    pub normal_matrix: glm::Mat4,
    pub view: glm::Mat4,
    pub color: [f32; 4],
    pub camera_position: [f32; 4],
    /// Summed ambient light, rgb premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Unit vectors pointing toward each light.
    pub light_directions: [[f32; 4]; MAX_LIGHTS],
    pub light_colors: [[f32; 4]; MAX_LIGHTS],
    /// `shininess, roughness, metalness, opacity`
    pub surface: [f32; 4],
    /// `dash_size, gap_size, dashed, _`
    pub dash: [f32; 4],
    /// `shading, has_map, light_count, _`
    pub mode: [u32; 4],
}

impl ObjectUniforms {
    pub fn new(
        camera: &Camera,
        model: glm::Mat4,
        material: &Material,
        lights: &[Light],
        has_map: bool,
    ) -> Self {
        let view = camera.view();
        let normal_matrix = model
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(glm::Mat4::identity);
        let position = camera.position;

        let mut uniforms = Self {
            mvp: camera.projection_matrix() * view * model,
            model,
            normal_matrix,
            view,
            color: material.color.to_array(),
            camera_position: [position.x, position.y, position.z, 1.0],
            ..Self::default()
        };
        let light_count = uniforms.apply_lights(lights);

        let (shininess, roughness, metalness) = match material.kind {
            MaterialKind::Phong { shininess } => (shininess, 1.0, 0.0),
            MaterialKind::Standard {
                roughness,
                metalness,
            } => (30.0, roughness, metalness),
            _ => (30.0, 1.0, 0.0),
        };
        uniforms.surface = [shininess, roughness, metalness, material.opacity];
        if let MaterialKind::LineDashed {
            dash_size,
            gap_size,
        } = material.kind
        {
            uniforms.dash = [dash_size, gap_size, 1.0, 0.0];
        }
        uniforms.mode = [material.shading_code(), u32::from(has_map), light_count, 0];
        uniforms
    }

    /// Packs `lights` and returns how many directional lights were kept.
    fn apply_lights(&mut self, lights: &[Light]) -> u32 {
        let mut ambient = glm::Vec3::zeros();
        let mut count = 0;
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    let c = color.scaled(intensity);
                    ambient += glm::vec3(c.r, c.g, c.b);
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } => {
                    if count == MAX_LIGHTS || position.norm_squared() <= f32::EPSILON {
                        continue;
                    }
                    let toward = position.normalize();
                    let c = color.scaled(intensity);
                    self.light_directions[count] = [toward.x, toward.y, toward.z, 0.0];
                    self.light_colors[count] = [c.r, c.g, c.b, 1.0];
                    count += 1;
                }
            }
        }
        self.ambient = [ambient.x, ambient.y, ambient.z, 1.0];
        count as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use crate::color::{Color, PURPLE};

    fn camera() -> Camera {
        Camera::new(Projection::default(), glm::vec3(0.0, 0.0, 3.0), 1.0)
    }

    #[test]
    fn layout_is_a_multiple_of_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<ObjectUniforms>() % 16, 0);
    }

    #[test]
    fn lights_are_split_into_ambient_and_directional() {
        let lights = [
            Light::ambient(0.4),
            Light::directional(1.5, glm::vec3(0.0, 2.0, 0.0)),
        ];
        let uniforms = ObjectUniforms::new(
            &camera(),
            glm::Mat4::identity(),
            &Material::standard(PURPLE),
            &lights,
            false,
        );
        assert_eq!(uniforms.mode[2], 1);
        assert_eq!(uniforms.light_directions[0], [0.0, 1.0, 0.0, 0.0]);
        assert!((uniforms.ambient[0] - 0.4).abs() < 1e-6);
        assert!((uniforms.light_colors[0][1] - 1.5).abs() < 1e-6);
    }

    #[test]
    fn directional_lights_are_capped() {
        let lights = vec![Light::directional(1.0, glm::vec3(1.0, 0.0, 0.0)); MAX_LIGHTS + 2];
        let uniforms = ObjectUniforms::new(
            &camera(),
            glm::Mat4::identity(),
            &Material::lambert(Color::WHITE),
            &lights,
            false,
        );
        assert_eq!(uniforms.mode[2], MAX_LIGHTS as u32);
    }

    #[test]
    fn dashed_lines_carry_their_pattern() {
        let uniforms = ObjectUniforms::new(
            &camera(),
            glm::Mat4::identity(),
            &Material::dashed(Color::WHITE, 0.2, 0.1),
            &[],
            false,
        );
        assert_eq!(uniforms.dash, [0.2, 0.1, 1.0, 0.0]);
        assert_eq!(uniforms.mode[0], 0);
    }
}
