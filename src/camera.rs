//! Viewpoint and projection.
//!
//! Cameras use a right-handed world (Y up, looking down -Z by default) and
//! project to `wgpu`'s `[0, 1]` depth range.

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

/// How the camera maps view space to clip space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    Perspective {
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    pub fn perspective(fov_y_degrees: f32) -> Self {
        Projection::Perspective {
            fov_y_degrees,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::perspective(75.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub position: glm::Vec3,
    /// Point the camera faces. `None` keeps the default orientation, looking
    /// straight down -Z from wherever the camera sits.
    pub look_at: Option<glm::Vec3>,
    pub up: glm::Vec3,
    /// Width over height of the surface the camera renders into.
    pub aspect: f32,
}

impl Camera {
    pub fn new(projection: Projection, position: glm::Vec3, aspect: f32) -> Self {
        Self {
            projection,
            position,
            look_at: None,
            up: glm::Vec3::y(),
            aspect,
        }
    }

    /// Unit vector the camera looks along.
    pub fn direction(&self) -> glm::Vec3 {
        let forward = -glm::Vec3::z();
        match self.look_at {
            Some(target) => {
                let delta = target - self.position;
                if delta.norm_squared() <= f32::EPSILON {
                    forward
                } else {
                    delta.normalize()
                }
            }
            None => forward,
        }
    }

    pub fn view(&self) -> glm::Mat4 {
        glm::look_at_rh(&self.position, &(self.position + self.direction()), &self.up)
    }

    pub fn projection_matrix(&self) -> glm::Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y_degrees,
                near,
                far,
            } => glm::perspective_rh_zo(self.aspect, fov_y_degrees.to_radians(), near, far),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
            } => glm::ortho_rh_zo(left, right, bottom, top, near, far),
        }
    }

    pub fn view_projection(&self) -> glm::Mat4 {
        self.projection_matrix() * self.view()
    }

    /// Projects a world-space point to normalized device coordinates.
    pub fn project(&self, point: &glm::Vec3) -> glm::Vec3 {
        let clip = self.view_projection() * glm::vec4(point.x, point.y, point.z, 1.0);
        glm::vec3(clip.x, clip.y, clip.z) / clip.w
    }

    /// Casts a ray through `ndc` (x right, y up, both in `-1..=1`) and
    /// returns where it crosses the `z = 0` plane, or `None` when the ray
    /// runs parallel to that plane.
    pub fn ndc_to_plane_z0(&self, ndc: glm::Vec2) -> Option<glm::Vec3> {
        let inverse = self.view_projection().try_inverse()?;
        let unproject = |depth: f32| {
            let p = inverse * glm::vec4(ndc.x, ndc.y, depth, 1.0);
            glm::vec3(p.x, p.y, p.z) / p.w
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        let dz = far.z - near.z;
        if dz.abs() <= f32::EPSILON {
            return None;
        }
        let t = -near.z / dz;
        Some(near + (far - near) * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: glm::Vec3, b: glm::Vec3) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn perspective_camera_centers_origin() {
        let camera = Camera::new(Projection::default(), glm::vec3(0.0, 0.0, 3.0), 500.0 / 400.0);
        let ndc = camera.project(&glm::Vec3::zeros());
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn orthographic_unprojection_spans_the_frustum() {
        let camera = Camera::new(
            Projection::Orthographic {
                left: -3.0,
                right: 3.0,
                top: 2.0,
                bottom: -2.0,
                near: 0.1,
                far: 10.0,
            },
            glm::vec3(0.0, 0.0, 5.0),
            500.0 / 300.0,
        );
        let corner = camera.ndc_to_plane_z0(glm::vec2(1.0, 1.0)).unwrap();
        assert!(close(corner, glm::vec3(3.0, 2.0, 0.0)));
        let other = camera.ndc_to_plane_z0(glm::vec2(-1.0, -1.0)).unwrap();
        assert!(close(other, glm::vec3(-3.0, -2.0, 0.0)));
        let center = camera.ndc_to_plane_z0(glm::vec2(0.0, 0.0)).unwrap();
        assert!(close(center, glm::Vec3::zeros()));
    }

    #[test]
    fn degenerate_look_at_falls_back_to_forward() {
        let mut camera = Camera::new(Projection::default(), glm::Vec3::zeros(), 1.0);
        camera.look_at = Some(glm::Vec3::zeros());
        assert!(close(camera.direction(), -glm::Vec3::z()));
    }

    #[test]
    fn looking_away_puts_origin_behind() {
        let mut camera = Camera::new(Projection::default(), glm::vec3(0.0, 0.0, 3.0), 1.0);
        camera.look_at = Some(glm::vec3(0.0, 0.0, 100.0));
        let clip = camera.view_projection() * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w < 0.0);
    }
}
