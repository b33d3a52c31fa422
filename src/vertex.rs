//! # Vertex Module
//!
//! GPU-side vertex layout shared by every mesh and line in the lessons.
//!
//! A [`Geometry`] stores its attributes in separate arrays (positions,
//! normals, texture coordinates, line distances) so that builders can fill
//! them independently. Before upload they are interleaved into [`Vertex`]
//! records; attributes a geometry does not carry (lines have no normals,
//! triangle meshes have no line distances) are zero-filled so one pipeline
//! layout serves both.
//!
//! ## Shader locations
//!
//! | location | attribute       | format    |
//! |----------|-----------------|-----------|
//! | 0        | `position`      | Float32x3 |
//! | 1        | `normal`        | Float32x3 |
//! | 2        | `uv`            | Float32x2 |
//! | 3        | `line_distance` | Float32   |

use crate::geometry::Geometry;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Distance along the polyline from its first point, for dashing.
    pub line_distance: f32,
}

impl Vertex {
    /// Attribute layout matching the table in the module docs.
    pub fn vertex_attributes() -> Vec<wgpu::VertexAttribute> {
        wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Float32
        ]
        .to_vec()
    }

    pub fn description(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }

    /// Interleaves the attribute arrays of `geometry`.
    pub fn interleave(geometry: &Geometry) -> Vec<Vertex> {
        geometry
            .positions
            .iter()
            .enumerate()
            .map(|(index, position)| Vertex {
                position: *position,
                normal: geometry.normals.get(index).copied().unwrap_or_default(),
                uv: geometry.uvs.get(index).copied().unwrap_or_default(),
                line_distance: geometry
                    .line_distances
                    .get(index)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Topology;
    use nalgebra_glm as glm;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 9 * 4);
        let attributes = Vertex::vertex_attributes();
        assert_eq!(attributes.len(), 4);
        assert_eq!(attributes[3].offset, 8 * 4);
    }

    #[test]
    fn missing_attributes_are_zero_filled() {
        let mut line = Geometry::polyline(
            &[glm::vec3(0.0, 0.0, 0.0), glm::vec3(3.0, 4.0, 0.0)],
            Topology::LineStrip,
        );
        line.compute_line_distances();
        let vertices = Vertex::interleave(&line);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].normal, [0.0; 3]);
        assert!((vertices[1].line_distance - 5.0).abs() < 1e-6);
    }

    #[test]
    fn mesh_attributes_are_carried() {
        let plane = Geometry::plane(2.0, 2.0);
        let vertices = Vertex::interleave(&plane);
        assert_eq!(vertices.len(), plane.vertex_count());
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
