//! # Geometry
//!
//! Shape descriptions for everything the lessons draw: solid primitives
//! (box, sphere, torus, cylinder, cone, plane), helper line sets (grids), and
//! polylines built from point sequences.
//!
//! A [`Geometry`] is plain CPU data. It knows nothing about buffers; the GPU
//! mirror in `gpu_scene` turns it into vertex and index buffers when the
//! geometry first becomes visible and destroys those buffers when the
//! geometry is released from the scene's resource arena.
//!
//! The solid builders follow the conventions used by most scene-graph
//! libraries: Y is up, front faces wind counter-clockwise, and texture
//! coordinates put `(0, 0)` at the bottom-left.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use nalgebra_glm::Vec3;

/// How the index list of a [`Geometry`] is interpreted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// Every three indices form a triangle.
    #[default]
    Triangles,
    /// Every two indices form an independent segment.
    Lines,
    /// Consecutive indices are connected.
    LineStrip,
    /// Like [`Topology::LineStrip`] with the last point joined to the first.
    LineLoop,
}

impl Topology {
    pub fn is_line(&self) -> bool {
        !matches!(self, Topology::Triangles)
    }
}

/// Vertex data of a renderable object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Cumulative distance along the line, used for dashing. Empty until
    /// [`Geometry::compute_line_distances`] runs.
    pub line_distances: Vec<f32>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Geometry {
    /// An axis-aligned box centered at the origin.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let size = [width, height, depth];
        // (normal, u axis, v axis) with u x v == normal so each face winds CCW.
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let half_along = |axis: [f32; 3]| {
            (axis[0].abs() * size[0] + axis[1].abs() * size[1] + axis[2].abs() * size[2]) * 0.5
        };

        let mut geometry = Geometry::default();
        for (normal, u, v) in faces {
            let (hn, hu, hv) = (half_along(normal), half_along(u), half_along(v));
            let base = geometry.positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let corner: [f32; 3] = std::array::from_fn(|k| {
                    normal[k] * hn + u[k] * hu * su + v[k] * hv * sv
                });
                geometry.positions.push(corner);
                geometry.normals.push(normal);
                geometry.uvs.push([(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
            }
            geometry
                .indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        geometry
    }

    /// A UV sphere.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let mut geometry = Geometry::default();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let normal = [
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                ];
                geometry
                    .positions
                    .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
                geometry.normals.push(normal);
                geometry.uvs.push([u, 1.0 - v]);
            }
        }

        let stride = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;
                if iy != 0 {
                    geometry.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    geometry.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }
        geometry
    }

    /// A torus lying in the XY plane.
    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let tubular_segments = tubular_segments.max(3);
        let mut geometry = Geometry::default();

        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * TAU;
                let v = j as f32 / radial_segments as f32 * TAU;
                let position = Vec3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = (position - center).normalize();
                geometry.positions.push(position.into());
                geometry.normals.push(normal.into());
                geometry.uvs.push([
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ]);
            }
        }

        let stride = tubular_segments + 1;
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = stride * j + i - 1;
                let b = stride * (j - 1) + i - 1;
                let c = stride * (j - 1) + i;
                let d = stride * j + i;
                geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }
        geometry
    }

    /// A capped cylinder (or frustum) along the Y axis.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let radial_segments = radial_segments.max(3);
        let half_height = height * 0.5;
        let slope = (radius_bottom - radius_top) / height;
        let mut geometry = Geometry::default();

        // Side wall: two rings, top (y = 0) and bottom (y = 1).
        for y in 0..=1u32 {
            let v = y as f32;
            let radius = v * (radius_bottom - radius_top) + radius_top;
            for x in 0..=radial_segments {
                let u = x as f32 / radial_segments as f32;
                let theta = u * TAU;
                let (sin, cos) = theta.sin_cos();
                geometry
                    .positions
                    .push([radius * sin, -v * height + half_height, radius * cos]);
                geometry
                    .normals
                    .push(Vec3::new(sin, slope, cos).normalize().into());
                geometry.uvs.push([u, 1.0 - v]);
            }
        }
        let stride = radial_segments + 1;
        for x in 0..radial_segments {
            let a = x;
            let b = stride + x;
            let c = stride + x + 1;
            let d = x + 1;
            geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }

        if radius_top > 0.0 {
            geometry.push_cap(radius_top, half_height, radial_segments, true);
        }
        if radius_bottom > 0.0 {
            geometry.push_cap(radius_bottom, half_height, radial_segments, false);
        }
        geometry
    }

    /// A cone with its apex pointing up +Y.
    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self::cylinder(0.0, radius, height, radial_segments)
    }

    /// A plane in XY facing +Z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Geometry {
            positions: vec![[-hw, hh, 0.0], [hw, hh, 0.0], [-hw, -hh, 0.0], [hw, -hh, 0.0]],
            normals: vec![[0.0, 0.0, 1.0]; 4],
            uvs: vec![[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            line_distances: Vec::new(),
            indices: vec![0, 2, 1, 2, 3, 1],
            topology: Topology::Triangles,
        }
    }

    /// A square grid in the XZ plane, returned as `(center_lines, grid_lines)`
    /// so the two can be given different colors.
    pub fn grid(size: f32, divisions: u32) -> (Self, Self) {
        let divisions = divisions.max(1);
        let step = size / divisions as f32;
        let half = size * 0.5;
        let center = divisions / 2;

        let mut center_points = Vec::new();
        let mut grid_points = Vec::new();
        for i in 0..=divisions {
            let k = -half + i as f32 * step;
            let target = if i == center && divisions % 2 == 0 {
                &mut center_points
            } else {
                &mut grid_points
            };
            target.extend_from_slice(&[
                Vec3::new(-half, 0.0, k),
                Vec3::new(half, 0.0, k),
                Vec3::new(k, 0.0, -half),
                Vec3::new(k, 0.0, half),
            ]);
        }
        (
            Self::polyline(&center_points, Topology::Lines),
            Self::polyline(&grid_points, Topology::Lines),
        )
    }

    /// Line geometry through `points` in order.
    pub fn polyline(points: &[Vec3], topology: Topology) -> Self {
        Geometry {
            positions: points.iter().map(|p| [p.x, p.y, p.z]).collect(),
            normals: vec![[0.0; 3]; points.len()],
            uvs: vec![[0.0; 2]; points.len()],
            line_distances: Vec::new(),
            indices: (0..points.len() as u32).collect(),
            topology,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Fills [`Geometry::line_distances`] with the distance travelled along
    /// the line up to each vertex. Independent segments each start where the
    /// previous one ended, so a dash pattern flows across gaps.
    pub fn compute_line_distances(&mut self) {
        let position = |i: usize| Vec3::from(self.positions[i]);
        let mut distances = vec![0.0; self.positions.len()];
        match self.topology {
            Topology::Lines => {
                for start in (0..self.positions.len().saturating_sub(1)).step_by(2) {
                    distances[start] = if start == 0 { 0.0 } else { distances[start - 1] };
                    distances[start + 1] =
                        distances[start] + (position(start + 1) - position(start)).norm();
                }
            }
            _ => {
                for i in 1..self.positions.len() {
                    distances[i] = distances[i - 1] + (position(i) - position(i - 1)).norm();
                }
            }
        }
        self.line_distances = distances;
    }

    /// Index list for drawing this geometry as independent line segments:
    /// strips and loops are expanded into pairs, triangles are reduced to
    /// their unique edges (wireframe).
    pub fn line_list_indices(&self) -> Vec<u32> {
        match self.topology {
            Topology::Triangles => self.wireframe_indices(),
            Topology::Lines => {
                let even = self.indices.len() - self.indices.len() % 2;
                self.indices[..even].to_vec()
            }
            Topology::LineStrip | Topology::LineLoop => {
                let mut pairs: Vec<u32> = self
                    .indices
                    .windows(2)
                    .flat_map(|pair| [pair[0], pair[1]])
                    .collect();
                if self.topology == Topology::LineLoop && self.indices.len() > 2 {
                    if let (Some(&last), Some(&first)) = (self.indices.last(), self.indices.first()) {
                        pairs.extend_from_slice(&[last, first]);
                    }
                }
                pairs
            }
        }
    }

    /// The unique edges of a triangle mesh as a line list.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for triangle in self.indices.chunks_exact(3) {
            for (a, b) in [
                (triangle[0], triangle[1]),
                (triangle[1], triangle[2]),
                (triangle[2], triangle[0]),
            ] {
                if seen.insert((a.min(b), a.max(b))) {
                    edges.extend_from_slice(&[a, b]);
                }
            }
        }
        edges
    }

    fn push_cap(&mut self, radius: f32, half_height: f32, radial_segments: u32, top: bool) {
        let sign = if top { 1.0 } else { -1.0 };
        let center_start = self.positions.len() as u32;
        for _ in 0..radial_segments {
            self.positions.push([0.0, half_height * sign, 0.0]);
            self.normals.push([0.0, sign, 0.0]);
            self.uvs.push([0.5, 0.5]);
        }
        let ring_start = self.positions.len() as u32;
        for x in 0..=radial_segments {
            let theta = x as f32 / radial_segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            self.positions
                .push([radius * sin, half_height * sign, radius * cos]);
            self.normals.push([0.0, sign, 0.0]);
            self.uvs
                .push([cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5]);
        }
        for x in 0..radial_segments {
            let c = center_start + x;
            let i = ring_start + x;
            if top {
                self.indices.extend_from_slice(&[i, i + 1, c]);
            } else {
                self.indices.extend_from_slice(&[i + 1, i, c]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_normal(g: &Geometry, tri: &[u32]) -> Vec3 {
        let p = |i: u32| Vec3::from(g.positions[i as usize]);
        (p(tri[1]) - p(tri[0])).cross(&(p(tri[2]) - p(tri[0])))
    }

    #[test]
    fn cuboid_faces_wind_outward() {
        let cube = Geometry::cuboid(1.5, 1.5, 1.5);
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices.len(), 36);
        for tri in cube.indices.chunks_exact(3) {
            let normal = Vec3::from(cube.normals[tri[0] as usize]);
            assert!(face_normal(&cube, tri).dot(&normal) > 0.0);
        }
        for p in &cube.positions {
            assert!(p.iter().all(|c| (c.abs() - 0.75).abs() < 1e-6));
        }
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let sphere = Geometry::sphere(1.2, 32, 32);
        for p in &sphere.positions {
            assert!((Vec3::from(*p).norm() - 1.2).abs() < 1e-4);
        }
        assert!(sphere.indices.iter().all(|&i| (i as usize) < sphere.vertex_count()));
    }

    #[test]
    fn plane_faces_positive_z() {
        let plane = Geometry::plane(3.0, 1.5);
        for tri in plane.indices.chunks_exact(3) {
            assert!(face_normal(&plane, tri).z > 0.0);
        }
    }

    #[test]
    fn cone_has_no_top_cap() {
        let cone = Geometry::cone(1.0, 2.0, 32);
        let cylinder = Geometry::cylinder(0.7, 0.7, 2.0, 32);
        assert!(cone.indices.len() < cylinder.indices.len());
        assert!(cone.positions.iter().all(|p| p[1] <= 1.0 + 1e-6));
    }

    #[test]
    fn strip_and_loop_expand_to_pairs() {
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let strip = Geometry::polyline(&points, Topology::LineStrip);
        assert_eq!(strip.line_list_indices(), vec![0, 1, 1, 2, 2, 3, 3, 4]);

        let looped = Geometry::polyline(&points, Topology::LineLoop);
        assert_eq!(looped.line_list_indices(), vec![0, 1, 1, 2, 2, 3, 3, 4, 4, 0]);

        let pairs = Geometry::polyline(&points, Topology::Lines);
        assert_eq!(pairs.line_list_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn single_point_strip_draws_nothing() {
        let strip = Geometry::polyline(&[Vec3::zeros()], Topology::LineStrip);
        assert!(strip.line_list_indices().is_empty());
    }

    #[test]
    fn line_distances_accumulate() {
        let points = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(3.0, 5.0, 0.0),
        ];
        let mut strip = Geometry::polyline(&points, Topology::LineStrip);
        strip.compute_line_distances();
        assert_eq!(strip.line_distances, vec![0.0, 5.0, 6.0]);
    }

    #[test]
    fn wireframe_deduplicates_shared_edges() {
        let plane = Geometry::plane(1.0, 1.0);
        // Two triangles share the diagonal: 5 unique edges.
        assert_eq!(plane.wireframe_indices().len(), 10);
    }

    #[test]
    fn grid_splits_center_lines() {
        let (center, rest) = Geometry::grid(6.0, 12);
        assert_eq!(center.vertex_count(), 4);
        assert_eq!(rest.vertex_count(), 12 * 4);
    }
}
