//! Line primitives for the line-types demo.
//!
//! The same five points are connected four different ways. [`strokes`]
//! reports which points end up joined by analysing the index list the GPU
//! will actually draw, so tests can check the rendered connectivity rather
//! than a separate model of it.

use nalgebra_glm::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::{Geometry, Topology};
use crate::material::Material;

/// The demo polyline P0..P4 in the `z = 0` plane.
pub const LINE_POINTS: [[f32; 2]; 5] = [[-2.0, -1.0], [-0.5, 1.5], [0.5, -0.5], [1.5, 1.0], [2.5, -1.0]];

pub fn line_points() -> Vec<Vec3> {
    LINE_POINTS
        .iter()
        .map(|[x, y]| Vec3::new(*x, *y, 0.0))
        .collect()
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Line,
    Segments,
    Loop,
    Dashed,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Line,
        LineStyle::Segments,
        LineStyle::Loop,
        LineStyle::Dashed,
    ];

    pub const DASH_SIZE: f32 = 0.2;
    pub const GAP_SIZE: f32 = 0.1;

    pub fn label(&self) -> &'static str {
        match self {
            LineStyle::Line => "Line",
            LineStyle::Segments => "LineSegments",
            LineStyle::Loop => "LineLoop",
            LineStyle::Dashed => "Dashed",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            LineStyle::Line => Color::rgb_u32(0x6c5ce7),
            LineStyle::Segments => Color::rgb_u32(0xfd79a8),
            LineStyle::Loop => Color::rgb_u32(0x55efc4),
            LineStyle::Dashed => Color::rgb_u32(0xfdcb6e),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            LineStyle::Line => "Connects all points in order: P0\u{2192}P1\u{2192}P2\u{2192}P3\u{2192}P4",
            LineStyle::Segments => "Connects pairs only: P0\u{2192}P1, P2\u{2192}P3 (P4 alone)",
            LineStyle::Loop => "Like Line but also connects P4 back to P0",
            LineStyle::Dashed => "Same as Line but with dashes along the measured line distance",
        }
    }

    pub fn topology(&self) -> Topology {
        match self {
            LineStyle::Line | LineStyle::Dashed => Topology::LineStrip,
            LineStyle::Segments => Topology::Lines,
            LineStyle::Loop => Topology::LineLoop,
        }
    }

    /// Geometry and material drawing `points` in this style.
    pub fn build(&self, points: &[Vec3]) -> (Geometry, Material) {
        let mut geometry = Geometry::polyline(points, self.topology());
        let material = match self {
            LineStyle::Dashed => {
                geometry.compute_line_distances();
                Material::dashed(self.color(), Self::DASH_SIZE, Self::GAP_SIZE)
            }
            _ => Material::line(self.color()),
        };
        (geometry, material)
    }
}

/// Splits the drawn segments of `geometry` into connected strokes, each a
/// sequence of point indices. Points that no segment touches do not appear.
pub fn strokes(geometry: &Geometry) -> Vec<Vec<u32>> {
    let mut strokes: Vec<Vec<u32>> = Vec::new();
    for pair in geometry.line_list_indices().chunks_exact(2) {
        match strokes.last_mut() {
            Some(stroke) if stroke.last() == Some(&pair[0]) => stroke.push(pair[1]),
            _ => strokes.push(vec![pair[0], pair[1]]),
        }
    }
    strokes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strokes_for(style: LineStyle) -> Vec<Vec<u32>> {
        let (geometry, _) = style.build(&line_points());
        strokes(&geometry)
    }

    #[test]
    fn line_is_one_open_stroke() {
        assert_eq!(strokes_for(LineStyle::Line), vec![vec![0, 1, 2, 3, 4]]);
    }

    #[test]
    fn segments_leave_last_point_alone() {
        assert_eq!(
            strokes_for(LineStyle::Segments),
            vec![vec![0, 1], vec![2, 3]]
        );
    }

    #[test]
    fn loop_returns_to_start() {
        assert_eq!(strokes_for(LineStyle::Loop), vec![vec![0, 1, 2, 3, 4, 0]]);
    }

    #[test]
    fn dashed_measures_distances() {
        let (geometry, material) = LineStyle::Dashed.build(&line_points());
        assert_eq!(geometry.line_distances.len(), 5);
        assert!(geometry.line_distances.windows(2).all(|d| d[1] > d[0]));
        assert!(material.is_line());
        assert_eq!(strokes(&geometry), vec![vec![0, 1, 2, 3, 4]]);
    }
}
