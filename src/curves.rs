//! Parametric point generators for the curve demo.
//!
//! Each curve is a closed-form function of a parameter `s` running from 0 to
//! 1 over the samples (both ends included), with `t = 4πs` and `x = 6s - 3`.
//! Generation is pure: the same kind and count always give the same points.

use std::f32::consts::PI;

use nalgebra_glm::Vec3;
use serde::{Deserialize, Serialize};

/// Sample count used by the curve demo.
pub const DEMO_SAMPLES: usize = 200;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    #[default]
    Sine,
    Helix,
    Lissajous,
    Spiral,
}

impl CurveKind {
    pub const ALL: [CurveKind; 4] = [
        CurveKind::Sine,
        CurveKind::Helix,
        CurveKind::Lissajous,
        CurveKind::Spiral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CurveKind::Sine => "Sine Wave",
            CurveKind::Helix => "Helix (3D)",
            CurveKind::Lissajous => "Lissajous",
            CurveKind::Spiral => "Spiral",
        }
    }

    /// The point at parameter `s` in `0..=1`.
    pub fn point(&self, s: f32) -> Vec3 {
        let t = s * PI * 4.0;
        let x = s * 6.0 - 3.0;
        match self {
            CurveKind::Sine => Vec3::new(x, t.sin(), 0.0),
            CurveKind::Helix => {
                let angle = t * 2.0;
                Vec3::new(angle.cos() * 1.5, x, angle.sin() * 1.5)
            }
            CurveKind::Lissajous => Vec3::new(t.sin() * 2.0, (t * 1.5).sin() * 1.5, 0.0),
            CurveKind::Spiral => {
                let r = s * 2.0;
                Vec3::new(t.cos() * r, t.sin() * r, 0.0)
            }
        }
    }
}

/// `count` evenly spaced samples of `kind`, both ends of the curve included.
/// Zero samples give an empty list, a single sample sits at `s = 0`.
///
/// Consecutive samples are distinct with one exception: the lissajous curve
/// crosses itself at the origin at `s = 0`, `0.5` and `1`, so two or three
/// lissajous samples all land there.
pub fn sample(kind: CurveKind, count: usize) -> Vec<Vec3> {
    let last = count.saturating_sub(1).max(1) as f32;
    (0..count).map(|i| kind.point(i as f32 / last)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_requested_count() {
        for kind in CurveKind::ALL {
            for count in [0, 1, 2, 17, DEMO_SAMPLES] {
                assert_eq!(sample(kind, count).len(), count, "{kind:?} x {count}");
            }
        }
    }

    #[test]
    fn consecutive_points_are_distinct() {
        // Two or three lissajous samples land on the self-crossing at the
        // origin, so start from five.
        for kind in CurveKind::ALL {
            for count in 5..=300 {
                let points = sample(kind, count);
                for pair in points.windows(2) {
                    assert!(
                        (pair[1] - pair[0]).norm() > 1e-5,
                        "{kind:?} repeats a point with {count} samples"
                    );
                }
            }
        }
    }

    #[test]
    fn spiral_radius_grows_from_zero_to_two() {
        let points = sample(CurveKind::Spiral, DEMO_SAMPLES);
        let radii: Vec<f32> = points.iter().map(|p| p.norm()).collect();
        assert!(radii[0].abs() < 1e-6);
        assert!((radii[DEMO_SAMPLES - 1] - 2.0).abs() < 1e-5);
        assert!(radii.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn sine_spans_minus_three_to_three() {
        let points = sample(CurveKind::Sine, DEMO_SAMPLES);
        assert!((points[0].x + 3.0).abs() < 1e-6);
        assert!((points[DEMO_SAMPLES - 1].x - 3.0).abs() < 1e-5);
        assert!(points.iter().all(|p| p.y.abs() <= 1.0 && p.z == 0.0));
    }

    #[test]
    fn helix_stays_on_its_cylinder() {
        for p in sample(CurveKind::Helix, 64) {
            assert!(((p.x * p.x + p.z * p.z).sqrt() - 1.5).abs() < 1e-5);
        }
    }

    #[test]
    fn single_sample_is_the_start() {
        assert_eq!(sample(CurveKind::Spiral, 1), vec![Vec3::zeros()]);
    }

    #[test]
    fn few_lissajous_samples_sit_on_the_origin() {
        for count in [2, 3] {
            let points = sample(CurveKind::Lissajous, count);
            assert_eq!(points.len(), count);
            assert!(points.iter().all(|p| p.norm() < 1e-4), "{count} samples");
        }
        let four = sample(CurveKind::Lissajous, 4);
        assert!(four.windows(2).all(|pair| (pair[1] - pair[0]).norm() > 1e-3));
    }
}
