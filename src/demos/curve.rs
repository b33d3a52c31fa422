//! Lesson 3: parametric curves drawn as one polyline, slowly rotating.

use nalgebra_glm as glm;

use super::{tabs, Demo};
use crate::color::Color;
use crate::config::{CameraConfig, SceneConfig};
use crate::curves::{sample, CurveKind, DEMO_SAMPLES};
use crate::frame_loop::FrameTick;
use crate::geometry::{Geometry, Topology};
use crate::material::Material;
use crate::scene::Node;
use crate::stage::Stage;

pub const CURVE_COLOR: Color = Color::rgb_u32(0xa29bfe);

#[derive(Default)]
pub struct CurveDemo {
    stage: Option<Stage>,
    kind: CurveKind,
}

impl CurveDemo {
    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// Regenerates the point sequence for `kind` and swaps in a new line,
    /// releasing the old line's geometry and material.
    pub fn set_curve(&mut self, kind: CurveKind) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let points = sample(kind, DEMO_SAMPLES);
        let geometry = scene
            .resources
            .add_geometry(Geometry::polyline(&points, Topology::LineStrip));
        let material = scene.resources.add_material(Material::line(CURVE_COLOR));
        let (_, removed) = scene.replace_subject(Node::mesh(geometry, material));
        for mesh in removed {
            scene.resources.release_geometry(mesh.geometry);
            scene.resources.release_material(mesh.material);
        }
        self.kind = kind;
        log::debug!("Curve set to {}", kind.label());
    }
}

impl Demo for CurveDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Parametric Curves"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300)
            .lights(Vec::new())
            .camera(CameraConfig::at(glm::vec3(0.0, 0.0, 5.0)))
    }

    fn populate(&mut self) {
        self.set_curve(CurveKind::default());
    }

    fn animate(&mut self, tick: FrameTick) {
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.y += tick.per_frame(0.005);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        if let Some(kind) = tabs(ui, &CurveKind::ALL, self.kind, |kind| {
            (kind.label(), CURVE_COLOR)
        }) {
            self.set_curve(kind);
        }
    }
}
