//! Lesson 2: plain 2D text painted over the 3D viewport instead of inside it.

use nalgebra_glm as glm;

use super::Demo;
use crate::color::PURPLE;
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::Node;
use crate::stage::Stage;

pub const HEADLINE: &str = "HTML Overlay Text";
pub const CAPTION: &str = "This text is regular UI positioned on top of the canvas";

#[derive(Default)]
pub struct OverlayDemo {
    stage: Option<Stage>,
}

impl Demo for OverlayDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Overlay Text"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300).camera(CameraConfig::at(glm::vec3(0.0, 0.0, 3.0)))
    }

    fn populate(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(Geometry::torus(0.8, 0.35, 16, 48));
        let material = scene.resources.add_material(Material::standard(PURPLE));
        scene.replace_subject(Node::mesh(geometry, material));
    }

    fn animate(&mut self, tick: FrameTick) {
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.x += tick.per_frame(0.008);
            node.transform.rotation.y += tick.per_frame(0.012);
        }
    }

    fn overlay(&self, painter: &egui::Painter, viewport: egui::Rect) {
        // Sizes are authored for the 300px tall surface and scaled with it.
        let scale = viewport.height() / 300.0;
        let shadow = egui::Color32::from_black_alpha(170);
        let headline_font = egui::FontId::proportional(22.0 * scale);
        let top = egui::pos2(viewport.center().x, viewport.top() + 20.0 * scale);
        painter.text(
            top + egui::vec2(0.0, 2.0 * scale),
            egui::Align2::CENTER_TOP,
            HEADLINE,
            headline_font.clone(),
            shadow,
        );
        painter.text(
            top,
            egui::Align2::CENTER_TOP,
            HEADLINE,
            headline_font,
            egui::Color32::WHITE,
        );
        painter.text(
            egui::pos2(viewport.center().x, viewport.bottom() - 20.0 * scale),
            egui::Align2::CENTER_BOTTOM,
            CAPTION,
            egui::FontId::proportional(12.0 * scale),
            egui::Color32::from_white_alpha(153),
        );
    }
}
