//! Lesson 2: text drawn on an offscreen 2D surface and mapped onto a plane.
//! Editing the text field re-renders the texture.

use nalgebra_glm as glm;

use super::Demo;
use crate::color::Color;
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::resources::MaterialId;
use crate::scene::{Light, Node};
use crate::stage::Stage;
use crate::text_texture::{render_text, TextStyle};

pub const DEFAULT_TEXT: &str = "Hello 3D!";

pub struct CanvasTextDemo {
    stage: Option<Stage>,
    text: String,
    material: Option<MaterialId>,
}

impl Default for CanvasTextDemo {
    fn default() -> Self {
        Self {
            stage: None,
            text: DEFAULT_TEXT.to_owned(),
            material: None,
        }
    }
}

impl CanvasTextDemo {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Re-renders the texture with `text` and swaps it into the plane's
    /// material, releasing the previous texture.
    pub fn set_text(&mut self, text: &str) {
        let (Some(stage), Some(material)) = (self.stage.as_mut(), self.material) else {
            return;
        };
        let image = match render_text(text, &TextStyle::panel()) {
            Ok(image) => image,
            Err(error) => {
                log::warn!("Text texture not updated: {error}");
                return;
            }
        };
        let resources = &mut stage.scene.resources;
        let texture = resources.add_texture(image);
        let Some(material) = resources.material_mut(material) else {
            resources.release_texture(texture);
            return;
        };
        let previous = material.map.replace(texture);
        if let Some(previous) = previous {
            resources.release_texture(previous);
        }
        self.text = text.to_owned();
        log::debug!("Canvas text set to {text:?}");
    }
}

impl Demo for CanvasTextDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Canvas Texture"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300)
            .lights(vec![
                Light::directional(1.0, glm::vec3(0.0, 0.0, 5.0)),
                Light::ambient(0.8),
            ])
            .camera(CameraConfig::at(glm::vec3(0.0, 0.0, 3.0)))
    }

    fn populate(&mut self) {
        self.text = DEFAULT_TEXT.to_owned();
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let mut material = Material::standard(Color::WHITE);
        match render_text(&self.text, &TextStyle::panel()) {
            Ok(image) => material = material.with_map(scene.resources.add_texture(image)),
            Err(error) => log::warn!("Text texture unavailable: {error}"),
        }
        let material = scene.resources.add_material(material);
        let geometry = scene.resources.add_geometry(Geometry::plane(3.0, 1.5));
        scene.replace_subject(Node::mesh(geometry, material));
        self.material = Some(material);
    }

    fn animate(&mut self, tick: FrameTick) {
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.y = tick.elapsed.sin() * 0.3;
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let mut text = self.text.clone();
        let edit = egui::TextEdit::singleline(&mut text)
            .hint_text("Type something...")
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            self.set_text(&text);
        }
    }
}
