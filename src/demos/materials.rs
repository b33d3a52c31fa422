//! Lesson 4: one sphere, six materials.

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use super::{note, tabs, Demo};
use crate::camera::Projection;
use crate::color::{Color, PURPLE};
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::{Light, Node};
use crate::stage::Stage;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialChoice {
    Basic,
    Lambert,
    Phong,
    #[default]
    Standard,
    Normal,
    Wireframe,
}

impl MaterialChoice {
    pub const ALL: [MaterialChoice; 6] = [
        MaterialChoice::Basic,
        MaterialChoice::Lambert,
        MaterialChoice::Phong,
        MaterialChoice::Standard,
        MaterialChoice::Normal,
        MaterialChoice::Wireframe,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaterialChoice::Basic => "Basic",
            MaterialChoice::Lambert => "Lambert",
            MaterialChoice::Phong => "Phong",
            MaterialChoice::Standard => "Standard (PBR)",
            MaterialChoice::Normal => "Normal",
            MaterialChoice::Wireframe => "Wireframe",
        }
    }

    pub fn accent(&self) -> Color {
        match self {
            MaterialChoice::Basic => Color::rgb_u32(0xff7675),
            MaterialChoice::Lambert => Color::rgb_u32(0xfdcb6e),
            MaterialChoice::Phong => Color::rgb_u32(0x55efc4),
            MaterialChoice::Standard => Color::rgb_u32(0x6c5ce7),
            MaterialChoice::Normal => Color::rgb_u32(0xa29bfe),
            MaterialChoice::Wireframe => Color::rgb_u32(0x74b9ff),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MaterialChoice::Basic => {
                "Flat color, completely ignores lighting. Fastest. Good for wireframes, debug, simple effects."
            }
            MaterialChoice::Lambert => {
                "Simple diffuse shading (matte). No specular highlights. Cheap to compute, good for non-shiny objects."
            }
            MaterialChoice::Phong => {
                "Adds specular highlights (shininess). The shiny spot when light hits. Good for plastic, ceramic."
            }
            MaterialChoice::Standard => {
                "Physically Based Rendering. Uses roughness + metalness. Most realistic for real-world materials. The default choice."
            }
            MaterialChoice::Normal => {
                "Shows surface normals as colors (RGB = XYZ direction). Great for debugging geometry. No lighting needed."
            }
            MaterialChoice::Wireframe => {
                "Shows only the triangle edges. Useful for seeing the geometry structure underneath."
            }
        }
    }

    pub fn material(&self) -> Material {
        match self {
            MaterialChoice::Basic => Material::basic(PURPLE),
            MaterialChoice::Lambert => Material::lambert(PURPLE),
            MaterialChoice::Phong => Material::phong(PURPLE, 100.0),
            MaterialChoice::Standard => Material::pbr(PURPLE, 0.4, 0.3),
            MaterialChoice::Normal => Material::normal(),
            MaterialChoice::Wireframe => Material::basic(PURPLE).with_wireframe(true),
        }
    }
}

#[derive(Default)]
pub struct MaterialDemo {
    stage: Option<Stage>,
    choice: MaterialChoice,
}

impl MaterialDemo {
    pub fn choice(&self) -> MaterialChoice {
        self.choice
    }

    /// The sphere's current material.
    pub fn material(&self) -> Option<&Material> {
        let scene = &self.stage.as_ref()?.scene;
        let mesh = scene.subject_node()?.mesh?;
        scene.resources.material(mesh.material)
    }

    /// Gives the sphere a fresh material and releases the old one.
    pub fn set_material(&mut self, choice: MaterialChoice) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let material = scene.resources.add_material(choice.material());
        let Some(mesh) = scene
            .subject_node_mut()
            .and_then(|node| node.mesh.as_mut())
        else {
            scene.resources.release_material(material);
            return;
        };
        let previous = std::mem::replace(&mut mesh.material, material);
        scene.resources.release_material(previous);
        self.choice = choice;
        log::debug!("Material set to {}", choice.label());
    }
}

impl Demo for MaterialDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Materials"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 350)
            .lights(vec![
                Light::directional(1.5, glm::vec3(3.0, 3.0, 5.0)),
                Light::ambient(0.3),
            ])
            .camera(
                CameraConfig::at(glm::vec3(0.0, 0.0, 4.0))
                    .with_projection(Projection::perspective(50.0)),
            )
    }

    fn populate(&mut self) {
        self.choice = MaterialChoice::default();
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(Geometry::sphere(1.2, 32, 32));
        let material = scene.resources.add_material(self.choice.material());
        scene.replace_subject(Node::mesh(geometry, material));
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
        if let Some(choice) = tabs(ui, &MaterialChoice::ALL, self.choice, |choice| {
            (choice.label(), choice.accent())
        }) {
            self.set_material(choice);
        }
        note(ui, self.choice.accent(), self.choice.description());
    }
}
