//! Lesson 4: a turning plane that vanishes from behind unless its material
//! renders both faces.

use nalgebra_glm as glm;

use super::Demo;
use crate::camera::Projection;
use crate::color::{Color, PURPLE};
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::{Material, Side};
use crate::resources::MaterialId;
use crate::scene::{Light, Node};
use crate::stage::Stage;

#[derive(Default)]
pub struct DoubleSideDemo {
    stage: Option<Stage>,
    material: Option<MaterialId>,
}

impl DoubleSideDemo {
    pub fn side(&self) -> Option<Side> {
        let stage = self.stage.as_ref()?;
        stage.scene.resources.material(self.material?).map(|m| m.side)
    }

    pub fn set_double_sided(&mut self, double: bool) {
        let (Some(stage), Some(material)) = (self.stage.as_mut(), self.material) else {
            return;
        };
        if let Some(material) = stage.scene.resources.material_mut(material) {
            material.side = if double { Side::Double } else { Side::Front };
            log::debug!("Plane side set to {:?}", material.side);
        }
    }
}

impl Demo for DoubleSideDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Double Side"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 250)
            .lights(vec![
                Light::directional(1.5, glm::vec3(2.0, 3.0, 4.0)),
                Light::ambient(0.3),
            ])
            .camera(
                CameraConfig::at(glm::vec3(0.0, 0.5, 3.0))
                    .with_projection(Projection::perspective(50.0)),
            )
    }

    fn populate(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(Geometry::plane(2.0, 2.0));
        let material = scene
            .resources
            .add_material(Material::standard(PURPLE).with_side(Side::Front));
        scene.replace_subject(Node::mesh(geometry, material));
        self.material = Some(material);
    }

    fn animate(&mut self, tick: FrameTick) {
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.y += tick.per_frame(0.015);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let double = self.side() == Some(Side::Double);
        ui.horizontal(|ui| {
            let (label, accent) = if double {
                ("DoubleSide ON", Color::rgb_u32(0x55efc4))
            } else {
                ("FrontSide only", Color::rgb_u32(0xff7675))
            };
            let text = egui::RichText::new(label).color(accent.to_egui()).strong();
            if ui.button(text).clicked() {
                self.set_double_sided(!double);
            }
            ui.label("Watch the plane disappear when facing away");
        });
    }
}
