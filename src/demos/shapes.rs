//! Lesson 1: a lit shape on a light background with shape, color and spin
//! controls.

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use super::{swatches, tabs, Demo};
use crate::camera::Projection;
use crate::color::{Color, PURPLE};
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::resources::MaterialId;
use crate::scene::Node;
use crate::stage::Stage;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Box,
    Sphere,
    Torus,
    Cone,
    Cylinder,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Box,
        ShapeKind::Sphere,
        ShapeKind::Torus,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Torus => "Torus",
            ShapeKind::Cone => "Cone",
            ShapeKind::Cylinder => "Cylinder",
        }
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            ShapeKind::Box => Geometry::cuboid(1.5, 1.5, 1.5),
            ShapeKind::Sphere => Geometry::sphere(1.0, 32, 32),
            ShapeKind::Torus => Geometry::torus(0.8, 0.35, 16, 48),
            ShapeKind::Cone => Geometry::cone(1.0, 2.0, 32),
            ShapeKind::Cylinder => Geometry::cylinder(0.7, 0.7, 2.0, 32),
        }
    }
}

pub struct ShapeDemo {
    stage: Option<Stage>,
    shape: ShapeKind,
    color: Color,
    spinning: bool,
    material: Option<MaterialId>,
}

impl Default for ShapeDemo {
    fn default() -> Self {
        Self {
            stage: None,
            shape: ShapeKind::Box,
            color: PURPLE,
            spinning: true,
            material: None,
        }
    }
}

impl ShapeDemo {
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn spinning(&self) -> bool {
        self.spinning
    }

    /// Current rotation of the shape.
    pub fn rotation(&self) -> Option<glm::Vec3> {
        self.stage
            .as_ref()?
            .scene
            .subject_node()
            .map(|node| node.transform.rotation)
    }

    /// Recolors the shape's material in place.
    pub fn set_color(&mut self, color: Color) {
        let (Some(stage), Some(material)) = (self.stage.as_mut(), self.material) else {
            return;
        };
        if let Some(material) = stage.scene.resources.material_mut(material) {
            material.color = color;
            self.color = color;
            log::debug!("Shape color set to {}", color.to_hex());
        }
    }

    /// Swaps the geometry, keeping the material. The old geometry is
    /// released.
    pub fn set_shape(&mut self, shape: ShapeKind) {
        let (Some(stage), Some(material)) = (self.stage.as_mut(), self.material) else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(shape.geometry());
        let (_, removed) = scene.replace_subject(Node::mesh(geometry, material));
        for mesh in removed {
            scene.resources.release_geometry(mesh.geometry);
        }
        self.shape = shape;
        log::debug!("Shape set to {}", shape.label());
    }

    pub fn set_spinning(&mut self, spinning: bool) {
        if self.stage.is_some() {
            self.spinning = spinning;
        }
    }

    pub fn toggle_spin(&mut self) {
        self.set_spinning(!self.spinning);
    }
}

impl Demo for ShapeDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Creating a Scene"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 400)
            .background(Color::rgb_u32(0xcfcfdd))
            .lights(SceneConfig::key_and_fill(1.5, 0.4))
            .camera(
                CameraConfig::at(glm::vec3(0.0, 0.0, 3.0))
                    .with_projection(Projection::perspective(75.0)),
            )
    }

    fn populate(&mut self) {
        let stage = self.stage.take();
        *self = Self {
            stage,
            ..Self::default()
        };
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let material = scene.resources.add_material(Material::standard(self.color));
        let geometry = scene.resources.add_geometry(self.shape.geometry());
        scene.replace_subject(Node::mesh(geometry, material));
        self.material = Some(material);
    }

    fn animate(&mut self, tick: FrameTick) {
        if !self.spinning {
            return;
        }
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.x += tick.per_frame(0.008);
            node.transform.rotation.y += tick.per_frame(0.012);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.label(egui::RichText::new("GEOMETRY (SHAPE)").small().strong());
                if let Some(shape) = tabs(ui, &ShapeKind::ALL, self.shape, |shape| {
                    (shape.label(), PURPLE)
                }) {
                    self.set_shape(shape);
                }
            });
            ui.separator();
            ui.vertical(|ui| {
                ui.label(egui::RichText::new("MATERIAL (COLOR)").small().strong());
                if let Some(color) = swatches(ui, self.color) {
                    self.set_color(color);
                }
            });
            ui.separator();
            let label = if self.spinning { "Pause" } else { "Spin" };
            if ui.selectable_label(self.spinning, label).clicked() {
                self.toggle_spin();
            }
        });
    }
}
