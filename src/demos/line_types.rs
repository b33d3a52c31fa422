//! Lesson 3: the same five points joined as a line, as pairs, as a loop and
//! as a dashed line. Dots and `P0`..`P4` labels mark the points.

use nalgebra_glm as glm;

use super::{add_dots, add_label, note, tabs, Demo};
use crate::color::Color;
use crate::config::{CameraConfig, SceneConfig};
use crate::geometry::Geometry;
use crate::lines::{line_points, LineStyle};
use crate::scene::Node;
use crate::stage::Stage;
use crate::text_texture::TextStyle;

#[derive(Default)]
pub struct LineTypesDemo {
    stage: Option<Stage>,
    style: LineStyle,
}

impl LineTypesDemo {
    pub fn style(&self) -> LineStyle {
        self.style
    }

    /// The geometry of the line currently on screen.
    pub fn line_geometry(&self) -> Option<&Geometry> {
        let scene = &self.stage.as_ref()?.scene;
        let mesh = scene.subject_node()?.mesh?;
        scene.resources.geometry(mesh.geometry)
    }

    /// Rebuilds the line in `style`, releasing the previous line's geometry
    /// and material.
    pub fn set_line_style(&mut self, style: LineStyle) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let (geometry, material) = style.build(&line_points());
        let geometry = scene.resources.add_geometry(geometry);
        let material = scene.resources.add_material(material);
        let (_, removed) = scene.replace_subject(Node::mesh(geometry, material));
        for mesh in removed {
            scene.resources.release_geometry(mesh.geometry);
            scene.resources.release_material(mesh.material);
        }
        self.style = style;
        log::debug!("Line style set to {}", style.label());
    }
}

impl Demo for LineTypesDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Line Types"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300)
            .lights(Vec::new())
            .camera(CameraConfig::at(glm::vec3(0.0, 0.0, 4.0)))
    }

    fn populate(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let points = line_points();
        add_dots(scene, &points);
        let style = TextStyle::label(64, 32, 18.0, 22.0, Color::WHITE.with_alpha(0.5));
        for (index, point) in points.iter().enumerate() {
            add_label(
                scene,
                &format!("P{index}"),
                &style,
                point + glm::vec3(0.0, 0.3, 0.0),
                glm::vec2(0.5, 0.25),
            );
        }
        self.set_line_style(LineStyle::default());
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        if let Some(style) = tabs(ui, &LineStyle::ALL, self.style, |style| {
            (style.label(), style.color())
        }) {
            self.set_line_style(style);
        }
        note(ui, self.style.color(), self.style.description());
    }
}
