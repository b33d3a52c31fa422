//! Lesson 3: click the orthographic viewport to drop points; consecutive
//! points are joined by a line once there are at least two of them.

use nalgebra_glm as glm;

use super::{swatches, Demo};
use crate::camera::Projection;
use crate::color::{Color, PURPLE};
use crate::config::{CameraConfig, SceneConfig};
use crate::geometry::{Geometry, Topology};
use crate::material::Material;
use crate::resources::{GeometryId, MaterialId};
use crate::scene::{Node, NodeId};
use crate::stage::Stage;

struct Marker {
    geometry: GeometryId,
    material: MaterialId,
}

pub struct DrawingDemo {
    stage: Option<Stage>,
    points: Vec<glm::Vec3>,
    color: Color,
    marker: Option<Marker>,
    dots: Option<NodeId>,
    line: Option<NodeId>,
}

impl Default for DrawingDemo {
    fn default() -> Self {
        Self {
            stage: None,
            points: Vec::new(),
            color: PURPLE,
            marker: None,
            dots: None,
            line: None,
        }
    }
}

impl DrawingDemo {
    pub fn points(&self) -> &[glm::Vec3] {
        &self.points
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// The line node, present only while two or more points exist.
    pub fn line(&self) -> Option<NodeId> {
        self.line
    }

    /// Number of dot markers in the scene.
    pub fn dot_count(&self) -> usize {
        let (Some(stage), Some(dots)) = (self.stage.as_ref(), self.dots) else {
            return 0;
        };
        stage
            .scene
            .node(dots)
            .map_or(0, |group| group.children().len())
    }

    /// Appends a point on the `z = 0` plane under `ndc`.
    pub fn add_point_at(&mut self, ndc: glm::Vec2) {
        let Some(stage) = self.stage.as_ref() else {
            return;
        };
        let Some(point) = stage.camera.ndc_to_plane_z0(ndc) else {
            return;
        };
        self.points.push(point);
        log::debug!("Point {} at ({:.2}, {:.2})", self.points.len(), point.x, point.y);
        self.rebuild();
    }

    pub fn clear(&mut self) {
        if self.stage.is_none() {
            return;
        }
        self.points.clear();
        self.rebuild();
    }

    pub fn set_color(&mut self, color: Color) {
        if self.stage.is_none() {
            return;
        }
        self.color = color;
        self.rebuild();
    }

    /// Replaces the dots and the line with ones matching the point list.
    fn rebuild(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;

        if let Some(line) = self.line.take() {
            for mesh in scene.remove(line) {
                scene.resources.release_geometry(mesh.geometry);
                scene.resources.release_material(mesh.material);
            }
        }
        if let Some(dots) = self.dots.take() {
            // The marker geometry is shared by every dot and outlives them.
            scene.remove(dots);
        }
        if self.points.is_empty() {
            return;
        }

        let marker = self.marker.get_or_insert_with(|| Marker {
            geometry: scene.resources.add_geometry(Geometry::sphere(0.06, 12, 12)),
            material: scene.resources.add_material(Material::basic(Color::WHITE)),
        });
        let dots = scene.add(Node::group());
        for point in &self.points {
            scene.add_child(dots, Node::mesh(marker.geometry, marker.material).at(*point));
        }
        self.dots = Some(dots);

        if self.points.len() >= 2 {
            let geometry = scene
                .resources
                .add_geometry(Geometry::polyline(&self.points, Topology::LineStrip));
            let material = scene.resources.add_material(Material::line(self.color));
            self.line = Some(scene.add(Node::mesh(geometry, material)));
        }
    }
}

impl Demo for DrawingDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Click to Draw"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300).lights(Vec::new()).camera(
            CameraConfig::at(glm::vec3(0.0, 0.0, 5.0)).with_projection(Projection::Orthographic {
                left: -3.0,
                right: 3.0,
                top: 2.0,
                bottom: -2.0,
                near: 0.1,
                far: 10.0,
            }),
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
        let (center, rest) = Geometry::grid(6.0, 12);
        let grid = scene.add(Node::group().rotated(glm::vec3(std::f32::consts::FRAC_PI_2, 0.0, 0.0)));
        for (geometry, color) in [(rest, 0x1f1f2f), (center, 0x2a2a3a)] {
            let geometry = scene.resources.add_geometry(geometry);
            let material = scene
                .resources
                .add_material(Material::line(Color::rgb_u32(color)));
            scene.add_child(grid, Node::mesh(geometry, material));
        }
    }

    fn click(&mut self, ndc: glm::Vec2) {
        self.add_point_at(ndc);
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Clear").clicked() {
                self.clear();
            }
            let count = self.points.len();
            let plural = if count == 1 { "" } else { "s" };
            ui.label(format!("{count} point{plural} - click the canvas to draw"));
        });
        if let Some(color) = swatches(ui, self.color) {
            self.set_color(color);
        }
    }
}
