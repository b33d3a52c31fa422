//! # Demos
//!
//! Every interactive viewport of the lessons implements [`Demo`]. A demo is a
//! small state machine around an optional [`Stage`]:
//!
//! - **unmounted**: no stage exists and every handler is a no-op;
//! - **mounted**: [`Demo::mount`] bootstrapped a stage from
//!   [`Demo::config`] and [`Demo::populate`] filled the scene;
//! - back to **unmounted** through [`Demo::unmount`], which tears the stage
//!   down (loop cancelled, resources released).
//!
//! While mounted, the host calls [`Demo::frame`] once per display refresh,
//! [`Demo::controls`] to draw the egui control strip under the viewport,
//! [`Demo::overlay`] to paint 2D decorations over it and [`Demo::click`] when
//! the viewport is clicked.

/// Implements the slot accessors for a demo struct with a `stage` field.
macro_rules! stage_slot {
    () => {
        fn slot(&mut self) -> &mut Option<crate::stage::Stage> {
            &mut self.stage
        }

        fn slot_ref(&self) -> &Option<crate::stage::Stage> {
            &self.stage
        }
    };
}

mod black_screen;
mod canvas_text;
mod coordinates;
mod curve;
mod double_side;
mod drawing;
mod line_types;
mod materials;
mod overlay;
mod shapes;
mod voxel_text;

pub use black_screen::{BlackScreenDemo, CameraMode};
pub use canvas_text::CanvasTextDemo;
pub use coordinates::CoordinateDemo;
pub use curve::CurveDemo;
pub use double_side::DoubleSideDemo;
pub use drawing::DrawingDemo;
pub use line_types::LineTypesDemo;
pub use materials::{MaterialChoice, MaterialDemo};
pub use overlay::OverlayDemo;
pub use shapes::{ShapeDemo, ShapeKind};
pub use voxel_text::VoxelTextDemo;

use nalgebra_glm as glm;
use web_time::Duration;

use crate::color::{Color, PALETTE};
use crate::config::SceneConfig;
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::{Node, NodeId, Scene};
use crate::stage::{Stage, Surface};
use crate::text_texture::{render_text, TextStyle};

pub trait Demo {
    fn title(&self) -> &'static str;

    /// Scene, camera and surface size this demo bootstraps with.
    fn config(&self) -> SceneConfig;

    fn slot(&mut self) -> &mut Option<Stage>;

    fn slot_ref(&self) -> &Option<Stage>;

    /// Fills a freshly bootstrapped scene and resets the demo's UI state.
    fn populate(&mut self);

    /// Advances animation state for one frame.
    fn animate(&mut self, _tick: FrameTick) {}

    fn controls(&mut self, _ui: &mut egui::Ui) {}

    /// Handles a click at normalized device coordinates of the viewport.
    fn click(&mut self, _ndc: glm::Vec2) {}

    fn overlay(&self, _painter: &egui::Painter, _viewport: egui::Rect) {}

    fn stage(&self) -> Option<&Stage> {
        self.slot_ref().as_ref()
    }

    fn stage_mut(&mut self) -> Option<&mut Stage> {
        self.slot().as_mut()
    }

    fn is_mounted(&self) -> bool {
        self.slot_ref().is_some()
    }

    /// Bootstraps the demo onto `surface`. Ignored when the surface is not
    /// available yet or when the demo is already mounted. Returns whether a
    /// new stage was created.
    fn mount(&mut self, surface: Option<Surface>) -> bool {
        let Some(surface) = surface else {
            log::debug!("{}: surface not ready, mount ignored", self.title());
            return false;
        };
        if self.is_mounted() {
            return false;
        }
        let stage = Stage::bootstrap(&self.config(), surface);
        *self.slot() = Some(stage);
        self.populate();
        log::info!("Mounted demo {}", self.title());
        true
    }

    fn unmount(&mut self) {
        if let Some(mut stage) = self.slot().take() {
            stage.teardown();
            log::info!("Unmounted demo {}", self.title());
        }
    }

    /// Ticks the frame loop and animates when it is running.
    fn frame(&mut self, delta: Duration) {
        let tick = self
            .slot()
            .as_mut()
            .and_then(|stage| stage.frame_loop.tick(delta));
        if let Some(tick) = tick {
            self.animate(tick);
        }
    }
}

/// Row of round color buttons. Returns the clicked color.
pub(crate) fn swatches(ui: &mut egui::Ui, selected: Color) -> Option<Color> {
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        for (color, name) in PALETTE {
            let stroke = if color == selected {
                egui::Stroke::new(2.0, egui::Color32::WHITE)
            } else {
                egui::Stroke::NONE
            };
            let button = egui::Button::new("")
                .fill(color.to_egui())
                .stroke(stroke)
                .min_size(egui::vec2(24.0, 24.0));
            if ui.add(button).on_hover_text(name).clicked() {
                picked = Some(color);
            }
        }
    });
    picked
}

/// Row of mutually exclusive tabs. Returns the clicked item.
pub(crate) fn tabs<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    items: &[T],
    selected: T,
    label: impl Fn(T) -> (&'static str, Color),
) -> Option<T> {
    let mut picked = None;
    ui.horizontal_wrapped(|ui| {
        for item in items {
            let (text, accent) = label(*item);
            let mut text = egui::RichText::new(text);
            if *item == selected {
                text = text.color(accent.to_egui()).strong();
            }
            if ui.selectable_label(*item == selected, text).clicked() {
                picked = Some(*item);
            }
        }
    });
    picked
}

/// Short explanation box under the tabs.
pub(crate) fn note(ui: &mut egui::Ui, accent: Color, text: &str) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, accent.with_alpha(0.3).to_egui()))
        .show(ui, |ui| {
            ui.label(text);
        });
}

/// Adds a camera-facing text label at `position`. The label's texture is
/// rendered once; labels that fail to rasterize are skipped with a warning.
pub(crate) fn add_label(
    scene: &mut Scene,
    text: &str,
    style: &TextStyle,
    position: glm::Vec3,
    scale: glm::Vec2,
) -> Option<NodeId> {
    let image = match render_text(text, style) {
        Ok(image) => image,
        Err(error) => {
            log::warn!("Skipping label {text:?}: {error}");
            return None;
        }
    };
    let texture = scene.resources.add_texture(image);
    let geometry = scene.resources.add_geometry(Geometry::plane(1.0, 1.0));
    let material = scene.resources.add_material(Material::sprite(texture));
    let node = Node::mesh(geometry, material)
        .at(position)
        .scaled(glm::vec3(scale.x, scale.y, 1.0));
    Some(scene.add(node))
}

/// Small white spheres marking `points`, sharing one geometry and material.
pub(crate) fn add_dots(scene: &mut Scene, points: &[glm::Vec3]) -> Vec<NodeId> {
    let geometry = scene.resources.add_geometry(Geometry::sphere(0.06, 12, 12));
    let material = scene.resources.add_material(Material::basic(Color::WHITE));
    points
        .iter()
        .map(|point| scene.add(Node::mesh(geometry, material).at(*point)))
        .collect()
}
