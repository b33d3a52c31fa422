//! Lesson 4: the classic reasons a scene renders nothing. Each mode rebuilds
//! the stage from scratch with one thing wrong.

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
#[serde(rename_all = "kebab-case")]
pub enum CameraMode {
    #[default]
    Working,
    NoLight,
    Inside,
    TooFar,
    WrongWay,
}

impl CameraMode {
    pub const ALL: [CameraMode; 5] = [
        CameraMode::Working,
        CameraMode::NoLight,
        CameraMode::Inside,
        CameraMode::TooFar,
        CameraMode::WrongWay,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CameraMode::Working => "Working",
            CameraMode::NoLight => "No Light",
            CameraMode::Inside => "Camera Inside",
            CameraMode::TooFar => "Too Far",
            CameraMode::WrongWay => "Wrong Way",
        }
    }

    pub fn accent(&self) -> Color {
        match self {
            CameraMode::Working => Color::rgb_u32(0x55efc4),
            _ => Color::rgb_u32(0xff7675),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CameraMode::Working => "Everything correct: light, camera at z=3, object at origin.",
            CameraMode::NoLight => {
                "A standard material needs light! Add a directional light or use a basic material instead."
            }
            CameraMode::Inside => {
                "Camera at (0,0,0) = inside the box. Move it back to z = 3."
            }
            CameraMode::TooFar => {
                "Object at z=-100 but the camera's far plane is 5. Increase far or move the object closer."
            }
            CameraMode::WrongWay => {
                "Camera looks at (0,0,100) instead of (0,0,0). Point it at the origin."
            }
        }
    }

    /// Scene configuration reproducing this mode.
    pub fn scene_config(&self) -> SceneConfig {
        let base = SceneConfig::sized(500, 300);
        let lit = vec![Light::directional(1.5, glm::vec3(0.0, 1.0, 0.0)), Light::ambient(0.4)];
        let camera = CameraConfig::at(glm::vec3(0.0, 0.0, 3.0));
        match self {
            CameraMode::Working => base
                .lights(SceneConfig::key_and_fill(1.5, 0.4))
                .camera(camera),
            CameraMode::NoLight => base.lights(Vec::new()).camera(camera),
            CameraMode::Inside => base.lights(lit).camera(CameraConfig::at(glm::Vec3::zeros())),
            CameraMode::TooFar => base.lights(lit).camera(camera.with_projection(
                Projection::Perspective {
                    fov_y_degrees: 75.0,
                    near: 0.1,
                    far: 5.0,
                },
            )),
            CameraMode::WrongWay => base
                .lights(lit)
                .camera(camera.looking_at(glm::vec3(0.0, 0.0, 100.0))),
        }
    }

    fn box_position(&self) -> glm::Vec3 {
        match self {
            CameraMode::TooFar => glm::vec3(0.0, 0.0, -100.0),
            _ => glm::Vec3::zeros(),
        }
    }
}

#[derive(Default)]
pub struct BlackScreenDemo {
    stage: Option<Stage>,
    mode: CameraMode,
}

impl BlackScreenDemo {
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Tears the current scene down and rebuilds it in `mode`, cancelling
    /// the running frame loop and starting a new one.
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.reconfigure(&mode.scene_config());
        self.mode = mode;
        self.add_box();
        log::debug!("Black screen mode set to {}", mode.label());
    }

    fn add_box(&mut self) {
        let position = self.mode.box_position();
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(Geometry::cuboid(1.2, 1.2, 1.2));
        let material = scene.resources.add_material(Material::standard(PURPLE));
        scene.replace_subject(Node::mesh(geometry, material).at(position));
    }
}

impl Demo for BlackScreenDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Black Screen Debugging"
    }

    fn config(&self) -> SceneConfig {
        CameraMode::Working.scene_config()
    }

    fn populate(&mut self) {
        self.mode = CameraMode::Working;
        self.add_box();
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

    fn controls(&mut self, ui: &mut egui::Ui) {
        if let Some(mode) = tabs(ui, &CameraMode::ALL, self.mode, |mode| {
            (mode.label(), mode.accent())
        }) {
            self.set_camera_mode(mode);
        }
        note(ui, self.mode.accent(), self.mode.description());
    }
}
