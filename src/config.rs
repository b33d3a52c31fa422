//! # Configuration
//!
//! Two layers of configuration exist:
//!
//! - [`SceneConfig`] is the single parameterized description every demo hands
//!   to [`Stage::bootstrap`](crate::stage::Stage::bootstrap): surface size,
//!   background, lights and camera.
//! - [`AppConfig`] covers the application shell: window title and size and
//!   which lesson/demo is shown first. Natively it is read from the TOML file
//!   named by the `LESSONS_CONFIG` environment variable; a missing variable
//!   means defaults and a malformed file is reported and ignored.
//!
//! Both are plain `serde` structs, so a scene can also be described in TOML:
//!
//! ```toml
//! width = 500
//! height = 400
//! background = "#cfcfdd"
//!
//! [[lights]]
//! type = "directional"
//! color = "#ffffff"
//! intensity = 1.5
//! position = [2.0, 3.0, 4.0]
//!
//! [camera]
//! position = [0.0, 0.0, 3.0]
//! projection = { type = "perspective", fov_y_degrees = 75.0, near = 0.1, far = 1000.0 }
//! ```

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, Projection};
use crate::color::{Color, MIDNIGHT};
use crate::error::Result;
use crate::scene::Light;

/// Environment variable naming the application config file.
pub const CONFIG_ENV: &str = "LESSONS_CONFIG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: glm::Vec3,
    pub look_at: Option<glm::Vec3>,
    pub projection: Projection,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: glm::vec3(0.0, 0.0, 3.0),
            look_at: None,
            projection: Projection::default(),
        }
    }
}

impl CameraConfig {
    pub fn at(position: glm::Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn looking_at(mut self, target: glm::Vec3) -> Self {
        self.look_at = Some(target);
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        let mut camera = Camera::new(self.projection, self.position, aspect);
        camera.look_at = self.look_at;
        camera
    }
}

/// Everything needed to create a demo's scene and camera.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Surface width in logical pixels.
    pub width: u32,
    /// Surface height in logical pixels.
    pub height: u32,
    pub background: Color,
    pub lights: Vec<Light>,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
            background: MIDNIGHT,
            lights: Self::key_and_fill(1.5, 0.4),
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn sized(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn lights(mut self, lights: Vec<Light>) -> Self {
        self.lights = lights;
        self
    }

    pub fn camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// The usual two-light rig: a directional key light up and to the right
    /// of the camera plus a white ambient fill.
    pub fn key_and_fill(key: f32, fill: f32) -> Vec<Light> {
        vec![
            Light::directional(key, glm::vec3(2.0, 3.0, 4.0)),
            Light::ambient(fill),
        ]
    }
}

/// Application shell settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Lesson shown at startup, counted from 1.
    pub lesson: usize,
    /// Demo within that lesson, counted from 0.
    pub demo: usize,
    pub dark_theme: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "3D Graphics Lessons".to_owned(),
            width: 1100,
            height: 720,
            lesson: 1,
            demo: 0,
            dark_theme: true,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Reads the file named by [`CONFIG_ENV`], falling back to defaults.
    pub fn load() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return match Self::load_from(std::path::Path::new(&path)) {
                Ok(config) => {
                    log::info!("Loaded configuration from {path}");
                    config
                }
                Err(error) => {
                    log::warn!("Ignoring configuration {path}: {error}");
                    Self::default()
                }
            };
        }
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_config_round_trips_through_toml() {
        let config = SceneConfig::sized(500, 400)
            .background(Color::rgb_u32(0xcfcfdd))
            .camera(CameraConfig::at(glm::vec3(3.0, 2.5, 4.0)).looking_at(glm::Vec3::zeros()));
        let text = toml::to_string(&config).unwrap();
        let parsed: SceneConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_scene_config_uses_defaults() {
        let parsed: SceneConfig = toml::from_str("height = 350\nbackground = \"#000\"").unwrap();
        assert_eq!(parsed.width, 500);
        assert_eq!(parsed.height, 350);
        assert_eq!(parsed.background, Color::BLACK);
        assert_eq!(parsed.lights.len(), 2);
    }

    #[test]
    fn app_config_parses_and_rejects() {
        let config = AppConfig::from_toml_str("lesson = 3\ndemo = 2").unwrap();
        assert_eq!((config.lesson, config.demo), (3, 2));
        assert!(config.dark_theme);
        assert!(AppConfig::from_toml_str("lesson = \"three\"").is_err());
        assert!(AppConfig::from_toml_str("background = \"#nothex\"").is_ok());
    }

    #[test]
    fn bad_color_is_a_config_error() {
        let error = toml::from_str::<SceneConfig>("background = \"#zz\"").unwrap_err();
        assert!(error.to_string().contains("invalid color"));
    }
}
