//! # Stage
//!
//! A [`Stage`] is everything one mounted demo owns: its [`Scene`], its
//! [`Camera`], its [`FrameLoop`] and the [`Surface`] it was bound to. It is
//! created in one step from a [`SceneConfig`] by [`Stage::bootstrap`] and
//! destroyed in one step by [`Stage::teardown`], which cancels the loop and
//! releases every resource the scene still holds.

use crate::camera::Camera;
use crate::config::SceneConfig;
use crate::frame_loop::{FrameLoop, LoopHandle};
use crate::scene::Scene;

/// The display area a demo renders into, in logical pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A surface matching the size a scene asks for.
    pub fn for_config(config: &SceneConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub frame_loop: FrameLoop,
    pub surface: Surface,
    pub config: SceneConfig,
}

impl Stage {
    /// Builds the scene, camera and lighting described by `config`, binds
    /// them to `surface` and starts the frame loop.
    pub fn bootstrap(config: &SceneConfig, surface: Surface) -> Self {
        let mut frame_loop = FrameLoop::default();
        let (scene, camera) = Self::build(config);
        frame_loop.start();
        log::info!(
            "Stage bootstrapped: {}x{} surface, {} light(s)",
            surface.width,
            surface.height,
            config.lights.len()
        );
        Self {
            scene,
            camera,
            frame_loop,
            surface,
            config: config.clone(),
        }
    }

    /// Tears the current scene down and builds a new one from `config` on
    /// the same surface. The frame loop is cancelled first and restarted
    /// exactly once.
    pub fn reconfigure(&mut self, config: &SceneConfig) -> LoopHandle {
        self.teardown();
        let (scene, camera) = Self::build(config);
        self.scene = scene;
        self.camera = camera;
        self.config = config.clone();
        self.frame_loop.start()
    }

    /// Cancels the frame loop, removes every node and releases every
    /// geometry, material and texture.
    pub fn teardown(&mut self) {
        self.frame_loop.cancel();
        self.scene.clear();
        self.scene.resources.release_all();
        log::debug!("Stage torn down");
    }

    fn build(config: &SceneConfig) -> (Scene, Camera) {
        let mut scene = Scene::new(config.background);
        scene.lights = config.lights.clone();
        let camera = config.camera.camera(config.aspect());
        (scene, camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PURPLE;
    use crate::geometry::Geometry;
    use crate::material::Material;
    use crate::scene::Node;

    #[test]
    fn bootstrap_starts_the_loop_with_config_lights() {
        let config = SceneConfig::default();
        let stage = Stage::bootstrap(&config, Surface::for_config(&config));
        assert!(stage.frame_loop.is_running());
        assert_eq!(stage.scene.lights, config.lights);
        assert!((stage.camera.aspect - 500.0 / 300.0).abs() < 1e-6);
    }

    #[test]
    fn teardown_releases_everything() {
        let config = SceneConfig::default();
        let mut stage = Stage::bootstrap(&config, Surface::for_config(&config));
        let geometry = stage.scene.resources.add_geometry(Geometry::sphere(1.0, 8, 8));
        let material = stage.scene.resources.add_material(Material::standard(PURPLE));
        stage.scene.add(Node::mesh(geometry, material));

        stage.teardown();
        assert!(!stage.frame_loop.is_running());
        assert_eq!(stage.scene.node_count(), 0);
        assert_eq!(stage.scene.resources.live_geometries(), 0);
        assert_eq!(stage.scene.resources.live_materials(), 0);
    }

    #[test]
    fn reconfigure_swaps_scene_and_restarts_once() {
        let config = SceneConfig::default();
        let mut stage = Stage::bootstrap(&config, Surface::for_config(&config));
        let old_scene = stage.scene.id();
        let old_handle = stage.frame_loop.handle();

        let dark = config.clone().lights(Vec::new());
        let handle = stage.reconfigure(&dark);
        assert_ne!(stage.scene.id(), old_scene);
        assert_ne!(Some(handle), old_handle);
        assert_eq!(stage.frame_loop.runs_started(), 2);
        assert!(stage.scene.lights.is_empty());
    }
}
