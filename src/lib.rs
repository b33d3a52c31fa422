//! # Interactive 3D Graphics Lessons
//!
//! A desktop and browser application that teaches the basics of real-time 3D
//! graphics through small interactive demos, grouped into four lessons:
//!
//! 1. **Creating a Scene**: a lit, spinning primitive whose shape and color
//!    can be changed live.
//! 2. **Creating Text**: text drawn over the viewport, text painted into a
//!    texture and text built from cubes.
//! 3. **Drawing Lines**: line topologies and dashing, click-to-draw on a
//!    plane and parametric curves.
//! 4. **Common Questions Answered**: the coordinate system, why a screen
//!    stays black, how materials differ and why planes vanish from behind.
//!
//! ## Layers
//!
//! - Scene description, entirely on the CPU and testable without a GPU:
//!   [`geometry`], [`material`], [`resources`], [`scene`], [`camera`],
//!   [`color`], [`curves`], [`lines`] and [`text_texture`].
//! - Demo lifecycle: a [`Stage`] bundles a scene, a camera and a
//!   [`FrameLoop`]; every demo implements [`Demo`] on top of an optional
//!   stage, and the [`Gallery`] keeps exactly one demo mounted.
//! - GPU mirror: [`GpuScene`] uploads whatever the mounted stage draws and
//!   the [`Renderer`] composites it with the egui interface.
//! - Shell: [`App`] drives everything from the `winit` event loop.
//!
//! ## Configuration
//!
//! [`AppConfig`] is read from the TOML file named by the `LESSONS_CONFIG`
//! environment variable on desktop and defaults everywhere else.

pub mod app;
pub mod camera;
pub mod color;
pub mod config;
pub mod curves;
pub mod demos;
pub mod error;
pub mod frame_loop;
pub mod gallery;
pub mod geometry;
pub mod gpu;
pub mod gpu_scene;
pub mod lines;
pub mod material;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod stage;
pub mod text_texture;
pub mod texture_binding;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod vertex;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub use web_time::Duration;

pub use crate::app::App;
pub use crate::camera::{Camera, Projection};
pub use crate::color::Color;
pub use crate::config::{AppConfig, CameraConfig, SceneConfig};
pub use crate::demos::Demo;
pub use crate::error::{LessonError, Result};
pub use crate::frame_loop::{FrameLoop, FrameTick};
pub use crate::gallery::Gallery;
pub use crate::gpu::Gpu;
pub use crate::gpu_scene::GpuScene;
pub use crate::renderer::Renderer;
pub use crate::scene::Scene;
pub use crate::stage::{Stage, Surface};

/// Browser entry point: installs the panic hook and console logger, then
/// runs the application on the page's `#canvas` element.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    use winit::platform::web::EventLoopExtWebSys;

    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    // A logger installed by the embedding page takes precedence.
    console_log::init_with_level(log::Level::Info).ok();

    let event_loop = match winit::event_loop::EventLoop::builder().build() {
        Ok(event_loop) => event_loop,
        Err(error) => {
            log::error!("Failed to create the event loop: {error}");
            return;
        }
    };
    let app = App::new(AppConfig::load());
    event_loop.spawn_app(app);
}
