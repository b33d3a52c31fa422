//! # Application Core (`app.rs`)
//!
//! The [`App`] is the `winit` application handler. It owns the window, the
//! [`Renderer`], the egui integration and the lesson [`Gallery`], and wires
//! them together every frame:
//!
//! - a left panel lists the lessons and their demos;
//! - a bottom panel shows the selected demo's controls;
//! - the central area is left transparent and letterboxed to the demo's
//!   aspect ratio; the 3D scene is drawn there and clicks inside it are
//!   forwarded to the demo in normalized device coordinates.
//!
//! ## Platform-Specific Notes
//!
//! - **Desktop**: the renderer is created synchronously with `pollster` and
//!   the first demo is mounted right away.
//! - **WebAssembly**: the renderer is created asynchronously and delivered
//!   over a `oneshot` channel. Until it arrives no demo is mounted, so a
//!   demo selected in the meantime only mounts once the canvas is ready.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::sync::Arc;

use nalgebra_glm as glm;
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    window::{Theme, Window},
};

use crate::config::AppConfig;
use crate::error::Result;
use crate::gallery::Gallery;
use crate::renderer::{Renderer, Viewport};
use crate::stage::Surface;

pub struct App {
    config: AppConfig,
    gallery: Gallery,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    gui_state: Option<egui_winit::State>,
    last_render_time: Option<Instant>,
    #[cfg(target_arch = "wasm32")]
    renderer_receiver: Option<futures::channel::oneshot::Receiver<Result<Renderer>>>,
    last_size: (u32, u32),
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

/// Maps a point inside `rect` to normalized device coordinates: x to the
/// right, y up, both in `-1..=1`.
pub fn to_ndc(rect: egui::Rect, position: egui::Pos2) -> glm::Vec2 {
    let x = (position.x - rect.left()) / rect.width().max(f32::EPSILON);
    let y = (position.y - rect.top()) / rect.height().max(f32::EPSILON);
    glm::vec2(x * 2.0 - 1.0, -(y * 2.0 - 1.0))
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut gallery = Gallery::new();
        gallery.select(config.lesson.saturating_sub(1), config.demo, None);
        Self {
            config,
            gallery,
            window: None,
            renderer: None,
            gui_state: None,
            last_render_time: None,
            #[cfg(target_arch = "wasm32")]
            renderer_receiver: None,
            last_size: (0, 0),
        }
    }

    fn renderer_ready(&mut self, renderer: Result<Renderer>) {
        match renderer {
            Ok(renderer) => {
                self.renderer = Some(renderer);
                let (width, height) = self.last_size;
                self.gallery.mount_current(Some(Surface::new(width, height)));
            }
            Err(error) => log::error!("Renderer unavailable: {error}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        let mut attributes = Window::default_attributes();

        #[cfg(not(target_arch = "wasm32"))]
        {
            attributes = attributes
                .with_title(self.config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.width,
                    self.config.height,
                ));
        }

        #[allow(unused_assignments)]
        #[cfg(target_arch = "wasm32")]
        let mut canvas_width = 0;

        #[allow(unused_assignments)]
        #[cfg(target_arch = "wasm32")]
        let mut canvas_height = 0;

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;
            let canvas = wgpu::web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id("canvas"))
                .and_then(|element| element.dyn_into::<wgpu::web_sys::HtmlCanvasElement>().ok());
            let Some(canvas) = canvas else {
                log::error!("No <canvas id=\"canvas\"> element to render into");
                return;
            };
            canvas_width = canvas.width();
            canvas_height = canvas.height();
            self.last_size = (canvas_width, canvas_height);
            attributes = attributes.with_canvas(Some(canvas));
        }

        if let Ok(window) = event_loop.create_window(attributes) {
            let first_window_handle = self.window.is_none();
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());
            if first_window_handle {
                let gui_context = egui::Context::default();
                let (theme, visuals) = if self.config.dark_theme {
                    (Theme::Dark, egui::Visuals::dark())
                } else {
                    (Theme::Light, egui::Visuals::light())
                };
                gui_context.set_visuals(visuals);

                #[cfg(not(target_arch = "wasm32"))]
                {
                    let inner_size = window_handle.inner_size();
                    self.last_size = (inner_size.width, inner_size.height);
                }

                #[cfg(target_arch = "wasm32")]
                {
                    gui_context.set_pixels_per_point(window_handle.scale_factor() as f32);
                }

                let viewport_id = gui_context.viewport_id();
                let gui_state = egui_winit::State::new(
                    gui_context,
                    viewport_id,
                    &window_handle,
                    Some(window_handle.scale_factor() as _),
                    Some(theme),
                    None,
                );

                self.gui_state = Some(gui_state);
                self.last_render_time = Some(Instant::now());

                #[cfg(not(target_arch = "wasm32"))]
                {
                    let (width, height) = self.last_size;
                    let renderer = pollster::block_on(async move {
                        Renderer::new(window_handle.clone(), width, height).await
                    });
                    self.renderer_ready(renderer);
                }

                #[cfg(target_arch = "wasm32")]
                {
                    let (sender, receiver) = futures::channel::oneshot::channel();
                    self.renderer_receiver = Some(receiver);
                    log::info!("Canvas dimensions: ({canvas_width} x {canvas_height})");
                    wasm_bindgen_futures::spawn_local(async move {
                        let renderer =
                            Renderer::new(window_handle.clone(), canvas_width, canvas_height)
                                .await;
                        if sender.send(renderer).is_err() {
                            log::error!("Failed to create and send renderer!");
                        }
                    });
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: winit::event::WindowEvent,
    ) {
        #[cfg(target_arch = "wasm32")]
        {
            let received = self
                .renderer_receiver
                .as_mut()
                .and_then(|receiver| receiver.try_recv().ok().flatten());
            if let Some(renderer) = received {
                self.renderer_receiver = None;
                self.renderer_ready(renderer);
            }
        }

        let (Some(gui_state), Some(renderer), Some(window), Some(last_render_time)) = (
            self.gui_state.as_mut(),
            self.renderer.as_mut(),
            self.window.as_ref(),
            self.last_render_time.as_mut(),
        ) else {
            return;
        };

        // Receive gui window event
        if gui_state.on_window_event(window, &event).consumed {
            return;
        }

        // If the gui didn't consume the event, handle it
        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                // Exit by pressing the escape key
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                log::info!("Resizing renderer surface to: ({width}, {height})");
                renderer.resize(width, height);
                self.last_size = (width, height);
            }
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting...");
                if let Some(demo) = self.gallery.current_mut() {
                    demo.unmount();
                }
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now - *last_render_time;
                *last_render_time = now;

                let gui_input = gui_state.take_egui_input(window);
                gui_state.egui_ctx().begin_pass(gui_input);

                let mut picked = None;
                egui::SidePanel::left("lessons")
                    .resizable(false)
                    .default_width(220.0)
                    .show(gui_state.egui_ctx(), |ui| {
                        ui.heading(self.config.title.as_str());
                        ui.separator();
                        egui::ScrollArea::vertical().show(ui, |ui| {
                            picked = self.gallery.picker(ui);
                        });
                    });

                egui::TopBottomPanel::bottom("controls")
                    .min_height(96.0)
                    .show(gui_state.egui_ctx(), |ui| {
                        if let Some(demo) = self.gallery.current_mut() {
                            ui.strong(demo.title());
                            demo.controls(ui);
                        }
                    });

                let mut scene_rect = None;
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(gui_state.egui_ctx(), |ui| {
                        let Some(demo) = self.gallery.current_mut() else {
                            return;
                        };
                        let available = ui.available_rect_before_wrap();
                        let boxed = Viewport::letterbox(
                            Viewport {
                                x: available.left(),
                                y: available.top(),
                                width: available.width(),
                                height: available.height(),
                            },
                            demo.config().aspect(),
                        );
                        let rect = egui::Rect::from_min_size(
                            egui::pos2(boxed.x, boxed.y),
                            egui::vec2(boxed.width, boxed.height),
                        );
                        let response = ui.allocate_rect(rect, egui::Sense::click());
                        if response.clicked() {
                            if let Some(position) = response.interact_pointer_pos() {
                                demo.click(to_ndc(rect, position));
                            }
                        }
                        demo.overlay(ui.painter(), rect);
                        scene_rect = Some(rect);
                    });

                let egui_winit::egui::FullOutput {
                    textures_delta,
                    shapes,
                    pixels_per_point,
                    platform_output,
                    ..
                } = gui_state.egui_ctx().end_pass();

                gui_state.handle_platform_output(window, platform_output);

                let paint_jobs = gui_state.egui_ctx().tessellate(shapes, pixels_per_point);

                let (width, height) = self.last_size;
                if let Some((lesson, demo)) = picked {
                    self.gallery
                        .select(lesson, demo, Some(Surface::new(width, height)));
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [width, height],
                    pixels_per_point: window.scale_factor() as f32,
                };

                let viewport = scene_rect.map(|rect| Viewport {
                    x: rect.left() * pixels_per_point,
                    y: rect.top() * pixels_per_point,
                    width: rect.width() * pixels_per_point,
                    height: rect.height() * pixels_per_point,
                });

                let stage = match self.gallery.current_mut() {
                    Some(demo) => {
                        demo.frame(delta_time);
                        demo.stage_mut()
                    }
                    None => None,
                };

                if let Err(error) = renderer.render_frame(
                    screen_descriptor,
                    paint_jobs,
                    textures_delta,
                    stage,
                    viewport,
                ) {
                    log::error!("Frame failed: {error}");
                }
            }
            _ => (),
        }

        window.request_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_spans_the_viewport() {
        let rect = egui::Rect::from_min_size(egui::pos2(100.0, 50.0), egui::vec2(500.0, 300.0));
        assert_eq!(to_ndc(rect, rect.center()), glm::vec2(0.0, 0.0));
        assert_eq!(to_ndc(rect, rect.left_top()), glm::vec2(-1.0, 1.0));
        assert_eq!(to_ndc(rect, rect.right_bottom()), glm::vec2(1.0, -1.0));
    }

    #[test]
    fn startup_selection_follows_the_config() {
        let config = AppConfig {
            lesson: 4,
            demo: 1,
            ..AppConfig::default()
        };
        let app = App::new(config);
        assert_eq!(app.gallery.selected(), (3, 1));
        assert_eq!(app.gallery.mounted_count(), 0);
    }
}
