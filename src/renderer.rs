//! # Renderer
//!
//! Owns the [`Gpu`], the depth buffer, the [`GpuScene`] mirror of the mounted
//! demo and the egui renderer, and turns one frame's worth of state into one
//! submitted command buffer:
//!
//! 1. egui texture uploads and buffer updates,
//! 2. a render pass that clears to the scene background, restricts the
//!    viewport to the demo's letterboxed rectangle and draws the scene,
//! 3. egui drawn on top of everything in the same pass.
//!
//! A surface that is lost or outdated is reconfigured and the frame skipped;
//! only unrecoverable surface errors are returned to the caller.

use crate::color::{Color, MIDNIGHT};
use crate::error::Result;
use crate::gpu::Gpu;
use crate::gpu_scene::GpuScene;
use crate::stage::Stage;

/// Region of the surface, in physical pixels, the scene is drawn into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The largest rectangle with the given aspect ratio that fits inside
    /// `available`, centered.
    pub fn letterbox(available: Viewport, aspect: f32) -> Viewport {
        if available.width <= 0.0 || available.height <= 0.0 || aspect <= 0.0 {
            return Viewport {
                width: 0.0,
                height: 0.0,
                ..available
            };
        }
        let (width, height) = if available.width / available.height > aspect {
            (available.height * aspect, available.height)
        } else {
            (available.width, available.width / aspect)
        };
        Viewport {
            x: available.x + (available.width - width) * 0.5,
            y: available.y + (available.height - height) * 0.5,
            width,
            height,
        }
    }

    /// Clamps to a `surface_width` x `surface_height` target. Returns `None`
    /// when nothing of the viewport is left.
    pub fn clamped(&self, surface_width: u32, surface_height: u32) -> Option<Viewport> {
        let (sw, sh) = (surface_width as f32, surface_height as f32);
        let x = self.x.clamp(0.0, sw);
        let y = self.y.clamp(0.0, sh);
        let width = (self.x + self.width).clamp(0.0, sw) - x;
        let height = (self.y + self.height).clamp(0.0, sh) - y;
        (width >= 1.0 && height >= 1.0).then_some(Viewport {
            x,
            y,
            width,
            height,
        })
    }
}

pub struct Renderer {
    gpu: Gpu,
    depth_texture_view: wgpu::TextureView,
    egui_renderer: egui_wgpu::Renderer,
    scene: GpuScene,
}

impl Renderer {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let gpu = Gpu::new_async(window, width, height).await?;
        let depth_texture_view = gpu.create_depth_texture(width, height);

        let egui_renderer = egui_wgpu::Renderer::new(
            &gpu.device,
            gpu.surface_config.format,
            Some(Self::DEPTH_FORMAT),
            1,
            false,
        );

        let scene = GpuScene::new(&gpu.device, &gpu.queue, gpu.surface_format);

        Ok(Self {
            gpu,
            depth_texture_view,
            egui_renderer,
            scene,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.depth_texture_view = self.gpu.create_depth_texture(width, height);
    }

    /// Size of the swapchain in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (self.gpu.surface_config.width, self.gpu.surface_config.height)
    }

    pub fn render_frame(
        &mut self,
        screen_descriptor: egui_wgpu::ScreenDescriptor,
        paint_jobs: Vec<egui::epaint::ClippedPrimitive>,
        textures_delta: egui::TexturesDelta,
        stage: Option<&mut Stage>,
        viewport: Option<Viewport>,
    ) -> Result<()> {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the next frame, skipping it");
                return Ok(());
            }
            Err(error) => return Err(error.into()),
        };

        let background = stage
            .as_ref()
            .map(|stage| stage.scene.background)
            .unwrap_or(MIDNIGHT);
        let (width, height) = self.surface_size();
        let viewport = viewport.and_then(|v| v.clamped(width, height));
        let stage = if viewport.is_some() { stage } else { None };
        self.scene.prepare(&self.gpu.device, &self.gpu.queue, stage);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        let surface_texture_view =
            surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor {
                    label: wgpu::Label::default(),
                    aspect: wgpu::TextureAspect::default(),
                    format: Some(self.gpu.surface_format),
                    dimension: None,
                    base_mip_level: 0,
                    mip_level_count: None,
                    base_array_layer: 0,
                    array_layer_count: None,
                    usage: None,
                });

        encoder.insert_debug_marker("Render scene");

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(Self::clear_color(background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(viewport) = viewport {
                render_pass.set_viewport(
                    viewport.x,
                    viewport.y,
                    viewport.width,
                    viewport.height,
                    0.0,
                    1.0,
                );
                self.scene.render(&mut render_pass);
                render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            }

            self.egui_renderer.render(
                &mut render_pass.forget_lifetime(),
                &paint_jobs,
                &screen_descriptor,
            );
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn clear_color(background: Color) -> wgpu::Color {
        Color {
            a: 1.0,
            ..background
        }
        .to_wgpu()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(width: f32, height: f32) -> Viewport {
        Viewport {
            x: 10.0,
            y: 20.0,
            width,
            height,
        }
    }

    #[test]
    fn letterbox_keeps_the_aspect_ratio() {
        let wide = Viewport::letterbox(area(1000.0, 300.0), 5.0 / 3.0);
        assert!((wide.height - 300.0).abs() < 1e-3);
        assert!((wide.width - 500.0).abs() < 1e-3);
        assert!((wide.x - 260.0).abs() < 1e-3);

        let tall = Viewport::letterbox(area(500.0, 900.0), 5.0 / 4.0);
        assert!((tall.width - 500.0).abs() < 1e-3);
        assert!((tall.height - 400.0).abs() < 1e-3);
        assert!((tall.y - 270.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_areas_collapse() {
        let empty = Viewport::letterbox(area(0.0, 300.0), 1.5);
        assert_eq!(empty.width, 0.0);
        assert!(empty.clamped(800, 600).is_none());
    }

    #[test]
    fn viewports_are_clamped_to_the_surface() {
        let v = Viewport {
            x: -10.0,
            y: 500.0,
            width: 100.0,
            height: 200.0,
        };
        let clamped = v.clamped(800, 600).map(|v| (v.x, v.y, v.width, v.height));
        assert_eq!(clamped, Some((0.0, 500.0, 90.0, 100.0)));
    }
}
