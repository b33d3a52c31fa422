//! # GPU scene mirror
//!
//! [`GpuScene`] keeps GPU copies of whatever the mounted [`Stage`] draws and
//! records one draw per visible mesh each frame.
//!
//! - Geometries and textures are uploaded the first time a mesh uses them and
//!   cached by id. Ids are never reused within a scene, so a cached buffer is
//!   valid until the scene reports the id as released.
//! - Releases are drained from the scene's resource arena every frame and the
//!   matching buffers and textures destroyed.
//! - A different [`SceneId`] (a new demo, or a demo that rebuilt its stage)
//!   flushes the caches wholesale.
//! - Per-object uniform bindings are pooled by draw slot and rewritten every
//!   frame, so material edits show up on the next frame without any
//!   invalidation.
//!
//! Opaque meshes are drawn first in scene order, followed by translucent ones
//! (sprites included) from back to front without depth writes.

use std::collections::HashMap;

use nalgebra_glm as glm;

use crate::camera::Camera;
use crate::geometry::Geometry;
use crate::material::{Material, MaterialKind, Side};
use crate::renderer::Renderer;
use crate::resources::{GeometryId, Released, TextureId};
use crate::scene::SceneId;
use crate::stage::Stage;
use crate::texture_binding::TextureBinding;
use crate::uniform_binding::UniformBinding;
use crate::uniform_buffer::ObjectUniforms;
use crate::vertex::Vertex;

pub const SHADER_SOURCE: &str = include_str!("mesh.wgsl");

/// Rasterization state a draw needs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    /// Filled triangles, back faces culled.
    Culled,
    /// Filled triangles, both faces drawn.
    DoubleSided,
    /// Line list: line materials, line geometries and wireframes.
    Lines,
}

impl PipelineKind {
    const ALL: [PipelineKind; 3] = [
        PipelineKind::Culled,
        PipelineKind::DoubleSided,
        PipelineKind::Lines,
    ];

    /// Picks the rasterization state for `material` drawn over `geometry`.
    /// The second value tells whether the draw is translucent.
    pub fn classify(material: &Material, geometry: &Geometry) -> (PipelineKind, bool) {
        let kind = if material.wireframe || material.is_line() || geometry.topology.is_line() {
            PipelineKind::Lines
        } else if material.side == Side::Double || material.kind == MaterialKind::Sprite {
            PipelineKind::DoubleSided
        } else {
            PipelineKind::Culled
        };
        (kind, material.is_transparent())
    }
}

/// World matrix of a sprite: the node's translation and scale with the
/// camera's orientation, so the quad always faces the viewer.
pub fn billboard(world: &glm::Mat4, camera: &Camera) -> glm::Mat4 {
    let position = glm::vec3(world[(0, 3)], world[(1, 3)], world[(2, 3)]);
    let column = |c: usize| glm::vec3(world[(0, c)], world[(1, c)], world[(2, c)]).norm();
    let scale = glm::vec3(column(0), column(1), column(2));

    let view = camera.view();
    let mut rotation = glm::Mat4::identity();
    for row in 0..3 {
        for col in 0..3 {
            rotation[(row, col)] = view[(col, row)];
        }
    }
    glm::translation(&position) * rotation * glm::scaling(&scale)
}

struct IndexBuffer {
    buffer: wgpu::Buffer,
    count: u32,
}

struct GeometryBuffers {
    vertices: wgpu::Buffer,
    triangles: Option<IndexBuffer>,
    lines: Option<IndexBuffer>,
}

impl GeometryBuffers {
    fn upload(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let vertices = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(&Vertex::interleave(geometry)),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let triangles = if geometry.topology.is_line() {
            None
        } else {
            Self::index_buffer(device, "Triangle Index Buffer", &geometry.indices)
        };
        let lines = Self::index_buffer(device, "Line Index Buffer", &geometry.line_list_indices());
        Self {
            vertices,
            triangles,
            lines,
        }
    }

    fn index_buffer(device: &wgpu::Device, label: &str, indices: &[u32]) -> Option<IndexBuffer> {
        if indices.is_empty() {
            return None;
        }
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
        Some(IndexBuffer {
            buffer,
            count: indices.len() as u32,
        })
    }

    fn indices(&self, kind: PipelineKind) -> Option<&IndexBuffer> {
        match kind {
            PipelineKind::Lines => self.lines.as_ref(),
            _ => self.triangles.as_ref(),
        }
    }

    fn destroy(&self) {
        self.vertices.destroy();
        for index in [&self.triangles, &self.lines].into_iter().flatten() {
            index.buffer.destroy();
        }
    }
}

struct Draw {
    geometry: GeometryId,
    texture: Option<TextureId>,
    kind: PipelineKind,
    transparent: bool,
    /// View-space z of the object's origin; more negative is farther.
    depth: f32,
    slot: usize,
}

pub struct GpuScene {
    scene: Option<SceneId>,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: TextureBinding,
    pipelines: HashMap<(PipelineKind, bool), wgpu::RenderPipeline>,
    geometries: HashMap<GeometryId, GeometryBuffers>,
    textures: HashMap<TextureId, TextureBinding>,
    objects: Vec<UniformBinding>,
    draws: Vec<Draw>,
}

impl GpuScene {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let object_layout = UniformBinding::layout(device);
        let texture_layout = TextureBinding::layout(device);
        let sampler = TextureBinding::sampler(device);
        let white = TextureBinding::white(device, queue, &texture_layout, &sampler);

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER_SOURCE)),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&object_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let mut pipelines = HashMap::new();
        for kind in PipelineKind::ALL {
            for transparent in [false, true] {
                let pipeline = Self::create_pipeline(
                    device,
                    surface_format,
                    &pipeline_layout,
                    &shader_module,
                    kind,
                    transparent,
                );
                pipelines.insert((kind, transparent), pipeline);
            }
        }

        Self {
            scene: None,
            object_layout,
            texture_layout,
            sampler,
            white,
            pipelines,
            geometries: HashMap::new(),
            textures: HashMap::new(),
            objects: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// Drops every cached buffer and texture.
    pub fn flush(&mut self) {
        for (_, buffers) in self.geometries.drain() {
            buffers.destroy();
        }
        for (_, texture) in self.textures.drain() {
            texture.texture.destroy();
        }
        self.draws.clear();
    }

    /// Synchronizes the caches with `stage` and records this frame's draws.
    /// `None` clears the draw list.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, stage: Option<&mut Stage>) {
        self.draws.clear();
        let Some(stage) = stage else {
            return;
        };

        let scene_id = stage.scene.id();
        if self.scene != Some(scene_id) {
            log::debug!("GPU caches flushed for {scene_id:?}");
            self.flush();
            self.scene = Some(scene_id);
        }
        for released in stage.scene.resources.take_released() {
            match released {
                Released::Geometry(id) => {
                    if let Some(buffers) = self.geometries.remove(&id) {
                        buffers.destroy();
                    }
                }
                Released::Texture(id) => {
                    if let Some(texture) = self.textures.remove(&id) {
                        texture.texture.destroy();
                    }
                }
                Released::Material(_) => {}
            }
        }

        let scene = &stage.scene;
        let camera = &stage.camera;
        let view = camera.view();
        for renderable in scene.renderables() {
            let (Some(geometry), Some(material)) = (
                scene.resources.geometry(renderable.mesh.geometry),
                scene.resources.material(renderable.mesh.material),
            ) else {
                continue;
            };
            self.geometries
                .entry(renderable.mesh.geometry)
                .or_insert_with(|| GeometryBuffers::upload(device, geometry));

            let texture = material.map.and_then(|id| {
                if !self.textures.contains_key(&id) {
                    let image = scene.resources.texture(id)?;
                    let binding = TextureBinding::upload(
                        device,
                        queue,
                        &self.texture_layout,
                        &self.sampler,
                        image,
                    );
                    self.textures.insert(id, binding);
                }
                Some(id)
            });

            let model = if material.kind == MaterialKind::Sprite {
                billboard(&renderable.world, camera)
            } else {
                renderable.world
            };
            let uniforms =
                ObjectUniforms::new(camera, model, material, &scene.lights, texture.is_some());

            let slot = self.draws.len();
            if self.objects.len() <= slot {
                self.objects
                    .push(UniformBinding::new(device, &self.object_layout));
            }
            self.objects[slot].update_buffer(queue, &uniforms);

            let (kind, transparent) = PipelineKind::classify(material, geometry);
            let origin = view * glm::vec4(model[(0, 3)], model[(1, 3)], model[(2, 3)], 1.0);
            self.draws.push(Draw {
                geometry: renderable.mesh.geometry,
                texture,
                kind,
                transparent,
                depth: origin.z,
                slot,
            });
        }

        // Opaque first in scene order, then translucent back to front.
        self.draws.sort_by(|a, b| match (a.transparent, b.transparent) {
            (false, false) => std::cmp::Ordering::Equal,
            (true, true) => a.depth.total_cmp(&b.depth),
            (false, true) => std::cmp::Ordering::Less,
            (true, false) => std::cmp::Ordering::Greater,
        });
    }

    pub fn render(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        for draw in &self.draws {
            let (Some(buffers), Some(pipeline), Some(object)) = (
                self.geometries.get(&draw.geometry),
                self.pipelines.get(&(draw.kind, draw.transparent)),
                self.objects.get(draw.slot),
            ) else {
                continue;
            };
            let Some(indices) = buffers.indices(draw.kind) else {
                continue;
            };
            let texture = draw
                .texture
                .and_then(|id| self.textures.get(&id))
                .unwrap_or(&self.white);

            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &object.bind_group, &[]);
            render_pass.set_bind_group(1, &texture.bind_group, &[]);
            render_pass.set_vertex_buffer(0, buffers.vertices.slice(..));
            render_pass.set_index_buffer(indices.buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..indices.count, 0, 0..1);
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        kind: PipelineKind,
        transparent: bool,
    ) -> wgpu::RenderPipeline {
        let (topology, cull_mode) = match kind {
            PipelineKind::Culled => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
            PipelineKind::DoubleSided => (wgpu::PrimitiveTopology::TriangleList, None),
            PipelineKind::Lines => (wgpu::PrimitiveTopology::LineList, None),
        };
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader_module,
                entry_point: Some("vertex_main"),
                buffers: &[Vertex::description(&Vertex::vertex_attributes())],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
                unclipped_depth: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Renderer::DEPTH_FORMAT,
                depth_write_enabled: !transparent,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: shader_module,
                entry_point: Some("fragment_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Projection;
    use crate::color::{Color, PURPLE};
    use crate::geometry::Topology;
    use crate::resources::Resources;

    #[test]
    fn materials_pick_their_pipeline() {
        let sphere = Geometry::sphere(1.0, 8, 8);
        let line = Geometry::polyline(
            &[glm::Vec3::zeros(), glm::vec3(1.0, 0.0, 0.0)],
            Topology::LineStrip,
        );

        let front = Material::standard(PURPLE);
        let double = Material::standard(PURPLE).with_side(Side::Double);
        let wire = Material::basic(PURPLE).with_wireframe(true);
        assert_eq!(PipelineKind::classify(&front, &sphere), (PipelineKind::Culled, false));
        assert_eq!(PipelineKind::classify(&double, &sphere), (PipelineKind::DoubleSided, false));
        assert_eq!(PipelineKind::classify(&wire, &sphere), (PipelineKind::Lines, false));
        assert_eq!(
            PipelineKind::classify(&Material::line(Color::WHITE), &line),
            (PipelineKind::Lines, false)
        );

        let mut resources = Resources::default();
        let texture = resources.add_texture(crate::resources::TextureImage {
            width: 1,
            height: 1,
            pixels: vec![0; 4],
        });
        assert_eq!(
            PipelineKind::classify(&Material::sprite(texture), &Geometry::plane(1.0, 1.0)),
            (PipelineKind::DoubleSided, true)
        );
    }

    #[test]
    fn billboard_faces_the_camera_and_keeps_scale() {
        let mut camera = Camera::new(Projection::default(), glm::vec3(3.0, 2.5, 4.0), 1.0);
        camera.look_at = Some(glm::Vec3::zeros());
        let world = glm::translation(&glm::vec3(1.0, 1.5, 1.0))
            * glm::scaling(&glm::vec3(1.2, 0.25, 1.0));

        let model = billboard(&world, &camera);
        let normal = (model * glm::vec4(0.0, 0.0, 1.0, 0.0)).xyz().normalize();
        let to_camera = -camera.direction();
        assert!((normal - to_camera).norm() < 1e-4);

        let x_axis = (model * glm::vec4(1.0, 0.0, 0.0, 0.0)).xyz();
        assert!((x_axis.norm() - 1.2).abs() < 1e-4);
        assert!((model[(1, 3)] - 1.5).abs() < 1e-6);
    }
}
