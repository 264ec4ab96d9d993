use glam::Mat4;
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::PerspectiveCamera;
use crate::mesh::{MeshData, MeshId};
use crate::node::Node;
use crate::stage::MAX_PIXEL_RATIO;
use crate::target::{RenderError, RenderTarget, SurfaceProvider};

use super::context::GpuContext;
use super::pipeline::{MeshPipeline, MeshUniforms, MeshVertex, DEPTH_FORMAT};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.08,
    a: 1.0,
};

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Render target over one winit window surface.
///
/// Vertex/index buffers are cached per mesh id; per-draw uniforms go into
/// one dynamically-offset buffer rewritten each frame.
pub struct WindowTarget {
    gpu: GpuContext,
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    pipeline: MeshPipeline,
    depth_view: wgpu::TextureView,
    meshes: HashMap<MeshId, GpuMesh>,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_capacity: u32,
    uniform_stride: u64,
}

impl WindowTarget {
    pub fn new(gpu: GpuContext, window: Arc<Window>) -> anyhow::Result<Self> {
        let surface = gpu.instance().create_surface(window.clone())?;

        let caps = surface.get_capabilities(gpu.adapter());
        let surface_format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(caps.formats[0]);

        let scale = window.scale_factor();
        let logical: winit::dpi::LogicalSize<f64> = window.inner_size().to_logical(scale);
        let ratio = (scale as f32).min(MAX_PIXEL_RATIO);
        let width = ((logical.width as f32 * ratio).round() as u32).max(1);
        let height = ((logical.height as f32 * ratio).round() as u32).max(1);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &config);

        let depth_view = create_depth_view(gpu.device(), width, height);
        let pipeline = MeshPipeline::new(gpu.device(), surface_format);

        let alignment = gpu.device().limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_size = std::mem::size_of::<MeshUniforms>() as u64;
        let uniform_stride = uniform_size.div_ceil(alignment) * alignment;

        let uniform_capacity = 16;
        let (uniform_buffer, uniform_bind_group) = create_uniform_buffer(
            gpu.device(),
            &pipeline,
            uniform_stride,
            uniform_capacity,
        );

        Ok(Self {
            gpu,
            window,
            surface,
            config,
            pipeline,
            depth_view,
            meshes: HashMap::new(),
            uniform_buffer,
            uniform_bind_group,
            uniform_capacity,
            uniform_stride,
        })
    }

    fn ensure_uniform_capacity(&mut self, draws: u32) {
        if draws <= self.uniform_capacity {
            return;
        }
        self.uniform_capacity = draws.next_power_of_two();
        let (buffer, bind_group) = create_uniform_buffer(
            self.gpu.device(),
            &self.pipeline,
            self.uniform_stride,
            self.uniform_capacity,
        );
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
    }
}

impl RenderTarget for WindowTarget {
    fn client_size(&self) -> (u32, u32) {
        let logical: winit::dpi::LogicalSize<f64> =
            self.window.inner_size().to_logical(self.window.scale_factor());
        (
            logical.width.round() as u32,
            logical.height.round() as u32,
        )
    }

    fn pixel_ratio(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.gpu.device(), &self.config);
        self.depth_view = create_depth_view(self.gpu.device(), width, height);
    }

    fn draw(&mut self, root: &Node, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        let view_proj = camera.view_proj();

        let mut draws: Vec<(MeshId, MeshUniforms)> = Vec::new();
        {
            let meshes = &mut self.meshes;
            let gpu = &self.gpu;
            root.visit_meshes(&mut |mesh, world: Mat4| {
                meshes
                    .entry(mesh.id())
                    .or_insert_with(|| upload_mesh(gpu, mesh));
                draws.push((mesh.id(), MeshUniforms::new(view_proj, world, mesh.color)));
            });
        }

        self.ensure_uniform_capacity(draws.len() as u32);
        for (i, (_, uniforms)) in draws.iter().enumerate() {
            self.gpu.queue().write_buffer(
                &self.uniform_buffer,
                i as u64 * self.uniform_stride,
                bytemuck::bytes_of(uniforms),
            );
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(self.gpu.device(), &self.config);
                return Err(RenderError::SurfaceLost(
                    "surface lost, reconfigured".to_string(),
                ));
            }
            Err(err) => return Err(RenderError::Draw(format!("{err:?}"))),
        };

        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(self.pipeline.pipeline());
            for (i, (mesh_id, _)) in draws.iter().enumerate() {
                let gpu_mesh = &self.meshes[mesh_id];
                let offset = (i as u64 * self.uniform_stride) as u32;
                pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}

fn upload_mesh(gpu: &GpuContext, mesh: &MeshData) -> GpuMesh {
    let vertices: Vec<MeshVertex> = mesh
        .positions
        .iter()
        .zip(&mesh.normals)
        .map(|(p, n)| MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect();

    let vertex_buffer = gpu
        .device()
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

    let index_buffer = gpu
        .device()
        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_uniform_buffer(
    device: &wgpu::Device,
    pipeline: &MeshPipeline,
    stride: u64,
    capacity: u32,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Mesh Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Mesh Uniform Bind Group"),
        layout: pipeline.bind_group_layout(),
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<MeshUniforms>() as u64),
            }),
        }],
    });

    (buffer, bind_group)
}

/// Surface provider over named winit windows: each scene identifier maps
/// to one window, each acquire binds a fresh target to it.
pub struct WindowSurfaces {
    gpu: GpuContext,
    windows: HashMap<String, Arc<Window>>,
}

impl WindowSurfaces {
    pub fn new(gpu: GpuContext) -> Self {
        Self {
            gpu,
            windows: HashMap::new(),
        }
    }

    pub fn insert(&mut self, id: impl Into<String>, window: Arc<Window>) {
        self.windows.insert(id.into(), window);
    }
}

impl SurfaceProvider for WindowSurfaces {
    fn acquire(&mut self, id: &str) -> Option<Box<dyn RenderTarget>> {
        let window = self.windows.get(id)?.clone();
        match WindowTarget::new(self.gpu.clone(), window) {
            Ok(target) => Some(Box::new(target)),
            Err(err) => {
                log::error!("failed to bind render target for {id:?}: {err}");
                None
            }
        }
    }
}
