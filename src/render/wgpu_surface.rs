//! wgpu backend.
//!
//! Draws every mesh either as a line list (edge outlines) or as instanced
//! camera-facing quads (point sprites). Per-draw data goes through a single
//! uniform buffer addressed with dynamic offsets. Geometry buffers are
//! created once per shared geometry and rewritten only when the geometry's
//! version changes, which in practice means only the particles.

use std::borrow::Cow;
use bytemuck::{Pod, Zeroable};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use crate::errors::{HeroError, Result};
use crate::render::{RenderFrame, RenderSurface};
use crate::resources::{Geometry, GeometryHandle, Topology};
use crate::settings::RenderSettings;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];

/// Vertices per point sprite.
const SPRITE_VERTICES: u32 = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    camera_right: [f32; 4],
    camera_up: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

/// GPU copy of one shared [`Geometry`].
struct GpuGeometry {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    vertex_count: u32,
    topology: Topology,
    version: u64,
}

impl GpuGeometry {
    fn create(device: &wgpu::Device, geometry: &Geometry) -> Self {
        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Positions", geometry.name)),
            contents: bytemuck::cast_slice(geometry.positions()),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        // Geometries without vertex colors get white, which the shader's
        // tint leaves unchanged.
        let white;
        let colors: &[[f32; 3]] = match geometry.colors() {
            Some(colors) => colors,
            None => {
                white = vec![[1.0_f32; 3]; geometry.positions().len()];
                &white
            }
        };
        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Colors", geometry.name)),
            contents: bytemuck::cast_slice(colors),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            positions,
            colors,
            vertex_count: geometry.vertex_count(),
            topology: geometry.topology(),
            version: geometry.version(),
        }
    }
}

/// A window surface plus everything needed to draw the scene onto it.
pub struct WgpuSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    clear_color: wgpu::Color,
    depth_view: wgpu::TextureView,

    line_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: u32,
    draw_stride: u32,
    draw_staging: Vec<u8>,

    geometries: FxHashMap<GeometryHandle, GpuGeometry>,
}

impl WgpuSurface {
    /// Creates the device, configures `window`'s surface and builds the
    /// pipelines.
    pub async fn new<W>(window: W, width: u32, height: u32, settings: &RenderSettings) -> Result<Self>
    where
        W: HasWindowHandle + HasDisplayHandle + Send + Sync + 'static,
    {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: settings.power_preference(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| HeroError::AdapterRequestFailed(e.to_string()))?;

        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Hero Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or(HeroError::SurfaceUnsupported)?;
        config.present_mode = if settings.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        let depth_view = create_depth_view(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Unlit Shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/unlit.wgsl"))),
        });

        let frame_size = std::mem::size_of::<FrameUniforms>() as u64;
        let draw_size = std::mem::size_of::<DrawUniforms>() as u64;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame BindGroup Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(frame_size),
                },
                count: None,
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw BindGroup Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(draw_size),
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: frame_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame BindGroup"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let min_alignment = device.limits().min_uniform_buffer_offset_alignment.max(1);
        let draw_stride = align_to(draw_size as u32, min_alignment);
        let draw_capacity = 32;
        let draw_buffer = create_draw_buffer(&device, draw_stride, draw_capacity);
        let draw_bind_group = create_draw_bind_group(&device, &draw_layout, &draw_buffer);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Unlit Pipeline Layout"),
            bind_group_layouts: &[Some(&frame_layout), Some(&draw_layout)],
            immediate_size: 0,
        });

        let line_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            &PipelineVariant {
                label: "Line Pipeline",
                entry_point: "vs_line",
                topology: wgpu::PrimitiveTopology::LineList,
                step_mode: wgpu::VertexStepMode::Vertex,
                depth_write: true,
            },
        );
        let point_pipeline = create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            config.format,
            &PipelineVariant {
                label: "Point Sprite Pipeline",
                entry_point: "vs_point",
                topology: wgpu::PrimitiveTopology::TriangleList,
                step_mode: wgpu::VertexStepMode::Instance,
                depth_write: false,
            },
        );

        log::info!(
            "Surface configured: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            device,
            queue,
            surface,
            config,
            clear_color: settings.wgpu_clear_color(),
            depth_view,
            line_pipeline,
            point_pipeline,
            frame_buffer,
            frame_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity,
            draw_stride,
            draw_staging: Vec::new(),
            geometries: FxHashMap::default(),
        })
    }

    /// Uploads new geometries and refreshes the ones whose version moved.
    fn sync_geometries(&mut self, frame: &RenderFrame<'_>) {
        for item in &frame.items {
            let Some(geometry) = frame.registry.geometry(item.geometry) else {
                continue;
            };
            if geometry.vertex_count() == 0 {
                continue;
            }

            match self.geometries.get_mut(&item.geometry) {
                Some(gpu) if gpu.version == geometry.version() => {}
                Some(gpu) if gpu.vertex_count == geometry.vertex_count() => {
                    self.queue
                        .write_buffer(&gpu.positions, 0, bytemuck::cast_slice(geometry.positions()));
                    gpu.version = geometry.version();
                }
                _ => {
                    log::debug!("Uploading geometry '{}'", geometry.name);
                    self.geometries
                        .insert(item.geometry, GpuGeometry::create(&self.device, geometry));
                }
            }
        }
    }

    fn ensure_draw_capacity(&mut self, required: u32) {
        if required <= self.draw_capacity {
            return;
        }
        let mut capacity = self.draw_capacity.max(1);
        while capacity < required {
            capacity = capacity.saturating_mul(2);
        }
        self.draw_buffer = create_draw_buffer(&self.device, self.draw_stride, capacity);
        self.draw_bind_group = create_draw_bind_group(&self.device, &self.draw_layout, &self.draw_buffer);
        self.draw_capacity = capacity;
    }

    fn write_uniforms(&mut self, frame: &RenderFrame<'_>) {
        let frame_uniforms = FrameUniforms {
            view_proj: frame.view_projection.to_cols_array_2d(),
            camera_right: frame.camera_right.extend(0.0).to_array(),
            camera_up: frame.camera_up.extend(0.0).to_array(),
        };
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame_uniforms));

        let count = frame.items.len() as u32;
        self.ensure_draw_capacity(count);

        let stride = self.draw_stride as usize;
        self.draw_staging.clear();
        self.draw_staging.resize(stride * frame.items.len(), 0);
        for (i, item) in frame.items.iter().enumerate() {
            let Some(material) = frame.registry.material(item.material) else {
                continue;
            };
            let uniforms = DrawUniforms {
                model: item.model.to_cols_array_2d(),
                color: material.rgba().to_array(),
                params: [
                    material.point_size,
                    if material.vertex_colors { 1.0 } else { 0.0 },
                    0.0,
                    0.0,
                ],
            };
            let bytes = bytemuck::bytes_of(&uniforms);
            self.draw_staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !self.draw_staging.is_empty() {
            self.queue.write_buffer(&self.draw_buffer, 0, &self.draw_staging);
        }
    }
}

impl RenderSurface for WgpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring zero-sized surface resize ({width}x{height})");
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
    }

    fn draw(&mut self, frame: &RenderFrame<'_>) {
        self.sync_geometries(frame);
        self.write_uniforms(frame);

        let output = match self.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            status => {
                match FrameSkip::from_status(&status) {
                    FrameSkip::Reconfigure => self.surface.configure(&self.device, &self.config),
                    FrameSkip::Wait => log::debug!("Surface texture unavailable, skipping frame"),
                    FrameSkip::Failed => log::error!("Render error: surface texture validation failed"),
                }
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Hero Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Hero Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
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
                ..Default::default()
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            let mut bound: Option<Topology> = None;
            for (i, item) in frame.items.iter().enumerate() {
                let Some(gpu) = self.geometries.get(&item.geometry) else {
                    continue;
                };

                if bound != Some(gpu.topology) {
                    pass.set_pipeline(match gpu.topology {
                        Topology::LineList => &self.line_pipeline,
                        Topology::PointList => &self.point_pipeline,
                    });
                    bound = Some(gpu.topology);
                }

                let offset = i as u32 * self.draw_stride;
                pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                pass.set_vertex_buffer(0, gpu.positions.slice(..));
                pass.set_vertex_buffer(1, gpu.colors.slice(..));

                match gpu.topology {
                    Topology::LineList => pass.draw(0..gpu.vertex_count, 0..1),
                    Topology::PointList => pass.draw(0..SPRITE_VERTICES, 0..gpu.vertex_count),
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
    }
}

struct PipelineVariant {
    label: &'static str,
    entry_point: &'static str,
    topology: wgpu::PrimitiveTopology,
    step_mode: wgpu::VertexStepMode,
    depth_write: bool,
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    variant: &PipelineVariant,
) -> wgpu::RenderPipeline {
    let vertex_buffers = [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: variant.step_mode,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: variant.step_mode,
            attributes: &COLOR_ATTRIBUTES,
        },
    ];

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(variant.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(variant.entry_point),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: variant.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(depth_state(variant.depth_write)),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

/// Why a frame was dropped when no surface texture could be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameSkip {
    /// Lost or outdated: reconfigure and draw again next frame.
    Reconfigure,
    /// Timed out or occluded.
    Wait,
    Failed,
}

impl FrameSkip {
    fn from_status(status: &wgpu::CurrentSurfaceTexture) -> Self {
        match status {
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                Self::Reconfigure
            }
            wgpu::CurrentSurfaceTexture::Success(_)
            | wgpu::CurrentSurfaceTexture::Suboptimal(_)
            | wgpu::CurrentSurfaceTexture::Timeout
            | wgpu::CurrentSurfaceTexture::Occluded => Self::Wait,
            wgpu::CurrentSurfaceTexture::Validation => Self::Failed,
        }
    }
}

fn depth_state(depth_write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: Some(depth_write),
        depth_compare: Some(wgpu::CompareFunction::LessEqual),
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
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

fn create_draw_buffer(device: &wgpu::Device, stride: u32, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: u64::from(stride) * u64::from(capacity),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_draw_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw BindGroup"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
            }),
        }],
    })
}

fn align_to(value: u32, alignment: u32) -> u32 {
    value.div_ceil(alignment) * alignment
}
