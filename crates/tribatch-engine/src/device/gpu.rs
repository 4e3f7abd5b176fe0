use anyhow::{bail, Context, Result};
use glam::Mat4;

use crate::paint::Color;
use crate::render::Vertex;

use super::{
    AttributeKind, ColorFormat, DepthFormat, Device, TargetDesc, UniformLocation, VertexAttribute,
    WgpuDeviceInit,
};

const MATRIX_BYTES: u64 = std::mem::size_of::<[f32; 16]>() as u64;

/// Uniform names of the batch program, indexed by location.
const UNIFORMS: [&str; 2] = ["projection", "modelView"];

/// Target handle issued by [`WgpuDevice`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GpuTarget(usize);

struct OffscreenTarget {
    desc: TargetDesc,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

/// Headless wgpu implementation of [`Device`].
///
/// Targets are offscreen textures. Every `draw_triangles` call writes the
/// vertices and encodes its own pass, then submits; queue writes are ordered
/// before the next submission, so each draw sees the uniforms uploaded just
/// before it even though the renderer reuses its buffer after every flush.
///
/// Draws do not depth-test: order of submission is the paint order.
pub struct WgpuDevice {
    adapter_name: String,
    device: wgpu::Device,
    queue: wgpu::Queue,

    targets: Vec<OffscreenTarget>,
    draw_target: Option<GpuTarget>,

    attributes: Vec<wgpu::VertexAttribute>,
    stride: u64,

    pipeline: Option<wgpu::RenderPipeline>,
    bind_group: wgpu::BindGroup,
    bind_group_layout: wgpu::BindGroupLayout,
    transforms_ubo: wgpu::Buffer,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,

    frame_index: u64,
    in_frame: bool,
}

impl WgpuDevice {
    /// Acquires an adapter and a logical device.
    pub async fn new(init: WgpuDeviceInit) -> Result<Self> {
        let WgpuDeviceInit {
            backends,
            power_preference,
            force_fallback_adapter,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tribatch device"),
                required_features: wgpu::Features::empty(),
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let adapter_name = adapter.get_info().name;
        log::info!("wgpu adapter: {adapter_name}");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tribatch transforms bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(MATRIX_BYTES * UNIFORMS.len() as u64),
                },
                count: None,
            }],
        });

        let transforms_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tribatch transforms ubo"),
            size: MATRIX_BYTES * UNIFORMS.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tribatch transforms bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: transforms_ubo.as_entire_binding(),
            }],
        });

        Ok(Self {
            adapter_name,
            device,
            queue,
            targets: Vec::new(),
            draw_target: None,
            attributes: Vec::new(),
            stride: 0,
            pipeline: None,
            bind_group,
            bind_group_layout,
            transforms_ubo,
            vbo: None,
            vbo_capacity: 0,
            frame_index: 0,
            in_frame: false,
        })
    }

    /// Blocking variant of [`new`](Self::new).
    pub fn new_blocking(init: WgpuDeviceInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Number of frames finished with `end_frame`.
    pub fn frames_completed(&self) -> u64 {
        self.frame_index
    }

    /// Color texture backing `target`, e.g. for copying out after a frame.
    pub fn color_texture(&self, target: GpuTarget) -> Option<&wgpu::Texture> {
        self.targets.get(target.0).map(|t| &t.color)
    }

    fn ensure_pipeline(&mut self) {
        if self.pipeline.is_some() {
            return;
        }

        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tribatch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tribatch pipeline layout"),
            bind_group_layouts: &[&self.bind_group_layout],
            immediate_size: 0,
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        };

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tribatch pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format(ColorFormat::Rgba8),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline = Some(pipeline);
    }

    fn ensure_vertex_capacity(&mut self, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(256);
        self.vbo = Some(self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tribatch vbo"),
            size: (new_cap * Vertex::STRIDE) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

impl Device for WgpuDevice {
    type Target = GpuTarget;

    fn create_target(&mut self, desc: &TargetDesc) -> Result<GpuTarget> {
        anyhow::ensure!(
            desc.width > 0 && desc.height > 0,
            "render target has zero size ({}x{})",
            desc.width,
            desc.height
        );

        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };

        let color = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tribatch target color"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_format(desc.color),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });

        let depth = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tribatch target depth"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: depth_format(desc.depth),
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());

        self.targets.push(OffscreenTarget {
            desc: *desc,
            color,
            color_view,
            depth_view,
        });

        log::debug!("created {}x{} render target", desc.width, desc.height);
        Ok(GpuTarget(self.targets.len() - 1))
    }

    fn uniform_location(&self, name: &str) -> Result<UniformLocation> {
        UNIFORMS
            .iter()
            .position(|u| *u == name)
            .map(|i| UniformLocation(i as u32))
            .with_context(|| format!("batch program has no uniform `{name}`"))
    }

    fn configure_vertex_attributes(&mut self, attributes: &[VertexAttribute]) -> Result<()> {
        let mut offset = 0u64;
        let mut out = Vec::with_capacity(attributes.len());

        for attr in attributes {
            let format = match (attr.kind, attr.components) {
                (AttributeKind::Float, 1) => wgpu::VertexFormat::Float32,
                (AttributeKind::Float, 2) => wgpu::VertexFormat::Float32x2,
                (AttributeKind::Float, 3) => wgpu::VertexFormat::Float32x3,
                (AttributeKind::Float, 4) => wgpu::VertexFormat::Float32x4,
                (kind, n) => bail!("unsupported vertex attribute {kind:?} x{n}"),
            };
            out.push(wgpu::VertexAttribute {
                format,
                offset,
                shader_location: attr.slot,
            });
            offset += attr.size_bytes() as u64;
        }

        anyhow::ensure!(
            offset == Vertex::STRIDE as u64,
            "attribute layout spans {offset} bytes, vertex stride is {}",
            Vertex::STRIDE
        );

        self.attributes = out;
        self.stride = offset;
        // Layout changed; rebuild on next draw.
        self.pipeline = None;
        Ok(())
    }

    fn begin_frame(&mut self) {
        self.in_frame = true;
        log::trace!("gpu frame {} begin", self.frame_index);
    }

    fn clear_target(&mut self, target: GpuTarget, color: Color, depth: u32) {
        let Some(t) = self.targets.get(target.0) else {
            log::warn!("clear_target: unknown target {target:?}");
            return;
        };

        let [r, g, b, a] = color.to_normalized();
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tribatch clear encoder"),
            });

        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tribatch clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &t.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &t.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear((depth & 0x00FF_FFFF) as f32 / 0x00FF_FFFF as f32),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn set_draw_target(&mut self, target: GpuTarget) {
        if target.0 >= self.targets.len() {
            log::warn!("set_draw_target: unknown target {target:?}");
            return;
        }
        self.draw_target = Some(target);
    }

    fn upload_matrix(&mut self, location: UniformLocation, matrix: &Mat4) {
        if location.0 as usize >= UNIFORMS.len() {
            log::warn!("upload_matrix: no uniform at {location:?}");
            return;
        }
        let cols = matrix.to_cols_array();
        self.queue.write_buffer(
            &self.transforms_ubo,
            location.0 as u64 * MATRIX_BYTES,
            bytemuck::cast_slice(&cols),
        );
    }

    fn draw_triangles(&mut self, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        if !self.in_frame {
            log::warn!("draw_triangles outside a frame; ignored");
            return;
        }
        let Some(target) = self.draw_target else {
            log::warn!("draw_triangles without a draw target; ignored");
            return;
        };

        self.ensure_pipeline();
        self.ensure_vertex_capacity(vertices.len());

        let Some(vbo) = self.vbo.as_ref() else { return };
        self.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(t) = self.targets.get(target.0) else { return };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tribatch draw encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tribatch draw"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &t.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..vertices.len() as u32, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        log::trace!(
            "gpu draw: {} vertices into {}x{} target",
            vertices.len(),
            t.desc.width,
            t.desc.height
        );
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.frame_index = self.frame_index.wrapping_add(1);
    }
}

fn color_format(format: ColorFormat) -> wgpu::TextureFormat {
    match format {
        ColorFormat::Rgba8 => wgpu::TextureFormat::Rgba8Unorm,
    }
}

fn depth_format(format: DepthFormat) -> wgpu::TextureFormat {
    match format {
        DepthFormat::Depth24Stencil8 => wgpu::TextureFormat::Depth24PlusStencil8,
    }
}
