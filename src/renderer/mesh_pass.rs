use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;

use super::{GpuMesh, DEPTH_FORMAT, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS};
use crate::mesh::{MeshVertex, PrimitiveKey};

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub(super) struct MeshFrameData {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub ambient: [f32; 4],
    pub dir_light_dir: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub dir_light_color: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub point_light_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    pub point_light_color: [[f32; 4]; MAX_POINT_LIGHTS],
    pub light_counts: [f32; 4],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub(super) struct MeshDrawData {
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub emissive: [f32; 4],
    pub material_params: [f32; 4],
}

/// Blend state a draw is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum BlendKind {
    Opaque,
    Alpha,
    Additive,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct PreparedDraw {
    pub mesh: PrimitiveKey,
    pub blend: BlendKind,
    pub data: MeshDrawData,
}

pub(super) struct MeshPassParams<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: &'a wgpu::TextureView,
    pub clear_color: wgpu::Color,
    pub frame: &'a MeshFrameData,
    pub draws: &'a [PreparedDraw],
    pub meshes: &'a HashMap<PrimitiveKey, GpuMesh>,
}

struct MeshPipelineResources {
    opaque: wgpu::RenderPipeline,
    alpha: wgpu::RenderPipeline,
    additive: wgpu::RenderPipeline,
    draw_bgl: Arc<wgpu::BindGroupLayout>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
}

#[derive(Default)]
pub(super) struct MeshPass {
    resources: Option<MeshPipelineResources>,
    draw_buffer: Option<wgpu::Buffer>,
    draw_bind_group: Option<wgpu::BindGroup>,
    draw_capacity: usize,
    draw_stride: u64,
    staging: Vec<u8>,
}

impl MeshPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ensure_resources(&mut self, device: &wgpu::Device, format: wgpu::TextureFormat) {
        if self.resources.is_some() {
            return;
        }
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Kitchen Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../assets/shaders/kitchen_mesh.wgsl").into()),
        });

        let frame_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Frame BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let draw_bgl = Arc::new(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Draw BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<MeshDrawData>() as u64),
                },
                count: None,
            }],
        }));

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Frame Buffer"),
            size: std::mem::size_of::<MeshFrameData>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Frame BG"),
            layout: &frame_bgl,
            entries: &[wgpu::BindGroupEntry { binding: 0, resource: frame_buffer.as_entire_binding() }],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_bgl, draw_bgl.as_ref()],
            push_constant_ranges: &[],
        });
        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };
        let opaque = create_pipeline(device, &layout, &shader, format, "Mesh Opaque Pipeline", None, true);
        let alpha = create_pipeline(
            device,
            &layout,
            &shader,
            format,
            "Mesh Alpha Pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );
        let additive =
            create_pipeline(device, &layout, &shader, format, "Mesh Additive Pipeline", Some(additive), false);

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment).max(1);
        self.draw_stride = aligned_stride(std::mem::size_of::<MeshDrawData>() as u64, alignment);
        self.draw_buffer = None;
        self.draw_bind_group = None;
        self.draw_capacity = 0;
        self.resources =
            Some(MeshPipelineResources { opaque, alpha, additive, draw_bgl, frame_buffer, frame_bind_group });
    }

    fn ensure_draw_capacity(&mut self, device: &wgpu::Device, count: usize) -> Result<()> {
        if self.draw_capacity >= count && self.draw_buffer.is_some() {
            return Ok(());
        }
        let resources = self.resources.as_ref().context("Mesh pipeline not initialized")?;
        let mut capacity = self.draw_capacity.max(64);
        while capacity < count {
            capacity *= 2;
        }
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Draw Buffer"),
            size: self.draw_stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Mesh Draw BG"),
            layout: resources.draw_bgl.as_ref(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<MeshDrawData>() as u64),
                }),
            }],
        });
        log::debug!("Mesh draw buffer grown to {capacity} slots");
        self.draw_buffer = Some(buffer);
        self.draw_bind_group = Some(bind_group);
        self.draw_capacity = capacity;
        Ok(())
    }

    /// Draws `params.draws` in order; callers sort opaque before blended.
    pub fn render(&mut self, params: MeshPassParams<'_>) -> Result<()> {
        self.ensure_draw_capacity(params.device, params.draws.len().max(1))?;
        let stride = self.draw_stride as usize;
        self.staging.clear();
        self.staging.resize(stride * params.draws.len(), 0);
        for (slot, draw) in params.draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.data);
            self.staging[slot * stride..slot * stride + bytes.len()].copy_from_slice(bytes);
        }

        let resources = self.resources.as_ref().context("Mesh pipeline not initialized")?;
        let draw_buffer = self.draw_buffer.as_ref().context("Mesh draw buffer missing")?;
        let draw_bind_group = self.draw_bind_group.as_ref().context("Mesh draw bind group missing")?;
        params.queue.write_buffer(&resources.frame_buffer, 0, bytemuck::bytes_of(params.frame));
        if !self.staging.is_empty() {
            params.queue.write_buffer(draw_buffer, 0, &self.staging);
        }

        let mut pass = params.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Kitchen Mesh Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: params.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations { load: wgpu::LoadOp::Clear(params.clear_color), store: wgpu::StoreOp::Store },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: params.depth_view,
                depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_bind_group(0, &resources.frame_bind_group, &[]);

        let mut bound: Option<BlendKind> = None;
        for (slot, draw) in params.draws.iter().enumerate() {
            let Some(mesh) = params.meshes.get(&draw.mesh) else {
                continue;
            };
            if bound != Some(draw.blend) {
                let pipeline = match draw.blend {
                    BlendKind::Opaque => &resources.opaque,
                    BlendKind::Alpha => &resources.alpha,
                    BlendKind::Additive => &resources.additive,
                };
                pass.set_pipeline(pipeline);
                bound = Some(draw.blend);
            }
            let offset = (slot as u64 * self.draw_stride) as u32;
            pass.set_bind_group(1, draw_bind_group, &[offset]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend.unwrap_or(wgpu::BlendState::REPLACE)),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        // Planes and door panels are seen from both sides.
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub(super) fn aligned_stride(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}
