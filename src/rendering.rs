//! Rendering system with wgpu pipeline and shader management.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::{Error, Result};
use crate::ocean::{ShadingMode, Vertex, WaterMesh};
use crate::params::{RenderConfig, WaterParams};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-frame snapshot of the Parameter Set plus camera, as laid out in `water.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaterUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub depth_color: [f32; 4],
    pub surface_color: [f32; 4],
    pub big_wave_frequency: [f32; 2],
    pub big_wave_elevation: f32,
    pub big_wave_speed: f32,
    pub small_wave_elevation: f32,
    pub small_wave_frequency: f32,
    pub small_wave_speed: f32,
    pub small_wave_iterations: u32,
    pub color_offset: f32,
    pub color_multiplier: f32,
    pub time: f32,
    pub normal_step: f32,
    pub shading_mode: u32,
    pub decode_srgb: u32,
    pub _padding: [u32; 2], // Pad to 160 bytes (16-byte multiple)
}

impl WaterUniforms {
    /// Read every field of `params` once; the GPU never sees a half-updated set
    pub fn snapshot(
        view_proj: Mat4,
        params: &WaterParams,
        normal_step: f32,
        mode: ShadingMode,
        decode_srgb: bool,
    ) -> Self {
        let depth = params.depth_color.to_vec3();
        let surface = params.surface_color.to_vec3();

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            depth_color: depth.extend(1.0).to_array(),
            surface_color: surface.extend(1.0).to_array(),
            big_wave_frequency: params.big_wave_frequency.to_array(),
            big_wave_elevation: params.big_wave_elevation,
            big_wave_speed: params.big_wave_speed,
            small_wave_elevation: params.small_wave_elevation,
            small_wave_frequency: params.small_wave_frequency,
            small_wave_speed: params.small_wave_speed,
            small_wave_iterations: params.small_wave_iterations,
            color_offset: params.color_offset,
            color_multiplier: params.color_multiplier,
            time: params.elapsed_time,
            normal_step,
            shading_mode: mode.as_u32(),
            decode_srgb: decode_srgb as u32,
            _padding: [0; 2],
        }
    }
}

/// What an overlay (the debug panel) gets to draw into after the water pass
pub struct FrameTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
    pub size_in_pixels: [u32; 2],
}

/// Rendering system managing wgpu device, pipeline, and buffers
pub struct RenderSystem {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    index_count: u32,
    clear_color: wgpu::Color,
}

impl RenderSystem {
    /// Create new rendering system
    pub async fn new(
        window: Arc<Window>,
        mesh: &WaterMesh,
        render_config: &RenderConfig,
    ) -> Result<Self> {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // Create surface (window must have 'static lifetime via Arc)
        let surface = instance.create_surface(window)?;

        // Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(Error::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info());

        // Request device
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(Error::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Load shaders
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("water.wgsl").into()),
        });

        // Create buffers
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniforms = WaterUniforms::snapshot(
            Mat4::IDENTITY,
            &WaterParams::default(),
            mesh.cell_size(),
            ShadingMode::default(),
            surface_format.is_srgb(),
        );

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Both stages read the Parameter Set
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Water Bind Group Layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Water Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Water Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Visible from below while orbiting
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let depth_view = create_depth_view(&device, &config);
        let [r, g, b] = render_config.clear_color;

        log::info!(
            "Water mesh: {} vertices, {} triangles, surface {:?} {}x{}",
            mesh.vertices.len(),
            mesh.indices.len() / 3,
            surface_format,
            config.width,
            config.height
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            index_count: mesh.indices.len() as u32,
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    /// Whether fragment colors must be decoded before an sRGB write
    pub fn decodes_srgb(&self) -> bool {
        self.config.format.is_srgb()
    }

    /// Reconfigure surface and depth buffer; zero-sized requests are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, &self.config);
        log::debug!("Surface resized to {}x{}", width, height);
    }

    /// Reconfigure at the current size (after `SurfaceError::Lost/Outdated`)
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size();
        self.resize(width, height);
    }

    /// Update water uniforms
    pub fn update_uniforms(&self, uniforms: &WaterUniforms) {
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    /// Render the water, then let `overlay` draw on top of the same frame
    pub fn render<F>(&self, overlay: F) -> Result<(), wgpu::SurfaceError>
    where
        F: FnOnce(FrameTarget<'_>) -> Vec<wgpu::CommandBuffer>,
    {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Water Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
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

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        let extra = overlay(FrameTarget {
            device: &self.device,
            queue: &self.queue,
            encoder: &mut encoder,
            view: &view,
            size_in_pixels: [self.config.width, self.config.height],
        });

        self.queue
            .submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;

    #[test]
    fn test_uniform_layout_matches_shader() {
        // 64 (matrix) + 2 * 16 (colors) + 8 (vec2) + 14 * 4 scalars
        assert_eq!(std::mem::size_of::<WaterUniforms>(), 160);
        assert_eq!(std::mem::size_of::<WaterUniforms>() % 16, 0);
    }

    fn water_module() -> naga::Module {
        naga::front::wgsl::parse_str(include_str!("water.wgsl"))
            .unwrap_or_else(|e| panic!("water.wgsl: {}", e.emit_to_string(include_str!("water.wgsl"))))
    }

    #[test]
    fn test_shader_validates() {
        let module = water_module();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("water.wgsl should validate");

        let mut entry_points: Vec<_> = module
            .entry_points
            .iter()
            .map(|ep| (ep.name.as_str(), ep.stage))
            .collect();
        entry_points.sort_by_key(|(name, _)| *name);
        assert_eq!(
            entry_points,
            [
                ("fs_main", naga::ShaderStage::Fragment),
                ("vs_main", naga::ShaderStage::Vertex),
            ]
        );
    }

    #[test]
    fn test_shader_uniform_size_matches_rust() {
        let module = water_module();
        let (_, ty) = module
            .types
            .iter()
            .find(|(_, ty)| ty.name.as_deref() == Some("WaterUniforms"))
            .expect("WaterUniforms struct in water.wgsl");

        let wgsl_size = ty.inner.size(module.to_ctx());
        assert_eq!(wgsl_size as usize, std::mem::size_of::<WaterUniforms>());
    }

    #[test]
    fn test_snapshot_copies_every_field() {
        let params = WaterParams {
            big_wave_elevation: 0.5,
            small_wave_iterations: 7,
            surface_color: Rgb::new(255, 0, 0),
            color_multiplier: 2.5,
            elapsed_time: 12.0,
            ..WaterParams::default()
        };
        let u = WaterUniforms::snapshot(
            Mat4::IDENTITY,
            &params,
            0.01,
            ShadingMode::Normals,
            true,
        );

        assert_eq!(u.big_wave_elevation, 0.5);
        assert_eq!(u.big_wave_frequency, [4.0, 1.5]);
        assert_eq!(u.small_wave_iterations, 7);
        assert_eq!(u.surface_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(u.color_multiplier, 2.5);
        assert_eq!(u.time, 12.0);
        assert_eq!(u.normal_step, 0.01);
        assert_eq!(u.shading_mode, 1);
        assert_eq!(u.decode_srgb, 1);
        assert_eq!(u.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }
}
