//! GPU renderer for the 3D product view
//!
//! Renders the garment mesh into an offscreen texture that egui displays as a
//! regular image. The camera is fixed (45 degree fov, eye on the +Z axis);
//! rotation and body scale ride in the model matrix. Mesh and texture uploads
//! are driven by the surface's revision counters, so nothing is re-uploaded
//! on frames where only the rotation advanced.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::mesh::GarmentVertex;
use crate::surface::Mesh3DSurface;
use crate::texture::RenderTexture;

/// Scene uniform buffer data
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
}

/// Fixed camera: 45 degree fov, eye at z = 5 looking at the origin
fn view_projection(aspect: f32) -> glam::Mat4 {
    let projection = glam::Mat4::perspective_rh(std::f32::consts::FRAC_PI_4, aspect, 0.1, 100.0);
    let view = glam::Mat4::look_at_rh(
        glam::Vec3::new(0.0, 0.0, 5.0),
        glam::Vec3::ZERO,
        glam::Vec3::Y,
    );
    projection * view
}

/// Offscreen renderer for the rotating garment
pub struct GarmentRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,

    // Mesh buffers (recreated when the surface attaches a new mesh)
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    uploaded_mesh_revision: u64,

    // Print texture (white 1x1 stands in for the untextured default material)
    garment_texture: wgpu::Texture,
    garment_view: wgpu::TextureView,
    uploaded_texture_revision: u64,

    // Offscreen render target
    render_texture: Option<wgpu::Texture>,
    render_view: Option<wgpu::TextureView>,
    depth_view: Option<wgpu::TextureView>,
    render_width: u32,
    render_height: u32,

    // egui handle for displaying the render target
    egui_texture_id: Option<egui::TextureId>,
}

impl GarmentRenderer {
    /// Create the pipeline and default resources
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Garment 3D Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/garment_3d.wgsl").into()),
        });

        // Bind group layout: [0] scene uniforms, [1] garment texture, [2] sampler
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Garment Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Garment Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Garment Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[GarmentVertex::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // Garment insides stay visible while rotating
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Garment Scene Buffer"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Garment Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Untextured default material
        let white = RenderTexture::solid(1, 1, [255, 255, 255, 255]);
        let (garment_texture, garment_view) = Self::create_pixel_texture(device, queue, &white);

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler,
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
            uploaded_mesh_revision: 0,
            garment_texture,
            garment_view,
            uploaded_texture_revision: 0,
            render_texture: None,
            render_view: None,
            depth_view: None,
            render_width: 0,
            render_height: 0,
            egui_texture_id: None,
        }
    }

    fn create_pixel_texture(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: &RenderTexture,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Garment Print Texture"),
            size: wgpu::Extent3d {
                width: source.width,
                height: source.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &source.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(source.width * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: source.width,
                height: source.height,
                depth_or_array_layers: 1,
            },
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Sync mesh buffers with the surface's attached mesh
    fn sync_mesh(&mut self, device: &wgpu::Device, surface: &Mesh3DSurface) {
        if self.uploaded_mesh_revision == surface.mesh_revision() {
            return;
        }
        self.uploaded_mesh_revision = surface.mesh_revision();

        match surface.mesh() {
            Some(mesh) => {
                self.vertex_buffer =
                    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Garment Vertex Buffer"),
                        contents: bytemuck::cast_slice(&mesh.vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }));
                self.index_buffer =
                    Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Garment Index Buffer"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }));
                self.index_count = mesh.index_count() as u32;
            }
            None => {
                // Load in flight: keep nothing attached, the pass just clears
                self.vertex_buffer = None;
                self.index_buffer = None;
                self.index_count = 0;
            }
        }
    }

    /// Sync the print texture with the surface
    fn sync_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, surface: &Mesh3DSurface) {
        if self.uploaded_texture_revision == surface.texture_revision() {
            return;
        }
        self.uploaded_texture_revision = surface.texture_revision();

        let white = RenderTexture::solid(1, 1, [255, 255, 255, 255]);
        let source = surface.texture().unwrap_or(&white);
        let (texture, view) = Self::create_pixel_texture(device, queue, source);
        self.garment_texture = texture;
        self.garment_view = view;
    }

    /// Ensure the offscreen target matches the requested size
    fn ensure_render_target(
        &mut self,
        device: &wgpu::Device,
        egui_renderer: &mut eframe::egui_wgpu::Renderer,
        width: u32,
        height: u32,
    ) {
        let width = width.max(1);
        let height = height.max(1);
        if self.render_width == width && self.render_height == height {
            return;
        }

        let render_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Garment Render Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Garment Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let render_view = render_texture.create_view(&Default::default());
        self.depth_view = Some(depth_texture.create_view(&Default::default()));

        // Register (or re-register) the target with egui for display
        match self.egui_texture_id {
            Some(id) => egui_renderer.update_egui_texture_from_wgpu_texture(
                device,
                &render_view,
                wgpu::FilterMode::Linear,
                id,
            ),
            None => {
                self.egui_texture_id = Some(egui_renderer.register_native_texture(
                    device,
                    &render_view,
                    wgpu::FilterMode::Linear,
                ));
            }
        }

        self.render_view = Some(render_view);
        self.render_texture = Some(render_texture);
        self.render_width = width;
        self.render_height = height;
    }

    /// Render one frame of the surface, returning the egui texture to show
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        egui_renderer: &mut eframe::egui_wgpu::Renderer,
        surface: &Mesh3DSurface,
        width: u32,
        height: u32,
    ) -> Option<egui::TextureId> {
        self.ensure_render_target(device, egui_renderer, width, height);
        self.sync_mesh(device, surface);
        self.sync_texture(device, queue, surface);

        let aspect = self.render_width as f32 / self.render_height as f32;
        let model = glam::Mat4::from_rotation_y(surface.rotation())
            * glam::Mat4::from_scale(surface.scale().to_vec3());
        let uniforms = SceneUniforms {
            view_proj: view_projection(aspect).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Garment Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&self.garment_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let render_view = self.render_view.as_ref()?;
        let depth_view = self.depth_view.as_ref()?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Garment Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Garment Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: render_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.97,
                            g: 0.97,
                            b: 0.97,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &bind_group, &[]);

            if let (Some(vb), Some(ib)) = (&self.vertex_buffer, &self.index_buffer) {
                render_pass.set_vertex_buffer(0, vb.slice(..));
                render_pass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }
        queue.submit(std::iter::once(encoder.finish()));

        self.egui_texture_id
    }
}
