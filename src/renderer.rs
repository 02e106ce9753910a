// Renderer module for Meadow-3D

use winit::{
    event::{Event, WindowEvent, KeyEvent, ElementState},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
    keyboard::{PhysicalKey, KeyCode},
};
use wgpu::{Adapter, RenderPipeline, Buffer};
use std::sync::Arc;
use glam::Mat4;
use std::time::Instant;

use crate::cow::PendingMove;
use crate::draw::{DrawBatch, Vertex};
use crate::panel;
use crate::scene::SceneState;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct Renderer {
    adapter: Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    window: Arc<winit::window::Window>,
    triangle_pipeline: RenderPipeline,
    line_pipeline: RenderPipeline,
    uniform_buffer: Buffer,
    uniform_bind_group: wgpu::BindGroup,
    surface_format: wgpu::TextureFormat,
    depth_view: wgpu::TextureView,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    scene: SceneState,
    batch: DrawBatch,
    last_frame: Instant,
}

// Uniform buffer structure shared with shader.wgsl
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    point_pos: [f32; 4],
    point_color: [f32; 4],
    spot_pos: [f32; 4],
    spot_color: [f32; 4],
    spot_dir: [f32; 4],
    spot_params: [f32; 4],
}

impl Uniforms {
    fn from_scene(scene: &SceneState, view_proj: Mat4) -> Self {
        let g = scene.global_ambient;
        let point = &scene.pointlight;
        let spot = &scene.spotlight;
        let spot_dir = spot.direction().normalize_or_zero();

        Self {
            view_proj: view_proj.to_cols_array_2d(),
            ambient: [g, g, g, 1.0],
            point_pos: [
                point.position.x,
                point.position.y,
                point.position.z,
                if point.enabled { 1.0 } else { 0.0 },
            ],
            point_color: [point.color[0], point.color[1], point.color[2], 1.0],
            spot_pos: [
                spot.position.x,
                spot.position.y,
                spot.position.z,
                if spot.enabled { 1.0 } else { 0.0 },
            ],
            spot_color: [spot.color[0], spot.color[1], spot.color[2], 1.0],
            spot_dir: [
                spot_dir.x,
                spot_dir.y,
                spot_dir.z,
                spot.cutoff.to_radians().cos(),
            ],
            spot_params: [spot.exponent, 0.0, 0.0, 0.0],
        }
    }
}

impl Renderer {
    pub async fn new(event_loop: &EventLoop<()>) -> Self {
        // Create window with Arc for shared ownership
        let window = Arc::new(WindowBuilder::new()
            .with_title("Cow in the Meadow")
            .build(event_loop)
            .unwrap());

        // Initialize wgpu
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        // Get surface from window
        let surface = instance.create_surface(window.clone()).expect("Failed to create surface");

        // Request adapter
        let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }).await.unwrap();

        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Renderer Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::default(),
            },
            None, // Trace path
        ).await.unwrap();

        // Get surface capabilities
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps.formats.iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        // Configure surface
        let size = window.inner_size();
        surface.configure(&device, &wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        });

        let depth_view = create_depth_texture(&device, size.width, size.height);

        // Load shader
        let shader_code = include_str!("shader.wgsl");
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_code.into()),
        });

        // Create bind group layout for uniforms
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let triangle_pipeline = create_pipeline(
            &device,
            &render_pipeline_layout,
            &shader_module,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let line_pipeline = create_pipeline(
            &device,
            &render_pipeline_layout,
            &shader_module,
            surface_format,
            wgpu::PrimitiveTopology::LineList,
        );

        let scene = SceneState::new();

        // Create uniform buffer
        use wgpu::util::DeviceExt;
        let uniform_data = Uniforms::from_scene(&scene, Mat4::IDENTITY);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniform_data]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Create bind group
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });

        // Control panel plumbing
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1);

        log::info!("renderer ready, scene populated");

        Self {
            adapter,
            device,
            queue,
            surface,
            window,
            triangle_pipeline,
            line_pipeline,
            uniform_buffer,
            uniform_bind_group,
            surface_format,
            depth_view,
            egui_ctx,
            egui_state,
            egui_renderer,
            scene,
            batch: DrawBatch::new(),
            last_frame: Instant::now(),
        }
    }

    pub fn run(mut self, event_loop: EventLoop<()>) {
        let _ = event_loop.run(move |event, target| {
            target.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                    let response = self.egui_state.on_window_event(&self.window, &event);
                    if response.repaint {
                        self.window.request_redraw();
                    }

                    match event {
                        WindowEvent::CloseRequested => {
                            target.exit();
                        }
                        WindowEvent::Resized(physical_size) => {
                            self.resize(physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            if self.update_and_render() {
                                target.exit();
                            }
                        }
                        WindowEvent::KeyboardInput { event, .. } if !response.consumed => {
                            self.handle_keyboard_input(event);
                        }
                        _ => {}
                    }
                }
                Event::AboutToWait => {
                    self.window.request_redraw();
                }
                _ => {}
            }
        });
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let surface_caps = self.surface.get_capabilities(&self.adapter);

        self.surface.configure(&self.device, &wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            width: new_size.width,
            height: new_size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        });

        self.depth_view = create_depth_texture(&self.device, new_size.width, new_size.height);
    }

    // One accepted key event maps to one discrete action: arrow keys queue a
    // cow move for the next frame, w/s/a/d move the camera immediately.
    fn handle_keyboard_input(&mut self, event: KeyEvent) {
        if event.state != ElementState::Pressed {
            return;
        }
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::ArrowLeft => self.scene.cow.pending_move = PendingMove::RotateLeft,
                KeyCode::ArrowRight => self.scene.cow.pending_move = PendingMove::RotateRight,
                KeyCode::ArrowUp => self.scene.cow.pending_move = PendingMove::Forward,
                KeyCode::ArrowDown => self.scene.cow.pending_move = PendingMove::Backward,
                KeyCode::KeyA => self.scene.camera.orbit(0.1),
                KeyCode::KeyD => self.scene.camera.orbit(-0.1),
                KeyCode::KeyW => self.scene.camera.ascend(),
                KeyCode::KeyS => self.scene.camera.descend(),
                _ => {}
            }
        }
    }

    // Returns true when the control panel asked to exit.
    fn update_and_render(&mut self) -> bool {
        let now = Instant::now();
        let delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.scene.update(delta_time);

        // Run the control panel before recording the scene, so slider
        // changes land in the same frame.
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let mut exit_requested = false;
        let mut full_output = self.egui_ctx.run(raw_input, |ctx| {
            exit_requested = panel::show(ctx, &mut self.scene).exit;
        });
        let platform_output = std::mem::take(&mut full_output.platform_output);
        self.egui_state
            .handle_platform_output(&self.window, platform_output);

        // Record the scene into the batch; this also advances the cow's
        // animation phases.
        self.batch.clear();
        self.scene.draw(&mut self.batch);

        // Create transformation matrices
        let size = self.window.inner_size();
        let aspect_ratio = size.width as f32 / size.height as f32;
        let projection = Mat4::perspective_rh(
            40.0_f32.to_radians(),
            aspect_ratio,
            1.0,
            150.0,
        );
        let view_proj = projection * self.scene.view_matrix();

        // Update uniform buffer
        let uniforms = Uniforms::from_scene(&self.scene, view_proj);
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[uniforms]),
        );

        self.render(full_output);
        exit_requested
    }

    fn render(&mut self, full_output: egui::FullOutput) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(_) => {
                self.resize(self.window.inner_size());
                return;
            }
        };

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        use wgpu::util::DeviceExt;
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.batch.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&self.batch.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let line_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.batch.line_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // Prepare the control panel's geometry
        let size = self.window.inner_size();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        let clipped = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let egui_cmds = self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped,
            &screen,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.2,
                            b: 0.3,
                            a: 1.0,
                        }),
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
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.triangle_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.batch.indices.len() as u32, 0, 0..1);

            render_pass.set_pipeline(&self.line_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, line_buffer.slice(..));
            render_pass.draw(0..self.batch.line_vertices.len() as u32, 0..1);
        }

        {
            // Control panel on top, without the depth buffer
            let mut panel_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.egui_renderer.render(&mut panel_pass, &clipped, &screen);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue
            .submit(egui_cmds.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
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

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
) -> RenderPipeline {
    // Define vertex buffer layout
    let vertex_buffer_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
        ],
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: "vs_main",
            buffers: &[vertex_buffer_layout],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}

#[cfg(test)]
mod tests {
    // The panel output is consumed in two halves: the platform output goes
    // to the winit side before the frame is drawn, and the shapes and
    // texture deltas go to the paint side afterwards. Both halves must stay
    // usable once the platform half has been taken out.
    #[test]
    fn panel_output_splits_into_platform_and_paint_halves() {
        let ctx = egui::Context::default();
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(800.0, 600.0),
            )),
            ..Default::default()
        };
        let mut full_output = ctx.run(raw_input, |ctx| {
            egui::Window::new("Properties").show(ctx, |ui| {
                ui.label("ok");
            });
        });

        let platform_output = std::mem::take(&mut full_output.platform_output);
        drop(platform_output);

        let paint_jobs =
            ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        assert!(!paint_jobs.is_empty());
        let _ = full_output.textures_delta;
    }
}
