//! Raging sea - animated water surface with a live debug panel
//!
//! A subdivided plane is displaced by a sinusoidal swell plus layered noise
//! on the GPU and shaded by elevation between a depth and a surface color.

use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use ragingsea::camera::OrbitCamera;
use ragingsea::cli::Args;
use ragingsea::clock::FrameClock;
use ragingsea::error::Result;
use ragingsea::ocean::{ShadingMode, WaterMesh};
use ragingsea::panel::DebugPanel;
use ragingsea::params::{OrbitConfig, RenderConfig, WaterParams};
use ragingsea::preview::save_preview;
use ragingsea::rendering::{RenderSystem, WaterUniforms};

/// Wheel pixels treated as one line of scrolling
const PIXELS_PER_LINE: f32 = 50.0;

/// Everything that lives between window creation and exit
struct Session {
    window: Arc<Window>,
    render_system: RenderSystem,
    panel: DebugPanel,
    mesh_cell_size: f32,
}

/// Render session state
struct App {
    session: Option<Session>,

    camera: OrbitCamera,
    clock: FrameClock,
    params: WaterParams,
    mode: ShadingMode,

    render_config: RenderConfig,
    fps: f32,
    last_frame: f32,
}

impl App {
    fn new(params: WaterParams, render_config: RenderConfig, mode: ShadingMode) -> Self {
        Self {
            session: None,
            camera: OrbitCamera::new(OrbitConfig::default()),
            clock: FrameClock::new(),
            params,
            mode,
            render_config,
            fps: 0.0,
            last_frame: 0.0,
        }
    }

    fn create_session(&self, event_loop: &ActiveEventLoop) -> Result<Session> {
        let window_attributes = Window::default_attributes()
            .with_title("Raging Sea")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let mesh = WaterMesh::from_config(&self.render_config);
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &mesh,
            &self.render_config,
        ))?;
        let panel = DebugPanel::new(&window, &render_system.device, render_system.surface_format());

        Ok(Session {
            window,
            render_system,
            panel,
            mesh_cell_size: mesh.cell_size(),
        })
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let time_s = self.clock.tick(&mut self.params);
        let dt = time_s - self.last_frame;
        self.last_frame = time_s;
        if dt > 0.0 {
            self.fps = 0.9 * self.fps + 0.1 / dt;
        }

        self.camera.update();
        let (view_proj, _eye) = self
            .camera
            .view_proj(session.render_system.aspect_ratio(), &self.render_config);

        // Panel edits land before the snapshot, so this frame sees them whole
        let panel_frame =
            session
                .panel
                .run(&session.window, &mut self.params, &mut self.mode, self.fps);

        let uniforms = WaterUniforms::snapshot(
            view_proj,
            &self.params,
            session.mesh_cell_size,
            self.mode,
            session.render_system.decodes_srgb(),
        );
        session.render_system.update_uniforms(&uniforms);

        let panel = &mut session.panel;
        match session
            .render_system
            .render(|target| panel.paint(target, panel_frame))
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                session.render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(session) = &self.session {
            session.window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return; // Already initialized
        }

        match self.create_session(event_loop) {
            Ok(session) => {
                log::info!("Raging sea is running (H: panel, N: normals, Esc: quit)");
                self.session = Some(session);
            }
            Err(e) => {
                log::error!("Initialization failed: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        // Widgets get first pick of the input
        let consumed = session.panel.handle_event(&session.window, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } if !consumed => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::KeyH => session.panel.toggle(),
                KeyCode::KeyN => {
                    self.mode = self.mode.toggled();
                    log::info!("Shading mode: {:?}", self.mode);
                }
                _ => {}
            },
            WindowEvent::Resized(size) => {
                session.render_system.resize(size.width, size.height);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !consumed && !session.panel.wants_pointer() => {
                    self.camera.set_dragging(true)
                }
                ElementState::Released => self.camera.set_dragging(false),
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.camera.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Exiting after {} frames", self.clock.frames());
        self.session = None;
    }
}

fn run(args: Args) -> Result<()> {
    let params = args.water_params();
    let render_config = args.render_config();

    if let Some(path) = &args.preview {
        return save_preview(
            path,
            &params,
            args.preview_size,
            render_config.mesh_extent,
            args.shading_mode(),
        );
    }

    log::info!(
        "Opening {}x{} window, {} mesh segments",
        render_config.window_width,
        render_config.window_height,
        render_config.mesh_segments
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params, render_config, args.shading_mode());
    event_loop.run_app(&mut app)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
