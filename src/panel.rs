//! Debug panel: live editing of the Parameter Set through egui.
//!
//! Widgets are generated from [`crate::params::CONTROLS`]; the panel never
//! names a field itself. Edits land in the caller's `WaterParams` between
//! frames, so the next uniform snapshot picks them up.

use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use egui_winit::State as EguiWinitState;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::ocean::ShadingMode;
use crate::params::{controls_in, Control, ControlGroup, ControlKind, WaterParams};
use crate::rendering::FrameTarget;

/// Tessellated output of one panel frame, waiting to be painted
pub struct PanelFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    pixels_per_point: f32,
}

pub struct DebugPanel {
    ctx: egui::Context,
    state: EguiWinitState,
    renderer: EguiRenderer,
    visible: bool,
}

impl DebugPanel {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = EguiWinitState::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = EguiRenderer::new(device, format, None, 1, false);

        Self {
            ctx,
            state,
            renderer,
            visible: true,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug panel {}", if self.visible { "shown" } else { "hidden" });
    }

    /// Forward a window event; returns true if the panel consumed it
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        self.visible && response.consumed
    }

    /// True while the pointer is over a panel widget
    pub fn wants_pointer(&self) -> bool {
        self.visible && self.ctx.wants_pointer_input()
    }

    /// Build this frame's UI, applying slider edits to `params`
    pub fn run(
        &mut self,
        window: &Window,
        params: &mut WaterParams,
        mode: &mut ShadingMode,
        fps: f32,
    ) -> PanelFrame {
        let raw_input = self.state.take_egui_input(window);
        let visible = self.visible;

        let full_output = self.ctx.run(raw_input, |ctx| {
            if !visible {
                return;
            }
            egui::Window::new("Water")
                .default_width(280.0)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!(
                        "t = {:.2}s   {:.0} fps",
                        params.elapsed_time, fps
                    ));

                    let mut normals = *mode == ShadingMode::Normals;
                    if ui.checkbox(&mut normals, "Show normals (N)").changed() {
                        *mode = mode.toggled();
                        log::info!("Shading mode: {:?}", mode);
                    }

                    for group in ControlGroup::ALL {
                        egui::CollapsingHeader::new(group.title())
                            .default_open(true)
                            .show(ui, |ui| {
                                for control in controls_in(group) {
                                    if control_widget(ui, control, params) {
                                        log::debug!(
                                            "{} = {}",
                                            control.label,
                                            control.describe(params)
                                        );
                                    }
                                }
                            });
                    }

                    ui.separator();
                    ui.small("Drag to orbit, scroll to zoom, H hides this panel");
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        PanelFrame {
            paint_jobs: self.ctx.tessellate(full_output.shapes, pixels_per_point),
            textures: full_output.textures_delta,
            pixels_per_point,
        }
    }

    /// Paint `frame` over the water pass; returns buffers to submit first
    pub fn paint(&mut self, target: FrameTarget<'_>, frame: PanelFrame) -> Vec<wgpu::CommandBuffer> {
        let FrameTarget {
            device,
            queue,
            encoder,
            view,
            size_in_pixels,
        } = target;

        for (id, delta) in &frame.textures.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen = ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };
        let buffers =
            self.renderer
                .update_buffers(device, queue, encoder, &frame.paint_jobs, &screen);

        {
            let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer
                .render(&mut rpass.forget_lifetime(), &frame.paint_jobs, &screen);
        }

        for id in &frame.textures.free {
            self.renderer.free_texture(id);
        }

        buffers
    }
}

/// One widget per control; returns true when the user changed the value
fn control_widget(ui: &mut egui::Ui, control: &Control, params: &mut WaterParams) -> bool {
    match control.kind {
        ControlKind::Scalar {
            field,
            min,
            max,
            step,
        } => ui
            .add(
                egui::Slider::new(field(params), min..=max)
                    .step_by(step as f64)
                    .text(control.label),
            )
            .changed(),
        ControlKind::Integer { field, min, max } => ui
            .add(egui::Slider::new(field(params), min..=max).text(control.label))
            .changed(),
        ControlKind::Color { field } => {
            ui.horizontal(|ui| {
                let changed = ui.color_edit_button_srgb(&mut field(params).0).changed();
                ui.label(control.label);
                changed
            })
            .inner
        }
    }
}
