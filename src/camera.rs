//! Orbit camera with damped mouse rotation and wheel zoom.

use glam::{Mat4, Vec2, Vec3};

use crate::params::{OrbitConfig, RenderConfig};

/// Camera orbiting a target point on a sphere
///
/// Angles follow the usual spherical convention with +Y up: `theta` is the
/// azimuth measured from +Z towards +X, `phi` the polar angle from +Y.
pub struct OrbitCamera {
    config: OrbitConfig,
    target: Vec3,
    radius: f32,
    theta: f32,
    phi: f32,

    // Pending input, drained by `update`
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,

    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitCamera {
    /// Create camera at `config.position` looking at `config.target`
    pub fn new(config: OrbitConfig) -> Self {
        let target = Vec3::from_array(config.target);
        let offset = Vec3::from_array(config.position) - target;
        let radius = offset
            .length()
            .clamp(config.min_distance, config.max_distance);
        let theta = offset.x.atan2(offset.z);
        let phi = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(config.min_polar, config.max_polar);

        Self {
            config,
            target,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            dragging: false,
            last_cursor: None,
        }
    }

    /// Queue a rotation from a mouse drag of (dx, dy) pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.delta_theta -= dx * self.config.rotate_speed;
        self.delta_phi -= dy * self.config.rotate_speed;
    }

    /// Queue a zoom; positive `lines` moves closer
    pub fn zoom(&mut self, lines: f32) {
        self.scale *= self.config.zoom_speed.powf(-lines);
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        if !dragging {
            self.last_cursor = None;
        }
    }

    /// Feed the cursor position; rotates while a drag is active
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if self.dragging {
            if let Some(last) = self.last_cursor {
                let delta = position - last;
                self.rotate(delta.x, delta.y);
            }
        }
        self.last_cursor = Some(position);
    }

    /// Apply pending input; with damping only a fraction lands per call
    /// and the remainder decays, so motion eases out over a few frames
    pub fn update(&mut self) {
        let factor = self.config.damping_factor.clamp(0.0, 1.0);

        self.theta += self.delta_theta * factor;
        self.phi = (self.phi + self.delta_phi * factor)
            .clamp(self.config.min_polar, self.config.max_polar);
        self.radius =
            (self.radius * self.scale).clamp(self.config.min_distance, self.config.max_distance);

        self.delta_theta *= 1.0 - factor;
        self.delta_phi *= 1.0 - factor;
        self.scale = 1.0;
    }

    /// Current eye position
    pub fn eye(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        self.target
            + self.radius
                * Vec3::new(
                    sin_phi * self.theta.sin(),
                    self.phi.cos(),
                    sin_phi * self.theta.cos(),
                )
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn view_proj(&self, aspect: f32, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.eye();

        // Y stays up; the polar clamp keeps the eye off the pole
        let view = Mat4::look_at_rh(eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            aspect,
            render_config.near_plane,
            render_config.far_plane,
        );

        (proj * view, eye)
    }
}
