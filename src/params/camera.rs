//! Orbit camera configuration.

/// Orbit controls parameters
#[derive(Debug, Clone)]
pub struct OrbitConfig {
    /// Initial eye position (world units)
    pub position: [f32; 3],

    /// Point the camera orbits around (world units)
    pub target: [f32; 3],

    /// Fraction of the pending rotation/zoom applied per update (0..1).
    /// 1.0 disables damping.
    pub damping_factor: f32,

    /// Radians of rotation per pixel of mouse drag
    pub rotate_speed: f32,

    /// Zoom scale per wheel line (>1)
    pub zoom_speed: f32,

    /// Closest allowed eye distance to the target
    pub min_distance: f32,

    /// Farthest allowed eye distance to the target
    pub max_distance: f32,

    /// Polar angle limits measured from +Y (radians)
    pub min_polar: f32,
    pub max_polar: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            position: [1.0, 1.0, 1.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 1.05,
            min_distance: 0.2,
            max_distance: 20.0,
            min_polar: 0.01,
            max_polar: std::f32::consts::PI - 0.01,
        }
    }
}
