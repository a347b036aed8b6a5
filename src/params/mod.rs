//! Parameter definitions with units and documented ranges.
//!
//! All tunable numbers live here:
//! - the shared water Parameter Set and its editing bounds
//! - window/projection/mesh configuration
//! - orbit camera behaviour

mod camera;
pub mod controls;
mod render;
mod water;

// Re-export all types
pub use camera::OrbitConfig;
pub use controls::{clamp_all, controls_in, Control, ControlGroup, ControlKind, CONTROLS};
pub use render::RenderConfig;
pub use water::{ParseRgbError, Rgb, WaterParams};
