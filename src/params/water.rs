//! The shared Parameter Set read by both wave stages every frame.

use std::fmt;
use std::str::FromStr;

use glam::{Vec2, Vec3};

/// sRGB-encoded 8-bit color, as typed into a color picker (`#rrggbb`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Channels as unit floats, still sRGB-encoded
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Error returned when a `#rrggbb` string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseRgbError(s.to_string()))
        };

        Ok(Self([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
    }
}

/// Wave and color parameters, mutated in place by the debug panel
///
/// Planar coordinates are world X/Z; the surface is displaced along +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterParams {
    // === Primary swell ===
    /// Amplitude of the primary wave (world units, 0..1)
    pub big_wave_elevation: f32,

    /// Spatial frequency along X and Z (radians per world unit, 0..10 each)
    pub big_wave_frequency: Vec2,

    /// Temporal speed multiplier of the primary wave (0..10)
    pub big_wave_speed: f32,

    // === Secondary octaves ===
    /// Amplitude of the first noise octave (0..1)
    pub small_wave_elevation: f32,

    /// Base spatial frequency of the noise octaves (0..30)
    pub small_wave_frequency: f32,

    /// Temporal speed multiplier of the noise octaves (0..4)
    pub small_wave_speed: f32,

    /// Number of noise octaves summed (0..10)
    pub small_wave_iterations: u32,

    // === Color ===
    /// Trough color
    pub depth_color: Rgb,

    /// Crest color
    pub surface_color: Rgb,

    /// Bias added to the height before the gradient lookup (0..1)
    pub color_offset: f32,

    /// Gain applied to the biased height (0..10)
    pub color_multiplier: f32,

    /// Seconds since session start, written by the frame clock
    pub elapsed_time: f32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            big_wave_elevation: 0.2,
            big_wave_frequency: Vec2::new(4.0, 1.5),
            big_wave_speed: 0.75,

            small_wave_elevation: 0.15,
            small_wave_frequency: 3.0,
            small_wave_speed: 0.4,
            small_wave_iterations: 4,

            depth_color: Rgb::new(0x22, 0x33, 0xa5),
            surface_color: Rgb::new(0x88, 0xe9, 0xff),
            color_offset: 0.09,
            color_multiplier: 4.0,

            elapsed_time: 0.0,
        }
    }
}
