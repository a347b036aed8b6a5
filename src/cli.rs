//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::ocean::{ShadingMode, MAX_SEGMENTS};
use crate::params::{clamp_all, RenderConfig, Rgb, WaterParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ragingsea")]
#[command(about = "Animated raging-sea water surface", long_about = None)]
pub struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Mesh subdivisions per side (1..=2048)
    #[arg(
        long,
        value_name = "N",
        default_value_t = 512,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SEGMENTS as i64)
    )]
    pub segments: u32,

    /// Start in normal-debug shading
    #[arg(long)]
    pub normals: bool,

    /// Write a top-down PNG instead of opening a window
    #[arg(long, value_name = "PATH")]
    pub preview: Option<PathBuf>,

    /// Preview edge length in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 512)]
    pub preview_size: u32,

    /// Elapsed time the preview is rendered at (seconds)
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,

    // === Parameter overrides (clamped to the panel ranges) ===
    #[arg(long, value_name = "AMPLITUDE")]
    pub big_wave_elevation: Option<f32>,

    #[arg(long, value_name = "FREQ")]
    pub big_wave_frequency_x: Option<f32>,

    #[arg(long, value_name = "FREQ")]
    pub big_wave_frequency_y: Option<f32>,

    #[arg(long, value_name = "SPEED")]
    pub big_wave_speed: Option<f32>,

    #[arg(long, value_name = "AMPLITUDE")]
    pub small_wave_elevation: Option<f32>,

    #[arg(long, value_name = "FREQ")]
    pub small_wave_frequency: Option<f32>,

    #[arg(long, value_name = "SPEED")]
    pub small_wave_speed: Option<f32>,

    #[arg(long, value_name = "N")]
    pub small_wave_iterations: Option<u32>,

    /// Trough color as #rrggbb
    #[arg(long, value_name = "HEX")]
    pub depth_color: Option<Rgb>,

    /// Crest color as #rrggbb
    #[arg(long, value_name = "HEX")]
    pub surface_color: Option<Rgb>,

    #[arg(long, value_name = "OFFSET")]
    pub color_offset: Option<f32>,

    #[arg(long, value_name = "GAIN")]
    pub color_multiplier: Option<f32>,
}

impl Args {
    /// Default Parameter Set with any overrides applied, clamped into range
    pub fn water_params(&self) -> WaterParams {
        let mut params = WaterParams::default();

        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut params.big_wave_elevation, self.big_wave_elevation);
        set(&mut params.big_wave_frequency.x, self.big_wave_frequency_x);
        set(&mut params.big_wave_frequency.y, self.big_wave_frequency_y);
        set(&mut params.big_wave_speed, self.big_wave_speed);
        set(&mut params.small_wave_elevation, self.small_wave_elevation);
        set(&mut params.small_wave_frequency, self.small_wave_frequency);
        set(&mut params.small_wave_speed, self.small_wave_speed);
        set(&mut params.small_wave_iterations, self.small_wave_iterations);
        set(&mut params.depth_color, self.depth_color);
        set(&mut params.surface_color, self.surface_color);
        set(&mut params.color_offset, self.color_offset);
        set(&mut params.color_multiplier, self.color_multiplier);

        let before = params.clone();
        clamp_all(&mut params);
        if params != before {
            log::warn!("Some parameter overrides were out of range and have been clamped");
        }

        params.elapsed_time = self.time.max(0.0);
        params
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            mesh_segments: self.segments.clamp(1, MAX_SEGMENTS),
            ..RenderConfig::default()
        }
    }

    pub fn shading_mode(&self) -> ShadingMode {
        if self.normals {
            ShadingMode::Normals
        } else {
            ShadingMode::Elevation
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parameter_set() {
        let args = Args::parse_from(["ragingsea"]);
        assert_eq!(args.water_params(), WaterParams::default());
        assert_eq!(args.shading_mode(), ShadingMode::Elevation);
        assert!(args.preview.is_none());
        assert_eq!(args.render_config().mesh_segments, 512);
    }

    #[test]
    fn test_overrides_apply() {
        let args = Args::parse_from([
            "ragingsea",
            "--big-wave-elevation",
            "0.5",
            "--big-wave-frequency-y",
            "2.5",
            "--small-wave-iterations",
            "2",
            "--surface-color",
            "#ff0000",
            "--normals",
        ]);
        let params = args.water_params();

        assert_eq!(params.big_wave_elevation, 0.5);
        assert_eq!(params.big_wave_frequency.x, 4.0);
        assert_eq!(params.big_wave_frequency.y, 2.5);
        assert_eq!(params.small_wave_iterations, 2);
        assert_eq!(params.surface_color, Rgb::new(255, 0, 0));
        assert_eq!(args.shading_mode(), ShadingMode::Normals);
    }

    #[test]
    fn test_out_of_range_overrides_clamped() {
        let args = Args::parse_from([
            "ragingsea",
            "--small-wave-iterations",
            "40",
            "--color-multiplier",
            "25",
        ]);
        let params = args.water_params();

        assert_eq!(params.small_wave_iterations, 10);
        assert_eq!(params.color_multiplier, 10.0);
    }

    #[test]
    fn test_segments_bounded() {
        assert!(Args::try_parse_from(["ragingsea", "--segments", "65536"]).is_err());
        assert!(Args::try_parse_from(["ragingsea", "--segments", "0"]).is_err());

        let args = Args::parse_from(["ragingsea", "--segments", "2048"]);
        assert_eq!(args.render_config().mesh_segments, MAX_SEGMENTS);
    }

    #[test]
    fn test_non_finite_overrides_fall_back_to_minimum() {
        let args = Args::parse_from(["ragingsea", "--big-wave-elevation", "NaN"]);
        let params = args.water_params();

        assert_eq!(params.big_wave_elevation, 0.0);
        assert!(crate::ocean::WaveField::new(&params).height(0.3, -0.2).is_finite());
    }

    #[test]
    fn test_bad_color_rejected() {
        let result = Args::try_parse_from(["ragingsea", "--depth-color", "blue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preview_arguments() {
        let args = Args::parse_from([
            "ragingsea",
            "--preview",
            "out.png",
            "--preview-size",
            "64",
            "--time",
            "2.5",
        ]);

        assert_eq!(args.preview, Some(PathBuf::from("out.png")));
        assert_eq!(args.preview_size, 64);
        assert_eq!(args.water_params().elapsed_time, 2.5);
    }
}
