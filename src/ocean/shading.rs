//! Shading stage: height to color.
//!
//! CPU mirror of `fs_main` in `water.wgsl`. Unlit: the color encodes
//! elevation directly.

use glam::Vec3;

use crate::params::WaterParams;

/// How fragments are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadingMode {
    /// Depth-to-surface gradient driven by height
    #[default]
    Elevation,

    /// Reconstructed normal mapped to RGB, for inspecting the displacement
    Normals,
}

impl ShadingMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Elevation => Self::Normals,
            Self::Normals => Self::Elevation,
        }
    }

    /// Value written to the uniform buffer
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Elevation => 0,
            Self::Normals => 1,
        }
    }
}

/// Blend factor in [0, 1] between depth and surface color
pub fn mix_factor(height: f32, params: &WaterParams) -> f32 {
    ((height + params.color_offset) * params.color_multiplier).clamp(0.0, 1.0)
}

/// `a * (1 - t) + b * t`, exact at both ends
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Fragment color (sRGB-encoded unit floats) for a surface height
pub fn shade(height: f32, params: &WaterParams) -> Vec3 {
    mix(
        params.depth_color.to_vec3(),
        params.surface_color.to_vec3(),
        mix_factor(height, params),
    )
}

/// Normal debug color: components remapped from [-1, 1] to [0, 1]
pub fn normal_color(normal: Vec3) -> Vec3 {
    normal * 0.5 + Vec3::splat(0.5)
}

/// Fragment color for the selected mode
pub fn shade_with(mode: ShadingMode, height: f32, normal: Vec3, params: &WaterParams) -> Vec3 {
    match mode {
        ShadingMode::Elevation => shade(height, params),
        ShadingMode::Normals => normal_color(normal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;

    #[test]
    fn test_mix_factor_clamped() {
        let params = WaterParams::default();
        for i in -100..100 {
            let h = i as f32 * 0.05;
            let m = mix_factor(h, &params);
            assert!((0.0..=1.0).contains(&m), "mix_factor({h}) = {m}");
        }
    }

    #[test]
    fn test_low_heights_are_exactly_depth_color() {
        let params = WaterParams::default();

        // (h + 0.09) * 4 <= 0 for every h <= -0.09
        for &h in &[-0.09, -0.1, -0.5, -10.0] {
            assert_eq!(shade(h, &params), params.depth_color.to_vec3());
        }
    }

    #[test]
    fn test_high_heights_are_exactly_surface_color() {
        let params = WaterParams::default();

        // (h + 0.09) * 4 >= 1 for every h >= 0.16
        for &h in &[0.17, 0.2, 1.0, 10.0] {
            assert_eq!(shade(h, &params), params.surface_color.to_vec3());
        }
    }

    #[test]
    fn test_midpoint_blends_channels() {
        let params = WaterParams {
            depth_color: Rgb::new(0, 0, 0),
            surface_color: Rgb::new(255, 255, 255),
            color_offset: 0.0,
            color_multiplier: 1.0,
            ..WaterParams::default()
        };

        let color = shade(0.5, &params);
        assert!((color - Vec3::splat(0.5)).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_zero_multiplier_always_depth() {
        let params = WaterParams {
            color_multiplier: 0.0,
            ..WaterParams::default()
        };
        assert_eq!(shade(0.3, &params), params.depth_color.to_vec3());
    }

    #[test]
    fn test_colors_stay_within_endpoint_gamut() {
        let params = WaterParams::default();
        let lo = params.depth_color.to_vec3().min(params.surface_color.to_vec3());
        let hi = params.depth_color.to_vec3().max(params.surface_color.to_vec3());

        for i in 0..200 {
            let c = shade(-0.2 + i as f32 * 0.002, &params);
            assert!(c.cmpge(lo - Vec3::splat(1e-6)).all());
            assert!(c.cmple(hi + Vec3::splat(1e-6)).all());
        }
    }

    #[test]
    fn test_mode_toggle_and_normal_color() {
        assert_eq!(ShadingMode::default(), ShadingMode::Elevation);
        assert_eq!(ShadingMode::Elevation.toggled(), ShadingMode::Normals);
        assert_eq!(ShadingMode::Normals.toggled().as_u32(), 0);

        assert_eq!(normal_color(Vec3::Y), Vec3::new(0.5, 1.0, 0.5));

        let params = WaterParams::default();
        assert_eq!(
            shade_with(ShadingMode::Elevation, 0.05, Vec3::Y, &params),
            shade(0.05, &params)
        );
    }
}
