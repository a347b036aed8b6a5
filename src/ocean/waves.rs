//! Displacement stage: per-vertex wave height.
//!
//! CPU mirror of `vs_main` in `water.wgsl`. The GPU evaluates this for every
//! vertex each frame; the CPU copy backs the preview renderer and tests.

use glam::{Vec2, Vec3};
use noise::NoiseFn;

use crate::noise::ClassicPerlin;
use crate::params::WaterParams;

/// Wave height field for one Parameter Set snapshot
///
/// Holds no state of its own: every method is a pure function of
/// `(position, params)`, with `params.elapsed_time` as the phase.
pub struct WaveField<'a, N = ClassicPerlin> {
    params: &'a WaterParams,
    noise: N,
}

impl<'a> WaveField<'a, ClassicPerlin> {
    /// Wave field using the same noise kernel as the shader
    pub fn new(params: &'a WaterParams) -> Self {
        Self::with_noise(params, ClassicPerlin::new())
    }
}

impl<'a, N: NoiseFn<f64, 3>> WaveField<'a, N> {
    /// Wave field with any `noise` crate kernel for the secondary octaves
    pub fn with_noise(params: &'a WaterParams, noise: N) -> Self {
        Self { params, noise }
    }

    /// Primary swell: product of one sine per planar axis
    pub fn big_wave(&self, x: f32, z: f32) -> f32 {
        let p = self.params;
        let phase = p.elapsed_time * p.big_wave_speed;

        p.big_wave_elevation
            * (x * p.big_wave_frequency.x + phase).sin()
            * (z * p.big_wave_frequency.y + phase).sin()
    }

    /// Secondary octaves: octave `i` (1-based) samples the noise at
    /// `i * small_wave_frequency` and contributes `small_wave_elevation / i`.
    ///
    /// Octaves subtract the absolute noise value, which rounds troughs and
    /// leaves sharp crests.
    pub fn small_waves(&self, x: f32, z: f32) -> f32 {
        let p = self.params;
        let phase = (p.elapsed_time * p.small_wave_speed) as f64;
        let mut elevation = 0.0;

        for i in 1..=p.small_wave_iterations {
            let octave = i as f32;
            let scale = p.small_wave_frequency * octave;
            let sample = self.noise.get([(x * scale) as f64, (z * scale) as f64, phase]) as f32;

            elevation -= (sample * p.small_wave_elevation / octave).abs();
        }

        elevation
    }

    /// Total height at planar position (x, z); not clamped
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.big_wave(x, z) + self.small_waves(x, z)
    }

    /// Move a rest-position vertex along +Y by its height
    pub fn displace(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.height(position.x, position.z)
    }

    /// Surface normal from central differences of neighbouring heights
    ///
    /// `step` is the sampling distance; the mesh cell size is a good choice.
    pub fn normal(&self, x: f32, z: f32, step: f32) -> Vec3 {
        let step = step.max(f32::EPSILON);
        let dx = self.height(x + step, z) - self.height(x - step, z);
        let dz = self.height(x, z + step) - self.height(x, z - step);

        Vec3::new(-dx, 2.0 * step, -dz).normalize()
    }

    /// Height and normal together, as the vertex stage forwards them
    pub fn sample(&self, planar: Vec2, step: f32) -> (f32, Vec3) {
        (
            self.height(planar.x, planar.y),
            self.normal(planar.x, planar.y, step),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noise::Perlin;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_default_origin_at_t0_is_flat() {
        let params = WaterParams::default();
        let waves = WaveField::new(&params);

        // sin(0) * sin(0) = 0 and the noise is zero on the lattice origin
        assert_eq!(waves.big_wave(0.0, 0.0), 0.0);
        assert_eq!(waves.small_waves(0.0, 0.0), 0.0);
        assert_eq!(waves.height(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_no_iterations_leaves_primary_term() {
        let params = WaterParams {
            small_wave_iterations: 0,
            elapsed_time: 3.7,
            ..WaterParams::default()
        };
        let waves = WaveField::new(&params);

        for &(x, z) in &[(0.1, 0.2), (-0.7, 0.33), (0.95, -0.5)] {
            assert_eq!(waves.height(x, z), waves.big_wave(x, z));
        }
    }

    #[test]
    fn test_zero_elevation_is_flat_everywhere() {
        let params = WaterParams {
            big_wave_elevation: 0.0,
            small_wave_elevation: 0.0,
            ..WaterParams::default()
        };

        for step in 0..20 {
            let t = step as f32 * 0.53;
            let params = WaterParams {
                elapsed_time: t,
                ..params.clone()
            };
            let waves = WaveField::new(&params);
            for &(x, z) in &[(0.0, 0.0), (0.4, -0.9), (-1.0, 1.0)] {
                assert_eq!(waves.height(x, z), 0.0, "height({x}, {z}, {t}) not zero");
            }
        }
    }

    #[test]
    fn test_octaves_only_lower_the_surface() {
        let params = WaterParams {
            elapsed_time: 1.25,
            ..WaterParams::default()
        };
        let waves = WaveField::new(&params);

        for i in 0..50 {
            let x = -1.0 + i as f32 * 0.04;
            assert!(waves.small_waves(x, 0.3) <= 0.0);
        }
    }

    #[test]
    fn test_continuous_in_time() {
        let position = Vec2::new(0.37, -0.61);
        let dt = 1.0 / 600.0;
        let mut prev = None;

        for frame in 0..1200 {
            let params = WaterParams {
                elapsed_time: frame as f32 * dt,
                ..WaterParams::default()
            };
            let h = WaveField::new(&params).height(position.x, position.y);
            assert!(h.is_finite());

            if let Some(p) = prev {
                assert!(approx_eq(h, p, 0.01), "jump from {p} to {h} at frame {frame}");
            }
            prev = Some(h);
        }
    }

    #[test]
    fn test_primary_wave_period() {
        // sin(a + wt) * sin(b + wt) repeats every pi / w
        let base = WaterParams {
            small_wave_iterations: 0,
            ..WaterParams::default()
        };
        let period = std::f32::consts::PI / base.big_wave_speed;

        let mut t = 0.0;
        while t <= 10.0 {
            let now = WaterParams {
                elapsed_time: t,
                ..base.clone()
            };
            let later = WaterParams {
                elapsed_time: t + period,
                ..base.clone()
            };
            let h0 = WaveField::new(&now).height(0.3, 0.8);
            let h1 = WaveField::new(&later).height(0.3, 0.8);

            assert!(h0.is_finite() && h1.is_finite());
            assert!(approx_eq(h0, h1, 1e-4), "t={t}: {h0} vs {h1}");
            assert!(h0.abs() <= base.big_wave_elevation + 1e-6);
            t += 0.25;
        }
    }

    #[test]
    fn test_idempotent() {
        let params = WaterParams {
            elapsed_time: 4.2,
            ..WaterParams::default()
        };
        let a = WaveField::new(&params).height(0.123, -0.456);
        let b = WaveField::new(&params).height(0.123, -0.456);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_displace_moves_along_up_axis() {
        let params = WaterParams {
            elapsed_time: 2.0,
            ..WaterParams::default()
        };
        let waves = WaveField::new(&params);
        let rest = Vec3::new(0.25, 0.0, -0.4);
        let moved = waves.displace(rest);

        assert_eq!(moved.x, rest.x);
        assert_eq!(moved.z, rest.z);
        assert_eq!(moved.y, waves.height(rest.x, rest.z));
    }

    #[test]
    fn test_flat_surface_normal_points_up() {
        let params = WaterParams {
            big_wave_elevation: 0.0,
            small_wave_iterations: 0,
            ..WaterParams::default()
        };
        let normal = WaveField::new(&params).normal(0.3, 0.2, 2.0 / 512.0);
        assert!((normal - Vec3::Y).length() < 1e-6, "{normal}");
    }

    #[test]
    fn test_normal_is_unit_and_tilts_against_slope() {
        let params = WaterParams {
            small_wave_iterations: 0,
            elapsed_time: 0.0,
            ..WaterParams::default()
        };
        let waves = WaveField::new(&params);

        // At x=0 the x-slope is 0.2 * 4 * cos(0) * sin(1.5 * z); positive for z = 0.5
        let (height, normal) = waves.sample(Vec2::new(0.0, 0.5), 1e-3);
        assert!(approx_eq(height, 0.0, 1e-6));
        assert!(approx_eq(normal.length(), 1.0, 1e-5));
        assert!(normal.x < 0.0, "normal should lean away from rising x: {normal}");
        assert!(normal.y > 0.0);
    }

    #[test]
    fn test_generic_over_noise_crate_kernels() {
        let params = WaterParams {
            elapsed_time: 0.5,
            ..WaterParams::default()
        };
        let waves = WaveField::with_noise(&params, Perlin::new(42));
        let h = waves.height(0.2, 0.7);
        assert!(h.is_finite());
        assert!(waves.small_waves(0.2, 0.7) <= 0.0);
    }
}
