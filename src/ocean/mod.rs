//! Water surface: mesh, displacement stage and shading stage.
//!
//! The GPU runs both stages from `water.wgsl`; the functions here are the
//! CPU reference of the same math.

mod mesh;
pub mod shading;
mod waves;

// Re-export public types
pub use mesh::{Vertex, WaterMesh, MAX_SEGMENTS};
pub use shading::{mix_factor, shade, shade_with, ShadingMode};
pub use waves::WaveField;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::WaterParams;

    #[test]
    fn test_both_stages_bit_identical_on_repeat() {
        let params = WaterParams {
            elapsed_time: 7.5,
            ..WaterParams::default()
        };
        let step = WaterMesh::new(2.0, 512).cell_size();

        let run = || {
            let waves = WaveField::new(&params);
            let h = waves.height(-0.31, 0.77);
            let n = waves.normal(-0.31, 0.77, step);
            (h, shade_with(ShadingMode::Elevation, h, n, &params))
        };

        let (h0, c0) = run();
        let (h1, c1) = run();
        assert_eq!(h0.to_bits(), h1.to_bits());
        assert_eq!(c0.to_array().map(f32::to_bits), c1.to_array().map(f32::to_bits));
    }
}
