//! Headless CPU render of the water surface, viewed straight down.

use std::path::Path;

use glam::{Vec2, Vec3};
use image::RgbImage;
use rayon::prelude::*;

use crate::error::Result;
use crate::ocean::{shade_with, ShadingMode, WaveField};
use crate::params::WaterParams;

/// Top-down view of `extent` x `extent` world units centred on the origin
///
/// Each pixel samples both stages at its centre; rows are shaded in parallel.
pub fn render_preview(
    params: &WaterParams,
    size: u32,
    extent: f32,
    mode: ShadingMode,
) -> RgbImage {
    let w = size.max(1) as usize;
    let waves = WaveField::new(params);
    let pixel = extent / w as f32;
    let half = extent * 0.5;

    let mut rgb = vec![0u8; w * w * 3];
    rgb.par_chunks_mut(w * 3).enumerate().for_each(|(row, line)| {
        // Image rows run towards +Z
        let z = (row as f32 + 0.5) * pixel - half;
        for col in 0..w {
            let x = (col as f32 + 0.5) * pixel - half;
            let (height, normal) = waves.sample(Vec2::new(x, z), pixel);
            let color = shade_with(mode, height, normal, params);
            line[col * 3..col * 3 + 3].copy_from_slice(&to_bytes(color));
        }
    });

    // Buffer length is exactly w * w * 3
    RgbImage::from_raw(w as u32, w as u32, rgb).unwrap_or_else(|| RgbImage::new(w as u32, w as u32))
}

/// Render and write a PNG (format picked from the extension)
pub fn save_preview(
    path: &Path,
    params: &WaterParams,
    size: u32,
    extent: f32,
    mode: ShadingMode,
) -> Result<()> {
    let start = std::time::Instant::now();
    let image = render_preview(params, size, extent, mode);
    image.save(path)?;
    log::info!(
        "Preview {}x{} at t={:.2}s written to {} in {:.2?}",
        image.width(),
        image.height(),
        params.elapsed_time,
        path.display(),
        start.elapsed()
    );
    Ok(())
}

fn to_bytes(color: Vec3) -> [u8; 3] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Rgb;

    fn calm() -> WaterParams {
        WaterParams {
            big_wave_elevation: 0.0,
            small_wave_elevation: 0.0,
            ..WaterParams::default()
        }
    }

    #[test]
    fn test_preview_dimensions() {
        let image = render_preview(&WaterParams::default(), 32, 2.0, ShadingMode::Elevation);
        assert_eq!(image.dimensions(), (32, 32));
    }

    #[test]
    fn test_calm_water_is_uniform() {
        // h = 0 everywhere: mix = 0.09 * 4 = 0.36
        let params = calm();
        let image = render_preview(&params, 16, 2.0, ShadingMode::Elevation);

        let expected = to_bytes(crate::ocean::shade(0.0, &params));
        for pixel in image.pixels() {
            assert_eq!(pixel.0, expected);
        }
    }

    #[test]
    fn test_calm_normals_point_up() {
        let image = render_preview(&calm(), 8, 2.0, ShadingMode::Normals);
        for pixel in image.pixels() {
            // (0, 1, 0) -> (0.5, 1.0, 0.5)
            assert_eq!(pixel.0, [128, 255, 128]);
        }
    }

    #[test]
    fn test_saturated_gradient_hits_surface_color() {
        let params = WaterParams {
            color_offset: 1.0,
            color_multiplier: 10.0,
            surface_color: Rgb::new(10, 200, 30),
            ..calm()
        };
        let image = render_preview(&params, 4, 2.0, ShadingMode::Elevation);
        assert!(image.pixels().all(|p| p.0 == [10, 200, 30]));
    }

    #[test]
    fn test_waves_vary_across_image() {
        let params = WaterParams {
            elapsed_time: 3.0,
            ..WaterParams::default()
        };
        let image = render_preview(&params, 32, 2.0, ShadingMode::Elevation);
        let first = image.get_pixel(0, 0).0;
        assert!(image.pixels().any(|p| p.0 != first));
    }

    #[test]
    fn test_save_preview_writes_png() {
        let path = std::env::temp_dir().join(format!("ragingsea-preview-{}.png", std::process::id()));
        save_preview(&path, &WaterParams::default(), 8, 2.0, ShadingMode::Elevation).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 8);
        std::fs::remove_file(&path).ok();
    }
}
