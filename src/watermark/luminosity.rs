//! Luminosity sampling.
//!
//! Measures how bright the background under the mark is, so the compositor
//! can pick a legible color. Brightness uses the Rec. 601 luma weights
//! (`0.299 R + 0.587 G + 0.114 B`) averaged over opaque pixels only.

use image::RgbaImage;

use crate::constants::{NEUTRAL_BRIGHTNESS, SAMPLER_ALPHA_CUTOFF};

/// Luma weights in thousandths, accumulated as integers so that averages
/// over uniform regions are exact.
const LUMA_WEIGHTS: [u64; 3] = [299, 587, 114];
const LUMA_SCALE: f64 = 1000.0;

fn scaled_luminance(r: u8, g: u8, b: u8) -> u64 {
    LUMA_WEIGHTS[0] * r as u64 + LUMA_WEIGHTS[1] * g as u64 + LUMA_WEIGHTS[2] * b as u64
}

/// Perceptual luminance of a single RGB triple, in [0, 255].
pub fn perceived_luminance(r: u8, g: u8, b: u8) -> f64 {
    scaled_luminance(r, g, b) as f64 / LUMA_SCALE
}

/// Average perceptual brightness of a rectangular region.
///
/// The region may extend past the raster; pixels outside it count as
/// transparent. Pixels with alpha at or below 50% are skipped. When no pixel
/// qualifies the neutral midpoint (128) is returned.
pub fn sample_brightness(raster: &RgbaImage, x: i32, y: i32, width: u32, height: u32) -> f64 {
    let x_start = x.max(0) as i64;
    let y_start = y.max(0) as i64;
    let x_end = (x as i64 + width as i64).min(raster.width() as i64);
    let y_end = (y as i64 + height as i64).min(raster.height() as i64);

    let mut total: u64 = 0;
    let mut counted: u64 = 0;

    for py in y_start..y_end {
        for px in x_start..x_end {
            let pixel = raster.get_pixel(px as u32, py as u32);
            if pixel[3] > SAMPLER_ALPHA_CUTOFF {
                total += scaled_luminance(pixel[0], pixel[1], pixel[2]);
                counted += 1;
            }
        }
    }

    if counted == 0 {
        return NEUTRAL_BRIGHTNESS;
    }
    total as f64 / (counted as f64 * LUMA_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_uniform_gray_is_exact() {
        let raster = RgbaImage::from_pixel(50, 50, Rgba([128, 128, 128, 255]));
        assert_eq!(sample_brightness(&raster, 0, 0, 50, 50), 128.0);
    }

    #[test]
    fn test_fully_transparent_falls_back_to_midpoint() {
        let raster = RgbaImage::from_pixel(50, 50, Rgba([255, 255, 255, 0]));
        assert_eq!(sample_brightness(&raster, 10, 10, 20, 20), 128.0);
    }

    #[test]
    fn test_black_and_white() {
        let black = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        assert_eq!(sample_brightness(&black, 0, 0, 10, 10), 0.0);

        let white = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        assert!((sample_brightness(&white, 0, 0, 10, 10) - 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_green_weighs_most() {
        let red = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let green = RgbaImage::from_pixel(4, 4, Rgba([0, 255, 0, 255]));
        let blue = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        let r = sample_brightness(&red, 0, 0, 4, 4);
        let g = sample_brightness(&green, 0, 0, 4, 4);
        let b = sample_brightness(&blue, 0, 0, 4, 4);

        assert!((r - 76.245).abs() < 1e-9);
        assert!((g - 149.685).abs() < 1e-9);
        assert!((b - 29.07).abs() < 1e-9);
        assert!(g > r && r > b);
    }

    #[test]
    fn test_alpha_cutoff_is_exclusive() {
        // Left half white at alpha 128 (skipped), right half black opaque
        let mut raster = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        for y in 0..10 {
            for x in 0..5 {
                raster.put_pixel(x, y, Rgba([255, 255, 255, 128]));
            }
        }
        assert_eq!(sample_brightness(&raster, 0, 0, 10, 10), 0.0);

        raster.put_pixel(0, 0, Rgba([255, 255, 255, 129]));
        let brightness = sample_brightness(&raster, 0, 0, 10, 10);
        assert!((brightness - 255.0 / 51.0).abs() < 1e-6);
    }

    #[test]
    fn test_only_the_region_is_sampled() {
        let mut raster = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        for y in 80..100 {
            for x in 80..100 {
                raster.put_pixel(x, y, Rgba([200, 200, 200, 255]));
            }
        }

        assert!((sample_brightness(&raster, 80, 80, 20, 20) - 200.0).abs() < 1e-9);
        assert_eq!(sample_brightness(&raster, 0, 0, 20, 20), 0.0);
    }

    #[test]
    fn test_region_outside_raster_is_clipped() {
        let raster = RgbaImage::from_pixel(10, 10, Rgba([100, 100, 100, 255]));

        // Partially outside: only the overlap counts
        assert!((sample_brightness(&raster, -5, -5, 10, 10) - 100.0).abs() < 1e-9);

        // Entirely outside: nothing counted
        assert_eq!(sample_brightness(&raster, 50, 50, 10, 10), 128.0);
        assert_eq!(sample_brightness(&raster, -30, 0, 10, 10), 128.0);
    }
}
