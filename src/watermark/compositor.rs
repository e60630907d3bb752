//! Watermark compositor for blending the brand mark onto images.
//!
//! The compositor samples the background under the mark's target region,
//! picks a legible palette color, renders and rasterizes the mark, and
//! alpha-blends it at the computed position.
//!
//! # Color selection
//!
//! | Background brightness | Color | Shadow |
//! |---|---|---|
//! | `< 80` (dark) | cream | no |
//! | `> 180` (very light) | ink | yes |
//! | otherwise | wine | yes |
//!
//! # Example
//!
//! ```ignore
//! use vestidor::watermark::{apply_watermark, WatermarkSpec};
//!
//! let watermarked_png = apply_watermark(&png_bytes, &WatermarkSpec::default())?;
//! ```

use bytes::Bytes;
use image::{Rgba, RgbaImage};

use super::luminosity::sample_brightness;
use super::position::{calculate_position, ImageDimensions, PlacementPosition, WatermarkDimensions};
use super::renderer::{rasterize_mark, render_mark};
use super::{BrandColor, WatermarkError, WatermarkSpec};
use crate::codec;
use crate::constants::{DARK_BACKGROUND_THRESHOLD, LIGHT_BACKGROUND_THRESHOLD, WATERMARK_MARGIN};

/// Color and shadow chosen for a given background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkColor {
    pub color: BrandColor,
    pub shadow: bool,
}

/// Three-band classifier from background brightness to mark color.
pub fn watermark_color(brightness: f64) -> WatermarkColor {
    if brightness < DARK_BACKGROUND_THRESHOLD {
        WatermarkColor {
            color: BrandColor::Cream,
            shadow: false,
        }
    } else if brightness > LIGHT_BACKGROUND_THRESHOLD {
        WatermarkColor {
            color: BrandColor::Ink,
            shadow: true,
        }
    } else {
        WatermarkColor {
            color: BrandColor::Wine,
            shadow: true,
        }
    }
}

/// A rasterized mark to be composited onto an image.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The watermark image (RGBA, straight alpha).
    pub image: RgbaImage,
    /// Position where the watermark should be placed.
    pub position: PlacementPosition,
    /// Opacity to apply (0.0 to 1.0). Applied on top of image's alpha channel.
    pub opacity: f32,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .finish()
    }
}

/// What the compositor decided for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedWatermark {
    pub position: PlacementPosition,
    pub brightness: f64,
    pub color: WatermarkColor,
}

/// Blend a single watermark layer onto the target image.
///
/// Only pixels inside the layer's bounding box (clipped to the target) are
/// touched.
pub fn blend_layer(target: &mut RgbaImage, layer: &WatermarkLayer) {
    let target_width = target.width() as i32;
    let target_height = target.height() as i32;

    let wm_width = layer.image.width() as i32;
    let wm_height = layer.image.height() as i32;

    // Calculate the visible region (clamp to target bounds)
    let x_start = layer.position.x.max(0);
    let y_start = layer.position.y.max(0);
    let x_end = (layer.position.x + wm_width).min(target_width);
    let y_end = (layer.position.y + wm_height).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wx = (tx - layer.position.x) as u32;
            let wy = (ty - layer.position.y) as u32;

            let wm_pixel = layer.image.get_pixel(wx, wy);
            let target_pixel = target.get_pixel(tx as u32, ty as u32);

            let blended = blend_pixels(*target_pixel, *wm_pixel, layer.opacity);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend two pixels using alpha compositing with additional opacity.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let fg_alpha = (foreground[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if fg_alpha <= 0.0 {
        return background;
    }
    let bg_alpha = background[3] as f32 / 255.0;

    // Porter-Duff "over" operator
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Watermark a decoded raster in place.
pub fn watermark_raster(
    target: &mut RgbaImage,
    spec: &WatermarkSpec,
) -> Result<AppliedWatermark, WatermarkError> {
    let dims = spec.size.dimensions();
    let image_dims = ImageDimensions {
        width: target.width(),
        height: target.height(),
    };
    let wm_dims = WatermarkDimensions {
        width: dims.width,
        height: dims.height,
    };

    let position = calculate_position(spec.position, &image_dims, &wm_dims, WATERMARK_MARGIN);
    let brightness = sample_brightness(target, position.x, position.y, dims.width, dims.height);
    let color = watermark_color(brightness);

    let svg = render_mark(color.color, color.shadow, spec.style, spec.size);
    let mark = rasterize_mark(&svg, dims.width, dims.height)?;

    let layer = WatermarkLayer {
        image: mark,
        position,
        opacity: spec.effective_opacity(),
    };
    blend_layer(target, &layer);

    Ok(AppliedWatermark {
        position,
        brightness,
        color,
    })
}

/// Decode an image, apply the mark and re-encode it as PNG.
///
/// Fails with [`WatermarkError::ImageLoad`] if the input cannot be decoded.
pub fn apply_watermark(image_bytes: &[u8], spec: &WatermarkSpec) -> Result<Vec<u8>, WatermarkError> {
    let decoded = image::load_from_memory(image_bytes)
        .map_err(|e| WatermarkError::ImageLoad(e.to_string()))?;
    let mut rgba = decoded.to_rgba8();

    let applied = watermark_raster(&mut rgba, spec)?;
    tracing::debug!(
        width = rgba.width(),
        height = rgba.height(),
        x = applied.position.x,
        y = applied.position.y,
        brightness = applied.brightness,
        color = %applied.color.color,
        shadow = applied.color.shadow,
        style = spec.style.as_str(),
        "Applied watermark"
    );

    codec::encode_png(&rgba).map_err(|e| WatermarkError::EncodeError(e.to_string()))
}

/// Base64 variant of [`apply_watermark`]; accepts bare payloads or data URIs.
pub fn apply_watermark_base64(
    base64_image: &str,
    spec: &WatermarkSpec,
) -> Result<String, WatermarkError> {
    let bytes =
        codec::decode_base64(base64_image).map_err(|e| WatermarkError::ImageLoad(e.to_string()))?;
    let watermarked = apply_watermark(&bytes, spec)?;
    Ok(codec::encode_base64(&watermarked))
}

/// Watermark several images concurrently.
///
/// Output order matches input order. The first failure (in input order)
/// fails the whole batch.
pub async fn apply_watermark_batch(
    images: Vec<Bytes>,
    spec: &WatermarkSpec,
) -> Result<Vec<Vec<u8>>, WatermarkError> {
    if images.is_empty() {
        return Ok(Vec::new());
    }

    let spec = *spec;
    let count = images.len();
    let tasks = images
        .into_iter()
        .map(|image| tokio::task::spawn_blocking(move || apply_watermark(&image, &spec)));

    let results = futures::future::join_all(tasks).await;
    tracing::debug!(count, "Watermark batch finished");

    results
        .into_iter()
        .map(|joined| joined.map_err(|e| WatermarkError::TaskError(e.to_string()))?)
        .collect()
}
