//! Position calculation for watermark placement.
//!
//! This module calculates where the mark goes on an image based on the
//! configured position. Corner positions keep a fixed margin from both
//! adjacent edges; `Center` ignores the margin.
//!
//! # Example
//!
//! ```ignore
//! use vestidor::watermark::position::{calculate_position, ImageDimensions, WatermarkDimensions};
//! use vestidor::watermark::WatermarkPosition;
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 180, height: 60 };
//!
//! let pos = calculate_position(WatermarkPosition::BottomRight, &image, &watermark, 20);
//! assert_eq!((pos.x, pos.y), (600, 520)); // 800 - 180 - 20, 600 - 60 - 20
//! ```

use super::WatermarkPosition;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of the placed mark. May be negative when the mark is
/// larger than the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Calculate the top-left corner for the mark.
pub fn calculate_position(
    position: WatermarkPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    margin: u32,
) -> PlacementPosition {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let wm_w = watermark.width as i32;
    let wm_h = watermark.height as i32;
    let m = margin as i32;

    match position {
        WatermarkPosition::BottomRight => {
            PlacementPosition::new(img_w - wm_w - m, img_h - wm_h - m)
        }
        WatermarkPosition::BottomLeft => PlacementPosition::new(m, img_h - wm_h - m),
        WatermarkPosition::TopRight => PlacementPosition::new(img_w - wm_w - m, m),
        WatermarkPosition::TopLeft => PlacementPosition::new(m, m),
        WatermarkPosition::Center => {
            PlacementPosition::new((img_w - wm_w) / 2, (img_h - wm_h) / 2)
        }
    }
}

/// Check whether any part of the mark overlaps the image.
pub fn is_visible(
    position: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    position.x + (watermark.width as i32) > 0
        && position.y + (watermark.height as i32) > 0
        && position.x < image.width as i32
        && position.y < image.height as i32
}
