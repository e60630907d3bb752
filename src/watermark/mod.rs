//! Intelligent watermarking for generated images.
//!
//! The brand mark is stamped onto each output image in a color chosen for
//! legibility against the local background:
//!
//! 1. Compute the mark's target rectangle from position and size.
//! 2. Sample the average perceived brightness under that rectangle.
//! 3. Pick cream (dark), wine (mid) or ink (light) from the brand palette.
//! 4. Render the mark as vector markup and rasterize it.
//! 5. Alpha-blend it at the configured opacity and re-encode as PNG.
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   enabled: true
//!   position: bottom-right
//!   opacity: 0.7
//!   size: medium
//!   style: full
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod luminosity;
pub mod palette;
pub mod position;
pub mod renderer;

// Re-export main types for convenience
pub use compositor::{
    apply_watermark, apply_watermark_base64, apply_watermark_batch, blend_layer,
    watermark_color, watermark_raster, AppliedWatermark, WatermarkColor, WatermarkLayer,
};
pub use config::{MarkDimensions, WatermarkPosition, WatermarkSize, WatermarkSpec, WatermarkStyle};
pub use error::WatermarkError;
pub use luminosity::{perceived_luminance, sample_brightness};
pub use palette::{BrandColor, BRAND_PALETTE};
pub use position::{
    calculate_position, is_visible, ImageDimensions, PlacementPosition, WatermarkDimensions,
};
pub use renderer::{preview_mark, rasterize_mark, render_mark, MarkBrand};
