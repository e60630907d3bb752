//! Watermark mark rendering.
//!
//! Marks are produced as self-contained SVG markup and rasterized with
//! `resvg` right before compositing. The markup never leaves the process.
//!
//! # Styles
//!
//! - **Isotipo**: tag-shaped emblem holding the monogram
//! - **Minimal**: wordmark text only, at 70% opacity
//! - **Full**: small emblem followed by the wordmark
//!
//! # Example
//!
//! ```ignore
//! use vestidor::watermark::{render_mark, rasterize_mark, BrandColor, WatermarkSize, WatermarkStyle};
//!
//! let svg = render_mark(BrandColor::Wine, true, WatermarkStyle::Full, WatermarkSize::Medium);
//! let mark = rasterize_mark(&svg, 180, 60)?;
//! ```

use std::fmt::Write as _;
use std::sync::{Arc, OnceLock};

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use usvg::fontdb;

use super::{BrandColor, WatermarkError, WatermarkSize, WatermarkStyle};

/// Embedded DejaVu Sans Bold (Bitstream Vera license, see fonts/LICENSE-DejaVu)
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans-Bold.ttf");
const EMBEDDED_FONT_FAMILY: &str = "DejaVu Sans";

const FONT_FAMILY: &str = "DejaVu Sans, sans-serif";

/// Font database shared by every rasterization, loaded on first use.
///
/// Only the embedded face is loaded, so text renders the same on hosts
/// without any system fonts.
static SVG_FONTDB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

fn svg_fontdb() -> Arc<fontdb::Database> {
    SVG_FONTDB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_font_data(EMBEDDED_FONT_DATA.to_vec());
            db.set_sans_serif_family(EMBEDDED_FONT_FAMILY);
            tracing::debug!(faces = db.len(), "Loaded embedded font for watermark rendering");
            Arc::new(db)
        })
        .clone()
}

/// Text content of the mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkBrand {
    /// Wordmark shown by the Minimal and Full styles
    pub wordmark: String,
    /// Large letter inside the emblem
    pub monogram: String,
    /// Small text under the monogram
    pub tagline: String,
}

impl Default for MarkBrand {
    fn default() -> Self {
        Self {
            wordmark: "VINTAGE DE LIZ".to_string(),
            monogram: "V".to_string(),
            tagline: "LIZ".to_string(),
        }
    }
}

impl MarkBrand {
    /// Render the mark as SVG markup.
    ///
    /// Pure: identical inputs always produce byte-identical markup.
    pub fn render(
        &self,
        color: BrandColor,
        has_shadow: bool,
        style: WatermarkStyle,
        size: WatermarkSize,
    ) -> String {
        let dims = size.dimensions();
        let (width, height) = (dims.width, dims.height);
        let font_size = dims.font_size as f64;
        let fill = color.hex();

        let mut svg = String::with_capacity(1024);
        let _ = write!(
            svg,
            r#"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">"#
        );

        if has_shadow {
            svg.push_str(
                r##"<defs><filter id="shadow" x="-20%" y="-20%" width="140%" height="140%"><feDropShadow dx="1" dy="1" stdDeviation="1" flood-color="#000000" flood-opacity="0.3"/></filter></defs>"##,
            );
            svg.push_str(r#"<g filter="url(#shadow)">"#);
        } else {
            svg.push_str("<g>");
        }

        let wordmark = escape_xml(&self.wordmark);
        let monogram = escape_xml(&self.monogram);
        let tagline = escape_xml(&self.tagline);
        let text_baseline = height as f64 / 2.0 + font_size / 3.0;

        match style {
            WatermarkStyle::Isotipo => {
                let _ = write!(
                    svg,
                    r#"<path d="M10,15 q5,-8 15,-8 h40 q10,0 15,8 v25 q0,9 -8,14 l-15,10 q-8,5 -15,0 l-15,-10 q-8,-5 -8,-14 z" fill="{fill}" opacity="0.8"/>"#
                );
                svg.push_str(r#"<circle cx="20" cy="20" r="2" fill="white" opacity="0.9"/>"#);
                let _ = write!(
                    svg,
                    r#"<text x="40" y="30" text-anchor="middle" font-size="{:.1}" font-weight="700" fill="white" font-family="{FONT_FAMILY}">{monogram}</text>"#,
                    font_size * 0.8
                );
                let _ = write!(
                    svg,
                    r#"<text x="40" y="42" text-anchor="middle" font-size="{:.1}" font-weight="600" fill="white" font-family="{FONT_FAMILY}">{tagline}</text>"#,
                    font_size * 0.4
                );
            }
            WatermarkStyle::Minimal => {
                let _ = write!(
                    svg,
                    r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="{:.1}" font-weight="600" fill="{fill}" font-family="{FONT_FAMILY}" opacity="0.7">{wordmark}</text>"#,
                    width as f64 / 2.0,
                    text_baseline,
                    font_size
                );
            }
            WatermarkStyle::Full => {
                let _ = write!(
                    svg,
                    r#"<path d="M5,10 q3,-5 8,-5 h20 q5,0 8,5 v15 q0,5 -4,8 l-8,5 q-4,3 -8,0 l-8,-5 q-4,-3 -4,-8 z" fill="{fill}" opacity="0.8"/>"#
                );
                svg.push_str(r#"<circle cx="12" cy="13" r="1.5" fill="white" opacity="0.9"/>"#);
                let _ = write!(
                    svg,
                    r#"<text x="20" y="20" text-anchor="middle" font-size="{:.1}" font-weight="700" fill="white" font-family="{FONT_FAMILY}">{monogram}</text>"#,
                    font_size * 0.6
                );
                let _ = write!(
                    svg,
                    r#"<text x="20" y="27" text-anchor="middle" font-size="{:.1}" font-weight="600" fill="white" font-family="{FONT_FAMILY}">{tagline}</text>"#,
                    font_size * 0.3
                );
                let _ = write!(
                    svg,
                    r#"<text x="50" y="{:.1}" font-size="{:.1}" font-weight="600" fill="{fill}" font-family="{FONT_FAMILY}" opacity="0.7">{wordmark}</text>"#,
                    text_baseline, font_size
                );
            }
        }

        svg.push_str("</g></svg>");
        svg
    }
}

/// Render the default brand mark as SVG markup.
pub fn render_mark(
    color: BrandColor,
    has_shadow: bool,
    style: WatermarkStyle,
    size: WatermarkSize,
) -> String {
    MarkBrand::default().render(color, has_shadow, style, size)
}

/// Preview of the mark as it looks on a mid-tone background.
pub fn preview_mark(style: WatermarkStyle, size: WatermarkSize) -> String {
    render_mark(BrandColor::Wine, true, style, size)
}

/// Rasterize mark markup into a straight-alpha RGBA image of the given size.
pub fn rasterize_mark(svg: &str, width: u32, height: u32) -> Result<RgbaImage, WatermarkError> {
    let options = usvg::Options {
        fontdb: svg_fontdb(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| WatermarkError::RenderError(e.to_string()))?;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        WatermarkError::RenderError(format!("cannot allocate {}x{} pixmap", width, height))
    })?;

    let size = tree.size();
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut mark = RgbaImage::new(width, height);
    for (dst, src) in mark.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }

    Ok(mark)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
