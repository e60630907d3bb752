//! Brand palette.
//!
//! Fixed set of named brand colors, shared read-only by every compositing
//! operation.

use std::fmt;

use image::Rgba;

/// A named color from the brand palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrandColor {
    /// Primary color, used on mid-tone backgrounds
    Wine,
    Bottle,
    /// Light ivory, used on dark backgrounds
    Cream,
    Rose,
    /// Charcoal, used on very light backgrounds
    Ink,
    Slate,
}

/// Every palette entry with its hex value.
pub const BRAND_PALETTE: [(BrandColor, &str); 6] = [
    (BrandColor::Wine, "#7C2632"),
    (BrandColor::Bottle, "#0E3B2E"),
    (BrandColor::Cream, "#F7F4EC"),
    (BrandColor::Rose, "#F2D9D3"),
    (BrandColor::Ink, "#111111"),
    (BrandColor::Slate, "#222831"),
];

impl BrandColor {
    /// Hex value as written into the mark's markup.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Wine => "#7C2632",
            Self::Bottle => "#0E3B2E",
            Self::Cream => "#F7F4EC",
            Self::Rose => "#F2D9D3",
            Self::Ink => "#111111",
            Self::Slate => "#222831",
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        match self {
            Self::Wine => [0x7C, 0x26, 0x32],
            Self::Bottle => [0x0E, 0x3B, 0x2E],
            Self::Cream => [0xF7, 0xF4, 0xEC],
            Self::Rose => [0xF2, 0xD9, 0xD3],
            Self::Ink => [0x11, 0x11, 0x11],
            Self::Slate => [0x22, 0x28, 0x31],
        }
    }

    pub fn to_rgba(&self) -> Rgba<u8> {
        let [r, g, b] = self.rgb();
        Rgba([r, g, b, 255])
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wine => "wine",
            Self::Bottle => "bottle",
            Self::Cream => "cream",
            Self::Rose => "rose",
            Self::Ink => "ink",
            Self::Slate => "slate",
        }
    }
}

impl fmt::Display for BrandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
