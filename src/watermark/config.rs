//! Watermark configuration types.
//!
//! This module defines the knobs of a single compositing operation:
//! - Placement (four corners or center)
//! - Global opacity
//! - Mark size (fixed pixel dimensions per size)
//! - Mark style (emblem only, wordmark only, or both)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_WATERMARK_OPACITY;

fn default_opacity() -> f32 {
    DEFAULT_WATERMARK_OPACITY
}

/// Watermark position on the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    Center,
}

impl WatermarkPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::Center => "center",
        }
    }
}

impl FromStr for WatermarkPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bottom-right" => Ok(Self::BottomRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "top-right" => Ok(Self::TopRight),
            "top-left" => Ok(Self::TopLeft),
            "center" => Ok(Self::Center),
            other => Err(format!(
                "Unknown watermark position '{}': expected bottom-right, bottom-left, top-right, top-left or center",
                other
            )),
        }
    }
}

/// Pixel dimensions and base font size of a rendered mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkDimensions {
    pub width: u32,
    pub height: u32,
    pub font_size: u32,
}

/// Size of the rendered mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl WatermarkSize {
    /// Fixed lookup table from size to mark dimensions.
    pub fn dimensions(&self) -> MarkDimensions {
        match self {
            Self::Small => MarkDimensions {
                width: 120,
                height: 40,
                font_size: 12,
            },
            Self::Medium => MarkDimensions {
                width: 180,
                height: 60,
                font_size: 16,
            },
            Self::Large => MarkDimensions {
                width: 240,
                height: 80,
                font_size: 20,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl FromStr for WatermarkSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(format!(
                "Unknown watermark size '{}': expected small, medium or large",
                other
            )),
        }
    }
}

/// What the mark is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkStyle {
    /// Wordmark text only
    Minimal,
    /// Emblem and wordmark side by side
    #[default]
    Full,
    /// Emblem only (tag shape with monogram)
    Isotipo,
}

impl WatermarkStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Full => "full",
            Self::Isotipo => "isotipo",
        }
    }
}

impl FromStr for WatermarkStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "full" => Ok(Self::Full),
            "isotipo" => Ok(Self::Isotipo),
            other => Err(format!(
                "Unknown watermark style '{}': expected minimal, full or isotipo",
                other
            )),
        }
    }
}

/// Configuration for one compositing operation.
///
/// ```yaml
/// watermark:
///   position: bottom-right
///   opacity: 0.7
///   size: medium
///   style: full
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatermarkSpec {
    /// Placement on the image (default: bottom-right)
    #[serde(default)]
    pub position: WatermarkPosition,

    /// Global opacity from 0.0 (transparent) to 1.0 (opaque) (default: 0.7)
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Mark size (default: medium)
    #[serde(default)]
    pub size: WatermarkSize,

    /// Mark style (default: full)
    #[serde(default)]
    pub style: WatermarkStyle,
}

impl Default for WatermarkSpec {
    fn default() -> Self {
        Self {
            position: WatermarkPosition::default(),
            opacity: default_opacity(),
            size: WatermarkSize::default(),
            style: WatermarkStyle::default(),
        }
    }
}

impl WatermarkSpec {
    pub fn new(
        position: WatermarkPosition,
        opacity: f32,
        size: WatermarkSize,
        style: WatermarkStyle,
    ) -> Self {
        Self {
            position,
            opacity,
            size,
            style,
        }
    }

    /// Opacity clamped to [0, 1]. NaN is treated as fully transparent.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            return 0.0;
        }
        self.opacity.clamp(0.0, 1.0)
    }

    /// Validate the watermark configuration.
    pub fn validate(&self) -> Result<(), String> {
        // Check for NaN/Infinity and valid range
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!(
                "Watermark opacity must be a finite value between 0.0 and 1.0, got {}",
                self.opacity
            ));
        }
        Ok(())
    }
}
