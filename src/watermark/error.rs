//! Watermark error types.
//!
//! Defines errors that can occur during watermark processing.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug)]
pub enum WatermarkError {
    /// Source image could not be decoded. Never retried.
    ImageLoad(String),

    /// Mark markup could not be parsed or rasterized
    RenderError(String),

    /// Failed to encode the composited image
    EncodeError(String),

    /// A batch worker task panicked or was aborted
    TaskError(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad(msg) => write!(f, "Failed to load source image: {}", msg),
            Self::RenderError(msg) => write!(f, "Failed to render watermark: {}", msg),
            Self::EncodeError(msg) => write!(f, "Failed to encode watermarked image: {}", msg),
            Self::TaskError(msg) => write!(f, "Watermark task failed: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
