//! Image payload codec.
//!
//! Images cross the crate boundary as base64 text, optionally wrapped in a
//! `data:<media-type>;base64,` URI. Everything inside the crate works on raw
//! bytes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, ImageFormat, RgbaImage};
use thiserror::Error;

/// Media type of every image this crate produces
pub const PNG_MEDIA_TYPE: &str = "image/png";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Malformed data URI: {0}")]
    DataUri(String),

    #[error("Failed to encode PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Encode raw bytes as standard base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64 text, accepting either a bare payload or a data URI.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, CodecError> {
    let payload = match parse_data_uri(text)? {
        Some((_, payload)) => payload,
        None => text.trim(),
    };
    Ok(STANDARD.decode(payload)?)
}

/// Build a `data:` URI for the given payload.
pub fn to_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, encode_base64(bytes))
}

/// Split a `data:<media>;base64,<payload>` URI.
///
/// Returns `Ok(None)` when `text` is not a data URI at all.
pub fn parse_data_uri(text: &str) -> Result<Option<(&str, &str)>, CodecError> {
    let Some(rest) = text.trim().strip_prefix("data:") else {
        return Ok(None);
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CodecError::DataUri("missing ',' separator".to_string()))?;

    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| CodecError::DataUri(format!("unsupported encoding in '{header}'")))?;

    Ok(Some((media_type, payload)))
}

/// Media type of an encoded image, guessed from its magic bytes.
///
/// Unrecognized payloads are reported as PNG.
pub fn sniff_media_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Gif) => "image/gif",
        _ => PNG_MEDIA_TYPE,
    }
}

/// Encode an RGBA raster as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CodecError> {
    let mut output = Vec::new();
    PngEncoder::new(&mut output).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
    )?;
    Ok(output)
}
