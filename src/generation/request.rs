//! Generation inputs and outputs.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::provider::ContentPart;

/// Which prompt family drives a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Garment fidelity on a catalog model
    #[default]
    Catalog,
    /// Subject identity plus garment fidelity
    TryOn,
    /// Progressive prompt ladder starting from a caller-supplied base
    Generic,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMode::Catalog => "catalog",
            GenerationMode::TryOn => "tryon",
            GenerationMode::Generic => "generic",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "catalog" => Ok(GenerationMode::Catalog),
            "tryon" | "try-on" | "try_on" => Ok(GenerationMode::TryOn),
            "generic" => Ok(GenerationMode::Generic),
            other => Err(format!(
                "unknown generation mode '{}' (expected catalog, tryon or generic)",
                other
            )),
        }
    }
}

/// A reference image sent with every attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub media_type: String,
    pub data: Bytes,
}

impl ReferenceImage {
    pub fn new(media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn png(data: impl Into<Bytes>) -> Self {
        Self::new(codec::PNG_MEDIA_TYPE, data)
    }

    /// Parse a base64 payload or `data:` URI. Bare payloads are taken as PNG.
    pub fn from_base64(text: &str) -> Result<Self, codec::CodecError> {
        let media_type = codec::parse_data_uri(text)?
            .map(|(media_type, _)| media_type.to_string())
            .unwrap_or_else(|| codec::PNG_MEDIA_TYPE.to_string());
        let data = codec::decode_base64(text)?;
        Ok(Self::new(media_type, data))
    }

    pub fn to_content_part(&self) -> ContentPart {
        ContentPart::Image {
            media_type: self.media_type.clone(),
            data: self.data.clone(),
        }
    }
}

/// The subject and garment images, in that order.
///
/// Either slot may be empty; the order of the present images is fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceImages {
    pub subject: Option<ReferenceImage>,
    pub garment: Option<ReferenceImage>,
}

impl ReferenceImages {
    pub fn new(subject: Option<ReferenceImage>, garment: Option<ReferenceImage>) -> Self {
        Self { subject, garment }
    }

    /// Present images, subject first.
    pub fn iter(&self) -> impl Iterator<Item = &ReferenceImage> {
        self.subject.iter().chain(self.garment.iter())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.subject.is_none() && self.garment.is_none()
    }
}

/// Immutable inputs of one orchestration call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub reference_images: ReferenceImages,
    pub garment_description: Option<String>,
    pub person_description: Option<String>,
    /// Starting rung of the ladder in `Generic` mode
    pub base_prompt: Option<String>,
}

impl GenerationRequest {
    pub fn new(mode: GenerationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, image: ReferenceImage) -> Self {
        self.reference_images.subject = Some(image);
        self
    }

    pub fn with_garment(mut self, image: ReferenceImage) -> Self {
        self.reference_images.garment = Some(image);
        self
    }

    pub fn with_garment_description(mut self, description: impl Into<String>) -> Self {
        self.garment_description = Some(description.into());
        self
    }

    pub fn with_person_description(mut self, description: impl Into<String>) -> Self {
        self.person_description = Some(description.into());
        self
    }

    pub fn with_base_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.base_prompt = Some(prompt.into());
        self
    }
}

/// Output of a successful generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub data: Bytes,
    pub media_type: String,
}

impl GeneratedArtifact {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
        }
    }

    pub fn to_base64(&self) -> String {
        codec::encode_base64(&self.data)
    }

    pub fn to_data_uri(&self) -> String {
        codec::to_data_uri(&self.media_type, &self.data)
    }
}
