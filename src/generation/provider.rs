//! Image provider seam.

use async_trait::async_trait;

use super::GeneratedArtifact;
use crate::provider::{
    default_safety_settings, ContentPart, ProviderError, ResponseModality, SafetySetting,
};

/// One call to an image-generation provider
#[derive(Debug, Clone, PartialEq)]
pub struct ImageGenerationRequest {
    /// Prompt text first, then reference images in order
    pub parts: Vec<ContentPart>,
    pub safety_settings: Vec<SafetySetting>,
    pub response_modalities: Vec<ResponseModality>,
}

impl ImageGenerationRequest {
    /// Request image output under the fixed safety policy.
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            safety_settings: default_safety_settings(),
            response_modalities: vec![ResponseModality::Image],
        }
    }

    /// The prompt text, if the first part is text.
    pub fn prompt(&self) -> Option<&str> {
        self.parts.first().and_then(ContentPart::as_text)
    }
}

/// A backend that turns a prompt plus reference images into images.
///
/// An empty `Ok` list is a soft failure, not an error.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedArtifact>, ProviderError>;
}
