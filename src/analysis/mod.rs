//! Descriptive analysis of reference images.
//!
//! Single-shot, low-temperature text calls that describe a garment or a
//! person, or list an image's dominant colors. Nothing here retries: a
//! failed call is logged and replaced by a fixed fallback immediately.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::constants::{COLOR_TEMPERATURE, DESCRIPTION_TEMPERATURE, MAX_DOMINANT_COLORS};
use crate::generation::ReferenceImage;
use crate::provider::{ContentPart, ProviderError};

/// Returned by [`DescriptiveAnalyzer::describe_garment`] when the call fails
pub const GARMENT_FALLBACK: &str =
    "high-quality garment with specific characteristics and unique details";

/// Returned by [`DescriptiveAnalyzer::describe_person`] when the call fails
pub const PERSON_FALLBACK: &str =
    "person with unique features, distinctive traits and specific proportions";

/// Returned by [`DescriptiveAnalyzer::extract_dominant_colors`] when the call fails
pub const COLOR_FALLBACK: &str = "specific color";

const GARMENT_PROMPT: &str = "You are an expert in clothing analysis. Describe this garment precisely:\n\
- exact color (hue, saturation, undertones)\n\
- fabric type and visible texture\n\
- cut, silhouette and lengths (sleeves, hem)\n\
- details: buttons, zippers, seams, pockets, prints, finishes\n\
- style, neckline, waist and fit\n\
\n\
Answer in at most 100 words, being very specific about the colors, textures and details that make the garment identifiable.";

const PERSON_PROMPT: &str = "You are an expert in physical characteristics for virtual try-on. Describe this person precisely:\n\
- skin tone\n\
- hair color, texture and style\n\
- distinctive facial features\n\
- build, body proportions and pose\n\
- visible personal style\n\
\n\
Answer in at most 80 words, focusing on what makes this person unique and must be preserved.";

const COLOR_PROMPT: &str = "Identify the 3 most dominant colors in this image.\n\
Answer ONLY with the color names, separated by commas, e.g. \"navy blue, white, gray\".\n\
Be specific about shades (\"navy blue\", not just \"blue\").";

/// One call to a text-generation provider
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    pub parts: Vec<ContentPart>,
    pub temperature: f32,
}

/// A backend that answers a text+image prompt with text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<String, ProviderError>;
}

/// Describes garments and people for prompt construction
#[derive(Clone)]
pub struct DescriptiveAnalyzer {
    provider: Arc<dyn TextProvider>,
}

impl DescriptiveAnalyzer {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    async fn ask(
        &self,
        prompt: &str,
        image: &ReferenceImage,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let request = TextGenerationRequest {
            parts: vec![ContentPart::text(prompt), image.to_content_part()],
            temperature,
        };
        let text = self.provider.generate_text(&request).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ProviderError::InvalidResponse("empty analysis text".to_string()));
        }
        Ok(text.to_string())
    }

    /// Short description of a garment, or [`GARMENT_FALLBACK`].
    pub async fn describe_garment(&self, image: &ReferenceImage) -> String {
        match self.ask(GARMENT_PROMPT, image, DESCRIPTION_TEMPERATURE).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Garment analysis failed, using fallback");
                GARMENT_FALLBACK.to_string()
            }
        }
    }

    /// Short description of a person, or [`PERSON_FALLBACK`].
    pub async fn describe_person(&self, image: &ReferenceImage) -> String {
        match self.ask(PERSON_PROMPT, image, DESCRIPTION_TEMPERATURE).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Person analysis failed, using fallback");
                PERSON_FALLBACK.to_string()
            }
        }
    }

    /// Up to three dominant color names, or `[COLOR_FALLBACK]`.
    pub async fn extract_dominant_colors(&self, image: &ReferenceImage) -> Vec<String> {
        match self.ask(COLOR_PROMPT, image, COLOR_TEMPERATURE).await {
            Ok(text) => {
                let colors = parse_color_list(&text);
                if colors.is_empty() {
                    vec![COLOR_FALLBACK.to_string()]
                } else {
                    colors
                }
            }
            Err(e) => {
                warn!(error = %e, "Color extraction failed, using fallback");
                vec![COLOR_FALLBACK.to_string()]
            }
        }
    }
}

/// Split a comma-separated answer into at most three trimmed names.
pub fn parse_color_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|color| !color.is_empty())
        .take(MAX_DOMINANT_COLORS)
        .map(str::to_string)
        .collect()
}
