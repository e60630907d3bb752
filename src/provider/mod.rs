//! Generative provider plumbing.
//!
//! Types shared by every provider backend: the ordered content list sent
//! with each call, the fixed safety policy, and the provider error type.
//! The HTTP backend lives in [`gemini`].

pub mod gemini;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::{GeminiClient, GeminiClientBuilder};

/// Errors raised by a provider call.
///
/// The orchestrator classifies these by their `Display` text, so blocked
/// generations keep the provider's reason (e.g. `PROHIBITED_CONTENT`) in the
/// message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider config error: {0}")]
    InvalidConfig(String),

    #[error("Provider connection error: {0}")]
    Connection(String),

    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Generation blocked: {0}")]
    Blocked(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// HTTP status of the failed call, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One entry of the ordered content list sent to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    Image { media_type: String, data: Bytes },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    pub fn image(media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        ContentPart::Image {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(text) => Some(text),
            ContentPart::Image { .. } => None,
        }
    }
}

/// Harm categories covered by the safety policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategorySexuallyExplicit,
    HarmCategoryHarassment,
    HarmCategoryDangerousContent,
    HarmCategoryHateSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmThreshold,
}

/// The fixed safety policy: all four categories block only high severity.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryDangerousContent,
        HarmCategory::HarmCategoryHateSpeech,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmThreshold::BlockOnlyHigh,
    })
    .collect()
}

/// Output modality requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseModality {
    Text,
    Image,
}
