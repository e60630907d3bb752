//! Generative provider configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_IMAGE_MODEL, DEFAULT_PROVIDER_BASE_URL, DEFAULT_PROVIDER_TIMEOUT_SECS,
    DEFAULT_TEXT_MODEL,
};
use crate::provider::gemini::REDACTED;
use crate::provider::{GeminiClient, ProviderError};

fn default_base_url() -> String {
    DEFAULT_PROVIDER_BASE_URL.to_string()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.to_string()
}

fn default_text_model() -> String {
    DEFAULT_TEXT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_PROVIDER_TIMEOUT_SECS
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key, usually `${GOOGLE_GENERATIVE_AI_API_KEY}`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_model: default_image_model(),
            text_model: default_text_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("provider.api_key cannot be empty".to_string());
        }
        if self.base_url.trim().is_empty() {
            return Err("provider.base_url cannot be empty".to_string());
        }
        if self.image_model.trim().is_empty() || self.text_model.trim().is_empty() {
            return Err("provider model names cannot be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("provider.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    pub fn build_client(&self) -> Result<GeminiClient, ProviderError> {
        GeminiClient::builder(&self.api_key)
            .base_url(&self.base_url)
            .image_model(&self.image_model)
            .text_model(&self.text_model)
            .timeout_secs(self.timeout_secs)
            .build()
    }
}
