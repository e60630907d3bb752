//! Gemini `generateContent` client.
//!
//! Implements both [`ImageProvider`] and [`TextProvider`] over the REST API:
//!
//! ```text
//! POST {base_url}/models/{model}:generateContent
//! x-goog-api-key: <key>
//! ```
//!
//! Request bodies carry the content parts in order (text first, then inline
//! images), the fixed safety policy, and a generation config that either
//! asks for image output or sets the sampling temperature.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ContentPart, ProviderError, ResponseModality, SafetySetting};
use crate::analysis::{TextGenerationRequest, TextProvider};
use crate::codec;
use crate::constants::{
    DEFAULT_IMAGE_MODEL, DEFAULT_PROVIDER_BASE_URL, DEFAULT_PROVIDER_TIMEOUT_SECS,
    DEFAULT_TEXT_MODEL,
};
use crate::generation::{GeneratedArtifact, ImageGenerationRequest, ImageProvider};

/// Longest slice of an error body kept in a [`ProviderError::Api`]
const ERROR_BODY_EXCERPT: usize = 512;

/// Finish reasons that mean the candidate was withheld for policy reasons
const BLOCKING_FINISH_REASONS: [&str; 5] = [
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<ResponseModality>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn to_wire_parts(parts: &[ContentPart]) -> Vec<Part> {
    parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part {
                text: Some(text.clone()),
                inline_data: None,
            },
            ContentPart::Image { media_type, data } => Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: media_type.clone(),
                    data: codec::encode_base64(data),
                }),
            },
        })
        .collect()
}

fn user_content(parts: &[ContentPart]) -> Vec<Content> {
    vec![Content {
        role: Some("user".to_string()),
        parts: to_wire_parts(parts),
    }]
}

fn image_request_body(request: &ImageGenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: user_content(&request.parts),
        safety_settings: request.safety_settings.clone(),
        generation_config: GenerationConfig {
            response_modalities: Some(request.response_modalities.clone()),
            temperature: None,
        },
    }
}

fn text_request_body(request: &TextGenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: user_content(&request.parts),
        safety_settings: Vec::new(),
        generation_config: GenerationConfig {
            response_modalities: None,
            temperature: Some(request.temperature),
        },
    }
}

fn check_prompt_feedback(response: &GenerateContentResponse) -> Result<(), ProviderError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(ProviderError::Blocked(reason.to_string()));
    }
    Ok(())
}

/// Extract generated images from a response body.
///
/// A blocked prompt, or a policy finish reason with no image attached, is an
/// error. Any other response without images is an empty list.
fn parse_image_response(
    response: GenerateContentResponse,
) -> Result<Vec<GeneratedArtifact>, ProviderError> {
    check_prompt_feedback(&response)?;

    let mut artifacts = Vec::new();
    let mut blocked_reason = None;

    for candidate in response.candidates {
        if let Some(reason) = candidate.finish_reason {
            if BLOCKING_FINISH_REASONS.contains(&reason.as_str()) {
                blocked_reason = Some(reason);
            }
        }

        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        for inline in parts.into_iter().filter_map(|part| part.inline_data) {
            let data = codec::decode_base64(&inline.data)
                .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
            artifacts.push(GeneratedArtifact::new(Bytes::from(data), inline.mime_type));
        }
    }

    match blocked_reason {
        Some(reason) if artifacts.is_empty() => Err(ProviderError::Blocked(format!(
            "finishReason={}",
            reason
        ))),
        _ => Ok(artifacts),
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_text_response(response: GenerateContentResponse) -> Result<String, ProviderError> {
    check_prompt_feedback(&response)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ProviderError::InvalidResponse(
            "response contained no text".to_string(),
        ));
    }
    Ok(text)
}

fn excerpt(body: &str) -> String {
    body.chars().take(ERROR_BODY_EXCERPT).collect()
}

// =============================================================================
// Client
// =============================================================================

/// Stands in for the API key in `Debug` output
pub(crate) const REDACTED: &str = "<redacted>";

/// HTTP client for the Gemini REST API
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    image_model: String,
    text_model: String,
    timeout: Duration,
    client: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &REDACTED)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Builder for [`GeminiClient`]
#[derive(Clone)]
pub struct GeminiClientBuilder {
    api_key: String,
    base_url: String,
    image_model: String,
    text_model: String,
    timeout_secs: u64,
}

impl std::fmt::Debug for GeminiClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientBuilder")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiClientBuilder {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn image_model(mut self, model: &str) -> Self {
        self.image_model = model.to_string();
        self
    }

    pub fn text_model(mut self, model: &str) -> Self {
        self.text_model = model.to_string();
        self
    }

    pub fn timeout_secs(mut self, timeout: u64) -> Self {
        self.timeout_secs = timeout;
        self
    }

    /// Builds the client
    ///
    /// # Errors
    /// Returns [`ProviderError::InvalidConfig`] if the API key, base URL or a
    /// model name is empty, or the HTTP client cannot be created.
    pub fn build(self) -> Result<GeminiClient, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "API key cannot be empty".to_string(),
            ));
        }
        if self.base_url.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "base URL cannot be empty".to_string(),
            ));
        }
        if self.image_model.is_empty() || self.text_model.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "model names cannot be empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProviderError::InvalidConfig(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(GeminiClient {
            base_url: self.base_url,
            api_key: self.api_key,
            image_model: self.image_model,
            text_model: self.text_model,
            timeout,
            client,
        })
    }
}

impl GeminiClient {
    pub fn builder(api_key: &str) -> GeminiClientBuilder {
        GeminiClientBuilder::new(api_key)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = self.endpoint(model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Connection(format!("Request timed out: {}", e))
                } else if e.is_connect() {
                    ProviderError::Connection(format!("Failed to connect: {}", e))
                } else {
                    ProviderError::Connection(format!("HTTP request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: excerpt(&error_body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl ImageProvider for GeminiClient {
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedArtifact>, ProviderError> {
        let body = image_request_body(request);
        let response = self.generate_content(&self.image_model, &body).await?;
        let artifacts = parse_image_response(response)?;
        tracing::debug!(
            model = %self.image_model,
            files = artifacts.len(),
            "Image generation call returned"
        );
        Ok(artifacts)
    }
}

#[async_trait]
impl TextProvider for GeminiClient {
    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<String, ProviderError> {
        let body = text_request_body(request);
        let response = self.generate_content(&self.text_model, &body).await?;
        parse_text_response(response)
    }
}
