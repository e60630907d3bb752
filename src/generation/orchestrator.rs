//! Generation orchestrator.
//!
//! Drives one image generation through up to `max_attempts` provider calls.
//! Each attempt rebuilds the prompt for the request's mode, swaps it into the
//! first content part, and resends the reference images unchanged. The first
//! attempt that yields at least one file wins. Failures wait according to
//! [`RetryPolicy`] before the next attempt:
//!
//! | Outcome | Wait before next attempt |
//! |---|---|
//! | empty result | `base * 2^attempt` |
//! | safety rejection | `base * 2^attempt * multiplier` |
//! | other provider error | flat `transient_backoff_ms` |
//!
//! A provider error on the final attempt is returned to the caller. If every
//! attempt comes back empty the result is `Ok(None)`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::prompts::build_prompt;
use super::{GeneratedArtifact, GenerationError, GenerationRequest, ImageGenerationRequest, ImageProvider};
use crate::provider::ContentPart;
use crate::retry::{ErrorClass, FailureKind, RetryPolicy, RetryState};

/// Retry-aware front end to an [`ImageProvider`]
#[derive(Clone)]
pub struct GenerationOrchestrator {
    provider: Arc<dyn ImageProvider>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for GenerationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl GenerationOrchestrator {
    pub fn new(provider: Arc<dyn ImageProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Generate an image, retrying per the policy.
    ///
    /// Returns `Ok(Some(_))` on the first attempt with output, `Ok(None)`
    /// when all attempts were empty, and `Err` when the final attempt failed
    /// or `cancel` fired.
    pub async fn generate_with_retry(
        &self,
        request: &GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<Option<GeneratedArtifact>, GenerationError> {
        let max_attempts = self.policy.max_attempts;

        let mut parts = vec![ContentPart::Text(String::new())];
        parts.extend(
            request
                .reference_images
                .iter()
                .map(|image| image.to_content_part()),
        );
        let mut call = ImageGenerationRequest::new(parts);

        let mut state = RetryState::new();
        while state.attempt_index < max_attempts {
            let attempt = state.attempt_index;
            call.parts[0] = ContentPart::Text(build_prompt(request, attempt));

            debug!(
                attempt = attempt + 1,
                max_attempts,
                mode = %request.mode,
                images = call.parts.len() - 1,
                "Calling image provider"
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                result = self.provider.generate_image(&call) => result,
            };

            let failure = match outcome {
                Ok(artifacts) if !artifacts.is_empty() => {
                    info!(
                        attempt = attempt + 1,
                        mode = %request.mode,
                        files = artifacts.len(),
                        "Image generated"
                    );
                    return Ok(artifacts.into_iter().next());
                }
                Ok(_) => {
                    state.record(ErrorClass::None);
                    debug!(attempt = attempt + 1, "Provider returned no files");
                    FailureKind::EmptyResult
                }
                Err(error) => {
                    let class = ErrorClass::classify(&error.to_string());
                    state.record(class);
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        error_class = %class,
                        error = %error,
                        "Image provider call failed"
                    );

                    if !self.policy.should_retry(attempt) {
                        return Err(GenerationError::Provider {
                            class,
                            attempts: state.attempt_index,
                            source: error,
                        });
                    }
                    FailureKind::from(class)
                }
            };

            if self.policy.should_retry(attempt) {
                let delay = self.policy.backoff_duration(attempt, failure);
                debug!(
                    attempt = attempt + 1,
                    backoff_ms = delay.as_millis() as u64,
                    "Backing off before next attempt"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        warn!(
            attempts = state.attempt_index,
            mode = %request.mode,
            "No image generated after all attempts"
        );
        Ok(None)
    }
}
