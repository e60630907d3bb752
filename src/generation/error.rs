use thiserror::Error;

use crate::provider::ProviderError;
use crate::retry::ErrorClass;

/// Terminal outcome of an orchestration call that did not produce an image.
///
/// Exhausting every attempt on empty results is not an error; it is
/// reported as `Ok(None)` by the orchestrator.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The final attempt raised a provider error
    #[error("generation failed after {attempts} attempt(s) ({class}): {source}")]
    Provider {
        class: ErrorClass,
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    #[error("generation cancelled")]
    Cancelled,
}

impl GenerationError {
    pub fn error_class(&self) -> ErrorClass {
        match self {
            GenerationError::Provider { class, .. } => *class,
            GenerationError::Cancelled => ErrorClass::None,
        }
    }
}
