// Error types module

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::generation::GenerationError;
use crate::retry::ErrorClass;
use crate::watermark::WatermarkError;

/// The only failure text ever shown to end users
pub const USER_FAILURE_MESSAGE: &str = "image generation failed";

/// Centralized error type for a try-on run
///
/// Variants keep full detail for logs. Callers facing end users should show
/// [`TryOnError::user_message`] instead of the `Display` text.
#[derive(Error, Debug)]
pub enum TryOnError {
    /// Generation was cancelled or the final attempt failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Every attempt returned an empty result
    #[error("no image generated after all attempts")]
    NoImage,

    #[error(transparent)]
    Watermark(#[from] WatermarkError),

    /// The look could not be persisted
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl TryOnError {
    /// Generic notice for end users, identical for every variant.
    pub fn user_message(&self) -> &'static str {
        USER_FAILURE_MESSAGE
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TryOnError::Generation(GenerationError::Cancelled))
    }

    /// Retry classification of the underlying provider failure, if any.
    pub fn error_class(&self) -> ErrorClass {
        match self {
            TryOnError::Generation(e) => e.error_class(),
            _ => ErrorClass::None,
        }
    }
}
