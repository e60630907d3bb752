//! Image generation with mode-specific prompts and differentiated retry.
//!
//! # Example
//!
//! ```ignore
//! use vestidor::generation::{GenerationMode, GenerationOrchestrator, GenerationRequest, ReferenceImage};
//! use vestidor::retry::RetryPolicy;
//!
//! let orchestrator = GenerationOrchestrator::new(provider, RetryPolicy::default());
//! let request = GenerationRequest::new(GenerationMode::Catalog)
//!     .with_subject(ReferenceImage::png(model_png))
//!     .with_garment(ReferenceImage::png(garment_png));
//!
//! match orchestrator.generate_with_retry(&request, &cancel).await? {
//!     Some(artifact) => save(artifact),
//!     None => println!("no image after all attempts"),
//! }
//! ```

pub mod error;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod request;

pub use error::GenerationError;
pub use orchestrator::GenerationOrchestrator;
pub use prompts::{build_prompt, translate_to_english};
pub use provider::{ImageGenerationRequest, ImageProvider};
pub use request::{
    GeneratedArtifact, GenerationMode, GenerationRequest, ReferenceImage, ReferenceImages,
};
