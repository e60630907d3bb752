//! Try-on pipeline: analyze, generate, watermark, catalog.
//!
//! ```text
//! garment/person images
//!        │
//!        ▼
//! DescriptiveAnalyzer ──► GenerationOrchestrator ──► watermark ──► CatalogStore
//! ```
//!
//! Descriptions supplied by the caller skip the analyzer. Every failure is
//! reported as a [`TryOnError`] whose `user_message()` is the same generic
//! notice.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::analysis::DescriptiveAnalyzer;
use crate::catalog::{CatalogError, CatalogItem, CatalogStore};
use crate::codec::PNG_MEDIA_TYPE;
use crate::error::TryOnError;
use crate::generation::{
    GeneratedArtifact, GenerationMode, GenerationOrchestrator, GenerationRequest, ReferenceImage,
    ReferenceImages,
};
use crate::watermark::{apply_watermark, WatermarkError, WatermarkSpec};

/// Inputs of one try-on run
#[derive(Debug, Clone, Default)]
pub struct TryOnRequest {
    pub mode: GenerationMode,
    /// Model or customer photo
    pub subject: Option<ReferenceImage>,
    pub garment: Option<ReferenceImage>,
    pub garment_description: Option<String>,
    pub person_description: Option<String>,
    /// Base prompt for `Generic` mode
    pub prompt: Option<String>,
    pub title: Option<String>,
}

fn default_title(mode: GenerationMode) -> &'static str {
    match mode {
        GenerationMode::Catalog => "Catalog look",
        GenerationMode::TryOn => "Try-on look",
        GenerationMode::Generic => "Editorial look",
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct TryOnOutcome {
    pub item: CatalogItem,
    /// Final image (watermarked when enabled)
    pub artifact: GeneratedArtifact,
}

pub struct TryOnPipeline {
    analyzer: DescriptiveAnalyzer,
    orchestrator: GenerationOrchestrator,
    watermark: Option<WatermarkSpec>,
    catalog: Arc<CatalogStore>,
}

impl TryOnPipeline {
    pub fn new(
        analyzer: DescriptiveAnalyzer,
        orchestrator: GenerationOrchestrator,
        watermark: Option<WatermarkSpec>,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            analyzer,
            orchestrator,
            watermark,
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    pub async fn run(
        &self,
        request: TryOnRequest,
        cancel: &CancellationToken,
    ) -> Result<TryOnOutcome, TryOnError> {
        let garment_description = match (&request.garment_description, &request.garment) {
            (Some(description), _) => Some(description.clone()),
            (None, Some(garment)) => Some(self.analyzer.describe_garment(garment).await),
            (None, None) => None,
        };

        let person_description = match (&request.person_description, &request.subject) {
            (Some(description), _) => Some(description.clone()),
            (None, Some(subject)) if request.mode == GenerationMode::TryOn => {
                Some(self.analyzer.describe_person(subject).await)
            }
            _ => None,
        };

        let generation = GenerationRequest {
            mode: request.mode,
            reference_images: ReferenceImages::new(request.subject.clone(), request.garment.clone()),
            garment_description: garment_description.clone(),
            person_description,
            base_prompt: request.prompt.clone(),
        };

        let generated = self
            .orchestrator
            .generate_with_retry(&generation, cancel)
            .await
            .map_err(|e| {
                warn!(error = %e, error_class = %e.error_class(), "Try-on generation failed");
                e
            })?
            .ok_or_else(|| {
                warn!(mode = %request.mode, "Try-on produced no image");
                TryOnError::NoImage
            })?;

        let artifact = match self.watermark {
            Some(spec) => {
                let data = generated.data.clone();
                let watermarked = tokio::task::spawn_blocking(move || apply_watermark(&data, &spec))
                    .await
                    .map_err(|e| WatermarkError::TaskError(e.to_string()))??;
                GeneratedArtifact::new(watermarked, PNG_MEDIA_TYPE)
            }
            None => generated,
        };

        let tags = match &request.garment {
            Some(garment) => self.analyzer.extract_dominant_colors(garment).await,
            None => Vec::new(),
        };

        let title = request
            .title
            .unwrap_or_else(|| default_title(request.mode).to_string());
        let description = garment_description.unwrap_or_default();

        let catalog = Arc::clone(&self.catalog);
        let stored = artifact.clone();
        let sources = generation.reference_images;
        let item = tokio::task::spawn_blocking(move || {
            catalog.put(&title, &description, &stored, &sources, tags)
        })
        .await
        .map_err(|e| CatalogError::Task(e.to_string()))?
        .map_err(|e| {
            warn!(error = %e, "Try-on could not be stored");
            e
        })?;
        info!(id = %item.id, mode = %request.mode, "Try-on stored in catalog");

        Ok(TryOnOutcome { item, artifact })
    }
}
