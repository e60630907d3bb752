// Try-on pipeline integration tests
// Full runs against fake providers: analyze, generate, watermark, store.

use super::test_harness::{
    assert_changes_within, changed_pixels, solid_image, solid_png, FakeImageProvider,
    FakeTextProvider,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use vestidor::analysis::DescriptiveAnalyzer;
use vestidor::catalog::{CatalogError, CatalogLimits, CatalogStore, FileBackend, MemoryBackend};
use vestidor::error::{TryOnError, USER_FAILURE_MESSAGE};
use vestidor::generation::{GeneratedArtifact, GenerationMode, GenerationOrchestrator, ReferenceImage};
use vestidor::pipeline::{TryOnPipeline, TryOnRequest};
use vestidor::provider::ProviderError;
use vestidor::retry::{ErrorClass, RetryPolicy};
use vestidor::watermark::{WatermarkPosition, WatermarkSize, WatermarkSpec, WatermarkStyle};

fn pipeline(
    images: Arc<FakeImageProvider>,
    text: Arc<FakeTextProvider>,
    watermark: Option<WatermarkSpec>,
    max_attempts: u32,
) -> TryOnPipeline {
    TryOnPipeline::new(
        DescriptiveAnalyzer::new(text),
        GenerationOrchestrator::new(images, RetryPolicy::with_max_attempts(max_attempts)),
        watermark,
        Arc::new(CatalogStore::in_memory()),
    )
}

fn catalog_request() -> TryOnRequest {
    TryOnRequest {
        mode: GenerationMode::Catalog,
        subject: Some(ReferenceImage::png(solid_png(40, 60, [200, 180, 160]))),
        garment: Some(ReferenceImage::png(solid_png(40, 40, [20, 30, 120]))),
        garment_description: Some("navy wrap dress with white polka dots".to_string()),
        ..TryOnRequest::default()
    }
}

// Test: Catalog run without watermark stores the provider file untouched
#[tokio::test]
async fn test_catalog_run_without_watermark() {
    let generated = GeneratedArtifact::new(solid_png(800, 600, [128, 128, 128]), "image/png");
    let images = FakeImageProvider::returning(generated.clone());
    let text = FakeTextProvider::new("unused", "navy, white");
    let pipeline = pipeline(images.clone(), text.clone(), None, 5);

    let outcome = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.artifact, generated);
    assert_eq!(images.call_count(), 1);
    // Description was supplied, so only color extraction hit the text model
    assert_eq!(text.call_count(), 1);

    let item = &outcome.item;
    assert_eq!(item.title, "Catalog look");
    assert_eq!(item.description, "navy wrap dress with white polka dots");
    assert_eq!(item.tags, vec!["navy", "white"]);
    assert_eq!(item.image.decode().unwrap(), generated.data.to_vec());
    assert!(item.model_image.as_deref().unwrap().starts_with("data:image/png;base64,"));
    assert!(item.garment_image.is_some());

    let stored = pipeline.catalog().list();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, item.id);
}

// Test: Watermarked run marks the bottom-right box of the generated image
#[tokio::test]
async fn test_catalog_run_with_watermark() {
    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(800, 600, [128, 128, 128]),
        "image/png",
    ));
    let text = FakeTextProvider::new("unused", "navy");
    let spec = WatermarkSpec::new(
        WatermarkPosition::BottomRight,
        0.6,
        WatermarkSize::Medium,
        WatermarkStyle::Full,
    );
    let pipeline = pipeline(images, text, Some(spec), 5);

    let outcome = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(outcome.artifact.media_type, "image/png");
    let after = image::load_from_memory(&outcome.artifact.data)
        .unwrap()
        .to_rgba8();
    let before = solid_image(800, 600, [128, 128, 128]);
    assert_changes_within(&changed_pixels(&before, &after), 600, 520, 180, 60);

    // The catalog holds the watermarked image
    assert_eq!(
        outcome.item.image.decode().unwrap(),
        outcome.artifact.data.to_vec()
    );
}

// Test: Try-on analyzes the person and feeds the description into the prompt
#[tokio::test]
async fn test_tryon_run_describes_person() {
    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(64, 64, [90, 90, 90]),
        "image/png",
    ));
    let text = FakeTextProvider::new("tall person with curly red hair", "ivory, black");
    let pipeline = pipeline(images.clone(), text.clone(), None, 5);

    let request = TryOnRequest {
        mode: GenerationMode::TryOn,
        title: Some("Weekend fitting".to_string()),
        ..catalog_request()
    };
    let outcome = pipeline
        .run(request, &CancellationToken::new())
        .await
        .unwrap();

    let prompt = images.requests()[0].prompt().unwrap().to_string();
    assert!(prompt.contains("tall person with curly red hair"));
    assert!(prompt.contains("navy wrap dress with white polka dots"));
    // Person description plus color extraction
    assert_eq!(text.call_count(), 2);
    assert_eq!(outcome.item.title, "Weekend fitting");
    assert_eq!(outcome.item.tags, vec!["ivory", "black"]);
}

// Test: A missing garment description is obtained from the analyzer
#[tokio::test]
async fn test_missing_garment_description_is_analyzed() {
    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(64, 64, [90, 90, 90]),
        "image/png",
    ));
    let text = FakeTextProvider::new("emerald silk blouse", "green");
    let pipeline = pipeline(images.clone(), text, None, 5);

    let request = TryOnRequest {
        garment_description: None,
        ..catalog_request()
    };
    let outcome = pipeline
        .run(request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(images.requests()[0]
        .prompt()
        .unwrap()
        .contains("emerald silk blouse"));
    assert_eq!(outcome.item.description, "emerald silk blouse");
}

// Test: Every attempt empty maps to NoImage with the generic user message
#[tokio::test(start_paused = true)]
async fn test_all_empty_maps_to_no_image() {
    let images = FakeImageProvider::new(|_| Ok(Vec::new()));
    let text = FakeTextProvider::new("unused", "navy");
    let pipeline = pipeline(images.clone(), text, None, 3);

    let err = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TryOnError::NoImage));
    assert_eq!(err.user_message(), USER_FAILURE_MESSAGE);
    assert_eq!(images.call_count(), 3);
    assert!(pipeline.catalog().is_empty());
}

// Test: Provider failures keep their class but show the same user message
#[tokio::test(start_paused = true)]
async fn test_provider_failure_is_hidden_from_users() {
    let images = FakeImageProvider::new(|_| {
        Err(ProviderError::Blocked("finishReason=SAFETY".to_string()))
    });
    let text = FakeTextProvider::new("unused", "navy");
    let pipeline = pipeline(images, text, None, 2);

    let err = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.error_class(), ErrorClass::SafetyRejection);
    assert_eq!(err.user_message(), USER_FAILURE_MESSAGE);
    assert!(!err.user_message().contains("SAFETY"));
    assert!(pipeline.catalog().is_empty());
}

// Test: A cancelled token stops the run before anything is stored
#[tokio::test]
async fn test_cancelled_run_stores_nothing() {
    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(64, 64, [90, 90, 90]),
        "image/png",
    ));
    let text = FakeTextProvider::new("unused", "navy");
    let pipeline = pipeline(images.clone(), text, None, 5);

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = pipeline.run(catalog_request(), &cancel).await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(images.call_count(), 0);
    assert!(pipeline.catalog().is_empty());
}

// Test: Looks persisted to a file are visible to a reopened catalog
#[tokio::test]
async fn test_file_catalog_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(32, 32, [10, 10, 10]),
        "image/png",
    ));
    let text = FakeTextProvider::new("unused", "black");
    let catalog = Arc::new(
        CatalogStore::open(Box::new(FileBackend::new(&path)), CatalogLimits::default()).unwrap(),
    );
    let pipeline = TryOnPipeline::new(
        DescriptiveAnalyzer::new(text),
        GenerationOrchestrator::new(images, RetryPolicy::default()),
        None,
        catalog,
    );

    let outcome = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap();

    let reopened =
        CatalogStore::open(Box::new(FileBackend::new(&path)), CatalogLimits::default()).unwrap();
    let item = reopened.get(&outcome.item.id).unwrap();
    assert_eq!(item.title, "Catalog look");
    assert_eq!(item.tags, vec!["black"]);
}

// Test: A catalog that cannot persist the look fails the run
#[tokio::test]
async fn test_catalog_save_failure_fails_the_run() {
    let images = FakeImageProvider::returning(GeneratedArtifact::new(
        solid_png(32, 32, [10, 10, 10]),
        "image/png",
    ));
    let text = FakeTextProvider::new("unused", "black");
    // Quota too small for even a single item
    let catalog = Arc::new(
        CatalogStore::open(Box::new(MemoryBackend::with_quota(10)), CatalogLimits::default())
            .unwrap(),
    );
    let pipeline = TryOnPipeline::new(
        DescriptiveAnalyzer::new(text),
        GenerationOrchestrator::new(images, RetryPolicy::default()),
        None,
        catalog,
    );

    let err = pipeline
        .run(catalog_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, TryOnError::Catalog(CatalogError::Io(_))));
    assert_eq!(err.user_message(), USER_FAILURE_MESSAGE);
    assert!(!pipeline.catalog().storage_info().has_data);
}
