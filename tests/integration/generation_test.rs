// Generation orchestrator integration tests
// Time is paused so backoff waits complete instantly but stay measurable.

use super::test_harness::FakeImageProvider;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use vestidor::generation::{
    GeneratedArtifact, GenerationError, GenerationMode, GenerationOrchestrator, GenerationRequest,
    ReferenceImage,
};
use vestidor::provider::{ContentPart, ProviderError, ResponseModality};
use vestidor::retry::{ErrorClass, RetryPolicy};

fn png(tag: u8) -> GeneratedArtifact {
    GeneratedArtifact::new(vec![0x89, b'P', b'N', b'G', tag], "image/png")
}

fn tryon_request() -> GenerationRequest {
    GenerationRequest::new(GenerationMode::TryOn)
        .with_subject(ReferenceImage::new("image/jpeg", vec![1u8, 1, 1]))
        .with_garment(ReferenceImage::png(vec![2u8, 2, 2]))
        .with_person_description("woman with short black hair")
        .with_garment_description("red wool coat")
}

// Test: A provider that answers right away is called once
#[tokio::test(start_paused = true)]
async fn test_first_attempt_success_returns_first_file() {
    let provider = FakeImageProvider::new(|_| Ok(vec![png(1), png(2)]));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), RetryPolicy::default());

    let started = Instant::now();
    let result = orchestrator
        .generate_with_retry(&tryon_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result, Some(png(1)));
    assert_eq!(provider.call_count(), 1);
    assert!(started.elapsed() < Duration::from_millis(50));
}

// Test: Every request carries the prompt then subject then garment, with image output
#[tokio::test(start_paused = true)]
async fn test_request_layout_is_prompt_subject_garment() {
    let provider = FakeImageProvider::returning(png(1));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), RetryPolicy::default());

    orchestrator
        .generate_with_retry(&tryon_request(), &CancellationToken::new())
        .await
        .unwrap();

    let request = &provider.requests()[0];
    assert_eq!(request.parts.len(), 3);
    let prompt = request.prompt().unwrap();
    assert!(prompt.contains("woman with short black hair"));
    assert!(prompt.contains("red wool coat"));
    assert_eq!(
        request.parts[1],
        ContentPart::image("image/jpeg", vec![1u8, 1, 1])
    );
    assert_eq!(request.parts[2], ContentPart::image("image/png", vec![2u8, 2, 2]));
    assert_eq!(request.response_modalities, vec![ResponseModality::Image]);
    assert_eq!(request.safety_settings.len(), 4);
}

// Test: Transient failures are retried with a flat wait until one succeeds
#[tokio::test(start_paused = true)]
async fn test_transient_failures_then_success() {
    let provider = FakeImageProvider::new(|i| {
        if i < 2 {
            Err(ProviderError::Api {
                status: 503,
                body: "model overloaded".to_string(),
            })
        } else {
            Ok(vec![png(9)])
        }
    });
    let orchestrator = GenerationOrchestrator::new(provider.clone(), RetryPolicy::default());

    let started = Instant::now();
    let result = orchestrator
        .generate_with_retry(&tryon_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result, Some(png(9)));
    assert_eq!(provider.call_count(), 3);
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(2) && elapsed < Duration::from_millis(2050),
        "elapsed {:?}",
        elapsed
    );
}

// Test: Exhausting attempts on safety rejections surfaces the last error
#[tokio::test(start_paused = true)]
async fn test_safety_rejections_exhaust_attempts() {
    let provider = FakeImageProvider::new(|i| {
        Err(ProviderError::Blocked(format!(
            "finishReason=PROHIBITED_CONTENT (call {})",
            i + 1
        )))
    });
    let orchestrator =
        GenerationOrchestrator::new(provider.clone(), RetryPolicy::with_max_attempts(3));

    let started = Instant::now();
    let err = orchestrator
        .generate_with_retry(&tryon_request(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(provider.call_count(), 3);
    assert_eq!(err.error_class(), ErrorClass::SafetyRejection);
    match err {
        GenerationError::Provider {
            attempts, source, ..
        } => {
            assert_eq!(attempts, 3);
            assert!(source.to_string().contains("call 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // 2s after the first attempt, 4s after the second, none after the last
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_secs(6) && elapsed < Duration::from_millis(6050),
        "elapsed {:?}",
        elapsed
    );
}

// Test: Only empty results ends with no image and no error
#[tokio::test(start_paused = true)]
async fn test_all_empty_results_yield_none() {
    let provider = FakeImageProvider::new(|_| Ok(Vec::new()));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), RetryPolicy::default());

    let result = orchestrator
        .generate_with_retry(&tryon_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(provider.call_count(), 5);
}

// Test: Generic mode walks the prompt ladder and keeps the last rung
#[tokio::test(start_paused = true)]
async fn test_generic_mode_changes_prompt_each_attempt() {
    let provider = FakeImageProvider::new(|_| Ok(Vec::new()));
    let orchestrator =
        GenerationOrchestrator::new(provider.clone(), RetryPolicy::with_max_attempts(7));
    let request = GenerationRequest::new(GenerationMode::Generic)
        .with_base_prompt("linen summer suit on a terrace");

    orchestrator
        .generate_with_retry(&request, &CancellationToken::new())
        .await
        .unwrap();

    let prompts: Vec<String> = provider
        .requests()
        .iter()
        .map(|r| r.prompt().unwrap().to_string())
        .collect();
    assert_eq!(prompts.len(), 7);
    assert_eq!(prompts[0], "linen summer suit on a terrace");
    for pair in prompts[..5].windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
    assert_eq!(prompts[5], prompts[4]);
    assert_eq!(prompts[6], prompts[4]);
}

// Test: Cancelling during a backoff wait stops the loop
#[tokio::test(start_paused = true)]
async fn test_cancellation_interrupts_backoff() {
    let provider = FakeImageProvider::new(|_| Ok(Vec::new()));
    let orchestrator = GenerationOrchestrator::new(provider.clone(), RetryPolicy::default());
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        canceller.cancel();
    });

    let err = orchestrator
        .generate_with_retry(&tryon_request(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Cancelled));
    // First call at 0s, second at 1s, cancelled during the 2s wait
    assert_eq!(provider.call_count(), 2);
}
