// Shared fakes and raster helpers for integration tests

use std::sync::Arc;

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use vestidor::analysis::{TextGenerationRequest, TextProvider};
use vestidor::codec;
use vestidor::generation::{GeneratedArtifact, ImageGenerationRequest, ImageProvider};
use vestidor::provider::ProviderError;

type ImageScript =
    Box<dyn Fn(usize) -> Result<Vec<GeneratedArtifact>, ProviderError> + Send + Sync>;

/// Image provider that answers from a script keyed by the 0-based call number
pub struct FakeImageProvider {
    script: ImageScript,
    requests: Mutex<Vec<ImageGenerationRequest>>,
}

impl FakeImageProvider {
    pub fn new(
        script: impl Fn(usize) -> Result<Vec<GeneratedArtifact>, ProviderError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always return the same single file.
    pub fn returning(artifact: GeneratedArtifact) -> Arc<Self> {
        Self::new(move |_| Ok(vec![artifact.clone()]))
    }

    pub fn requests(&self) -> Vec<ImageGenerationRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ImageProvider for FakeImageProvider {
    async fn generate_image(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<Vec<GeneratedArtifact>, ProviderError> {
        let index = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.script)(index)
    }
}

/// Text provider that answers descriptions and color lists with fixed text.
///
/// Color extraction runs at a lower temperature than descriptions, which is
/// how the two are told apart.
pub struct FakeTextProvider {
    pub description: String,
    pub colors: String,
    calls: Mutex<usize>,
}

impl FakeTextProvider {
    pub fn new(description: &str, colors: &str) -> Arc<Self> {
        Arc::new(Self {
            description: description.to_string(),
            colors: colors.to_string(),
            calls: Mutex::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl TextProvider for FakeTextProvider {
    async fn generate_text(&self, request: &TextGenerationRequest) -> Result<String, ProviderError> {
        *self.calls.lock() += 1;
        if request.temperature < 0.25 {
            Ok(self.colors.clone())
        } else {
            Ok(self.description.clone())
        }
    }
}

pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([rgb[0], rgb[1], rgb[2], 255]))
}

pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    codec::encode_png(&solid_image(width, height, rgb)).unwrap()
}

/// Coordinates of every pixel that differs between two equally sized rasters
pub fn changed_pixels(before: &RgbaImage, after: &RgbaImage) -> Vec<(u32, u32)> {
    assert_eq!(before.dimensions(), after.dimensions());
    before
        .enumerate_pixels()
        .filter(|(x, y, pixel)| after.get_pixel(*x, *y) != *pixel)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Assert that every changed pixel lies in `[x, x + w) x [y, y + h)` and that
/// at least one pixel changed.
pub fn assert_changes_within(changed: &[(u32, u32)], x: u32, y: u32, w: u32, h: u32) {
    assert!(!changed.is_empty(), "expected the mark to change some pixels");
    for &(px, py) in changed {
        assert!(
            px >= x && px < x + w && py >= y && py < y + h,
            "pixel ({}, {}) changed outside the {}x{} box at ({}, {})",
            px,
            py,
            w,
            h,
            x,
            y
        );
    }
}
