use serde::{Deserialize, Serialize};

use crate::watermark::WatermarkSpec;

fn default_enabled() -> bool {
    true
}

/// Watermark section: an on/off switch plus the compositing spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub spec: WatermarkSpec,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            spec: WatermarkSpec::default(),
        }
    }
}

impl WatermarkConfig {
    /// Settings to apply, `None` when watermarking is disabled.
    pub fn active_spec(&self) -> Option<WatermarkSpec> {
        self.enabled.then_some(self.spec)
    }
}
