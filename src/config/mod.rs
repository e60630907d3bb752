// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod catalog;
pub mod logging;
pub mod provider;
pub mod retry;
pub mod watermark;

pub use catalog::CatalogConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use provider::ProviderConfig;
pub use retry::RetryConfigYaml;
pub use watermark::WatermarkConfig;

/// Top-level configuration, loaded from YAML.
///
/// Every section is optional; omitted sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub retry: RetryConfigYaml,
    #[serde(default)]
    pub watermark: WatermarkConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Validate every section except the provider credentials.
    ///
    /// Commands that never reach the provider (watermarking, mark preview)
    /// only need this much.
    pub fn validate_offline(&self) -> Result<(), String> {
        self.retry.validate()?;
        self.watermark.spec.validate()?;
        self.catalog.limits().validate()?;
        if self.logging.level.trim().is_empty() {
            return Err("logging.level cannot be empty".to_string());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.provider.validate()?;
        self.validate_offline()
    }
}
