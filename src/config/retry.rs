//! Retry configuration for generation attempts.
//!
//! This module defines the YAML configuration format for the retry policy
//! that drives the generation orchestrator.
//!
//! Default values for max attempts and backoff delays are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS,
    DEFAULT_SAFETY_MULTIPLIER, DEFAULT_TRANSIENT_BACKOFF_MS,
};
use crate::retry::RetryPolicy;

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_base_backoff_ms() -> u64 {
    DEFAULT_BASE_BACKOFF_MS
}

fn default_safety_multiplier() -> u64 {
    DEFAULT_SAFETY_MULTIPLIER
}

fn default_transient_backoff_ms() -> u64 {
    DEFAULT_TRANSIENT_BACKOFF_MS
}

fn default_max_backoff_ms() -> u64 {
    DEFAULT_MAX_BACKOFF_MS
}

/// Retry configuration (YAML format)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfigYaml {
    /// Maximum number of attempts (including initial attempt)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay for exponential backoff in milliseconds
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
    /// Factor applied to the exponential delay after a safety rejection
    #[serde(default = "default_safety_multiplier")]
    pub safety_multiplier: u64,
    /// Flat delay after a transient error in milliseconds
    #[serde(default = "default_transient_backoff_ms")]
    pub transient_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfigYaml {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff_ms(),
            safety_multiplier: default_safety_multiplier(),
            transient_backoff_ms: default_transient_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfigYaml {
    /// Convert to RetryPolicy from retry module
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_backoff_ms: self.base_backoff_ms,
            safety_multiplier: self.safety_multiplier,
            transient_backoff_ms: self.transient_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts < 1 {
            return Err("retry.max_attempts must be at least 1".to_string());
        }
        if self.safety_multiplier < 1 {
            return Err("retry.safety_multiplier must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_defaults() {
        let yaml = "{}";
        let config: RetryConfigYaml = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config, RetryConfigYaml::default());
        assert_eq!(config.to_retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_retry_config_custom_values() {
        let yaml = r#"
max_attempts: 3
base_backoff_ms: 200
safety_multiplier: 4
transient_backoff_ms: 50
max_backoff_ms: 10000
"#;
        let config: RetryConfigYaml = serde_yaml::from_str(yaml).unwrap();
        let policy = config.to_retry_policy();

        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_backoff_ms, 200);
        assert_eq!(policy.safety_multiplier, 4);
        assert_eq!(policy.transient_backoff_ms, 50);
        assert_eq!(policy.max_backoff_ms, 10000);
    }

    #[test]
    fn test_retry_config_partial_values() {
        let config: RetryConfigYaml = serde_yaml::from_str("max_attempts: 10").unwrap();

        assert_eq!(config.max_attempts, 10);
        assert_eq!(config.base_backoff_ms, DEFAULT_BASE_BACKOFF_MS);
        assert_eq!(config.max_backoff_ms, DEFAULT_MAX_BACKOFF_MS);
    }

    #[test]
    fn test_retry_config_validation() {
        assert!(RetryConfigYaml::default().validate().is_ok());

        let config = RetryConfigYaml {
            max_attempts: 0,
            ..RetryConfigYaml::default()
        };
        assert!(config.validate().is_err());
    }
}
