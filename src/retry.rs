//! Retry Logic with Differentiated Backoff
//!
//! Generative providers are non-deterministic: they occasionally return no
//! image, refuse on content-policy grounds, or fail transiently. The
//! orchestrator retries all three, but waits a different amount of time
//! depending on what went wrong.
//!
//! ## Failure Kinds
//!
//! - **EmptyResult**: the call succeeded but produced no files.
//!   Waits `base * 2^attempt` (1s, 2s, 4s, 8s with defaults).
//! - **SafetyRejection**: the provider error mentions `SAFETY` or
//!   `PROHIBITED_CONTENT`. Waits `base * 2^attempt * multiplier`
//!   (2s, 4s, 8s, 16s with defaults).
//! - **TransientError**: any other provider error. Waits a flat
//!   `transient_backoff_ms` (1s).
//!
//! Every delay is capped at `max_backoff_ms`.
//!
//! ## Configuration Example
//!
//! ```yaml
//! retry:
//!   max_attempts: 5
//!   base_backoff_ms: 1000
//!   safety_multiplier: 2
//!   transient_backoff_ms: 1000
//!   max_backoff_ms: 60000
//! ```

use std::fmt;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BASE_BACKOFF_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_BACKOFF_MS,
    DEFAULT_SAFETY_MULTIPLIER, DEFAULT_TRANSIENT_BACKOFF_MS,
};

/// Substrings in a provider error message that mark a content-policy refusal
const SAFETY_MARKERS: [&str; 2] = ["SAFETY", "PROHIBITED_CONTENT"];

/// Classification of the last provider error seen by an orchestration call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorClass {
    #[default]
    None,
    SafetyRejection,
    TransientError,
}

impl ErrorClass {
    /// Classify a provider error by its message text.
    pub fn classify(message: &str) -> Self {
        if SAFETY_MARKERS.iter().any(|marker| message.contains(marker)) {
            ErrorClass::SafetyRejection
        } else {
            ErrorClass::TransientError
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::None => "none",
            ErrorClass::SafetyRejection => "safety_rejection",
            ErrorClass::TransientError => "transient_error",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single attempt did not produce an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Provider answered without error but with zero files
    EmptyResult,
    SafetyRejection,
    TransientError,
}

impl From<ErrorClass> for FailureKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::SafetyRejection => FailureKind::SafetyRejection,
            // ErrorClass::None never reaches the backoff path
            ErrorClass::None | ErrorClass::TransientError => FailureKind::TransientError,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including initial attempt)
    pub max_attempts: u32,
    /// Base delay for exponential backoff in milliseconds
    pub base_backoff_ms: u64,
    /// Factor applied to the exponential delay after a safety rejection
    pub safety_multiplier: u64,
    /// Flat delay after a transient error in milliseconds
    pub transient_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds (cap for exponential growth)
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_backoff_ms: DEFAULT_BASE_BACKOFF_MS,
            safety_multiplier: DEFAULT_SAFETY_MULTIPLIER,
            transient_backoff_ms: DEFAULT_TRANSIENT_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default delays and a custom attempt ceiling
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Calculate the wait after a failed attempt (0-indexed).
    pub fn backoff_duration(&self, attempt: u32, kind: FailureKind) -> Duration {
        let exponential = self
            .base_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt));

        let backoff_ms = match kind {
            FailureKind::EmptyResult => exponential,
            FailureKind::SafetyRejection => exponential.saturating_mul(self.safety_multiplier),
            FailureKind::TransientError => self.transient_backoff_ms,
        };

        Duration::from_millis(backoff_ms.min(self.max_backoff_ms))
    }

    /// Whether another attempt follows `attempt` (0-indexed).
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt.saturating_add(1) < self.max_attempts
    }
}

/// Mutable progress of a single orchestration call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryState {
    pub attempt_index: u32,
    pub last_error_class: ErrorClass,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed attempt and move to the next one.
    pub fn record(&mut self, class: ErrorClass) {
        self.last_error_class = class;
        self.attempt_index += 1;
    }
}
