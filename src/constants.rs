// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Provider defaults
// =============================================================================

/// Default base URL of the generative provider REST API
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model used for image generation
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default model used for descriptive analysis
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Default provider request timeout in seconds
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Temperature used when describing garments and people
pub const DESCRIPTION_TEMPERATURE: f32 = 0.3;

/// Temperature used when extracting dominant colors
pub const COLOR_TEMPERATURE: f32 = 0.2;

/// Maximum number of dominant colors reported by the analyzer
pub const MAX_DOMINANT_COLORS: usize = 3;

// =============================================================================
// Retry defaults
// =============================================================================

/// Default maximum generation attempts (including the initial attempt)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Base delay for exponential backoff after an empty result, in milliseconds
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 1000;

/// Multiplier applied to the exponential delay after a safety rejection
pub const DEFAULT_SAFETY_MULTIPLIER: u64 = 2;

/// Flat delay after a transient provider error, in milliseconds
pub const DEFAULT_TRANSIENT_BACKOFF_MS: u64 = 1000;

/// Upper bound for any single backoff delay, in milliseconds
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 60_000;

// =============================================================================
// Watermark defaults
// =============================================================================

/// Distance between the mark and the nearest image edge(s), in pixels
pub const WATERMARK_MARGIN: u32 = 20;

/// Default global opacity for the mark
pub const DEFAULT_WATERMARK_OPACITY: f32 = 0.7;

/// Below this brightness the background is treated as dark
pub const DARK_BACKGROUND_THRESHOLD: f64 = 80.0;

/// Above this brightness the background is treated as very light
pub const LIGHT_BACKGROUND_THRESHOLD: f64 = 180.0;

/// Brightness reported for regions with no opaque pixels
pub const NEUTRAL_BRIGHTNESS: f64 = 128.0;

/// Pixels at or below this alpha are ignored by the luminosity sampler
pub const SAMPLER_ALPHA_CUTOFF: u8 = 128;

// =============================================================================
// Catalog defaults
// =============================================================================

/// Serialized catalog size that triggers trimming (4 MiB)
pub const DEFAULT_CATALOG_MAX_BYTES: usize = 4 * 1024 * 1024;

/// Items kept when the catalog grows past the size limit
pub const DEFAULT_CATALOG_TRIM_TO: usize = 10;

/// Items kept when a regular save fails
pub const DEFAULT_CATALOG_EMERGENCY_TRIM_TO: usize = 5;

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
