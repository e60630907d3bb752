use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogLimits;
use crate::constants::{
    DEFAULT_CATALOG_EMERGENCY_TRIM_TO, DEFAULT_CATALOG_MAX_BYTES, DEFAULT_CATALOG_TRIM_TO,
};

fn default_max_bytes() -> usize {
    DEFAULT_CATALOG_MAX_BYTES
}

fn default_trim_to() -> usize {
    DEFAULT_CATALOG_TRIM_TO
}

fn default_emergency_trim_to() -> usize {
    DEFAULT_CATALOG_EMERGENCY_TRIM_TO
}

/// Catalog persistence settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file holding the catalog; in-memory only when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    #[serde(default = "default_trim_to")]
    pub trim_to: usize,
    #[serde(default = "default_emergency_trim_to")]
    pub emergency_trim_to: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_bytes: default_max_bytes(),
            trim_to: default_trim_to(),
            emergency_trim_to: default_emergency_trim_to(),
        }
    }
}

impl CatalogConfig {
    pub fn limits(&self) -> CatalogLimits {
        CatalogLimits {
            max_bytes: self.max_bytes,
            trim_to: self.trim_to,
            emergency_trim_to: self.emergency_trim_to,
        }
    }
}
