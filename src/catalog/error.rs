//! Error types for catalog operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid catalog limits: {0}")]
    InvalidLimits(String),

    #[error("Catalog task failed: {0}")]
    Task(String),
}
