// Vestidor virtual try-on library

pub mod analysis;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod logging;
pub mod pipeline; // Try-on request flow: analyze, generate, watermark, store
pub mod provider;
pub mod retry; // Attempt bookkeeping and backoff delays
pub mod watermark;
