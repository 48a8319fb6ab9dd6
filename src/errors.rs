//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error types for the cache layer. The cache, key, watermark,
//! and storage operations themselves are total (they never return an error;
//! storage backends degrade to no-ops instead), so the variants here only
//! cover the one edge that can actually fail: loading the wiring
//! configuration.
//!
//! ## Input/Output Specification
//! - **Input**: Failure conditions from config loading
//! - **Output**: Structured error types with context
//! - **Error Categories**: Configuration, Storage, Serialization
//!
//! ## Usage
//! ```rust
//! use focusfeed_cache::errors::{Result, CacheError};
//!
//! fn load_policy() -> Result<()> {
//!     Err(CacheError::Config {
//!         message: "gc retention must be non-zero".to_string(),
//!     })
//! }
//! ```

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error types for the cache layer
#[derive(Debug, Error)]
pub enum CacheError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CacheError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CacheError::Config { .. } | CacheError::ValidationFailed { .. } => "configuration",
            CacheError::Io(_) => "storage",
            CacheError::Toml(_) => "serialization",
        }
    }
}
