//! # Cache Wiring Module
//!
//! ## Purpose
//! The process-wide policy bound to the external query engine at startup:
//! default staleness window, garbage-collection retention, retry counts, and
//! refetch triggers. Constructed once when the app shell boots and shared
//! read-only (behind an `Arc`) from then on; changing policy means
//! reconstructing at startup, never mutating at runtime.
//!
//! ## Input/Output Specification
//! - **Input**: Optional TOML file, environment variable overrides
//! - **Output**: Validated [`QueryCacheConfig`] with the fixed default policy
//! - **Validation**: Retention must be non-zero and cover the default window
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Environment variables (`FOCUSFEED_CACHE_DEFAULT_STALENESS`,
//!    `FOCUSFEED_CACHE_GC_RETENTION_MS`; the retry and refetch fields are
//!    file-only)
//! 2. Configuration file
//! 3. Default values
//!
//! ## Usage
//! ```rust,no_run
//! use focusfeed_cache::config::QueryCacheConfig;
//!
//! let config = QueryCacheConfig::load()?;
//! assert_eq!(config.retry.reads, 1);
//! # Ok::<(), focusfeed_cache::errors::CacheError>(())
//! ```

use crate::errors::{CacheError, Result};
use crate::staleness::StalenessWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Process-wide query cache policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryCacheConfig {
    /// Staleness window applied to every query that does not override it
    pub default_staleness: StalenessWindow,
    /// How long unused cached data survives in the engine before it is
    /// eligible for removal, in milliseconds
    pub gc_retention_ms: u64,
    /// Automatic retry counts
    pub retry: RetryConfig,
    /// Refetch triggers while data is within its staleness window
    pub refetch: RefetchConfig,
}

/// Automatic retry counts for failed operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries for failed reads
    pub reads: u32,
    /// Retries for failed mutations
    pub mutations: u32,
}

/// Which events trigger a refetch of data that is still fresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefetchConfig {
    /// Refetch when the window regains focus
    pub on_focus: bool,
    /// Refetch when a consumer remounts
    pub on_mount: bool,
    /// Refetch when network connectivity returns
    pub on_reconnect: bool,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            default_staleness: StalenessWindow::Medium,
            gc_retention_ms: 600_000,
            retry: RetryConfig {
                reads: 1,
                mutations: 1,
            },
            refetch: RefetchConfig {
                on_focus: true,
                on_mount: false,
                on_reconnect: false,
            },
        }
    }
}

impl QueryCacheConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("cache.toml")
    }

    /// Load configuration from a specific file. A missing file is not an
    /// error; the fixed default policy applies.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(window) = std::env::var("FOCUSFEED_CACHE_DEFAULT_STALENESS") {
            self.default_staleness =
                serde_json::from_value(serde_json::Value::String(window.clone())).map_err(|_| {
                    CacheError::Config {
                        message: format!(
                            "Unknown staleness window '{}' in FOCUSFEED_CACHE_DEFAULT_STALENESS",
                            window
                        ),
                    }
                })?;
        }
        if let Ok(retention) = std::env::var("FOCUSFEED_CACHE_GC_RETENTION_MS") {
            self.gc_retention_ms = retention.parse().map_err(|_| CacheError::Config {
                message: "Invalid value in FOCUSFEED_CACHE_GC_RETENTION_MS".to_string(),
            })?;
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.gc_retention_ms == 0 {
            return Err(CacheError::ValidationFailed {
                field: "gc_retention_ms".to_string(),
                reason: "Retention cannot be zero".to_string(),
            });
        }

        // data that goes stale must outlive its window, or the engine could
        // evict entries it would otherwise have served
        if let Some(stale_ms) = self.default_staleness.as_millis() {
            if stale_ms > self.gc_retention_ms {
                return Err(CacheError::ValidationFailed {
                    field: "default_staleness".to_string(),
                    reason: format!(
                        "Default window ({}ms) exceeds gc retention ({}ms)",
                        stale_ms, self.gc_retention_ms
                    ),
                });
            }
        }

        Ok(())
    }

    /// Garbage-collection retention as a [`Duration`]
    pub fn gc_retention(&self) -> Duration {
        Duration::from_millis(self.gc_retention_ms)
    }

    /// Get configuration as TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CacheError::Config {
            message: format!("Failed to serialize config to TOML: {}", e),
        })
    }
}
