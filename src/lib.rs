//! # FocusFeed Client Cache Layer
//!
//! ## Overview
//! This library implements the client-side cache and freshness-tracking layer
//! for the FocusFeed app shell: deterministic cache keys and staleness
//! windows handed to the external query engine, a persisted "last seen"
//! watermark for unseen-item badges, and the small primitives around them.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `store`: Generic string-keyed scalar cache for ad hoc memoization
//! - `debounce`: Delayed propagation of rapidly-changing values
//! - `keys`: Cache key constructors for every cacheable resource family
//! - `staleness`: Named staleness-window duration table
//! - `storage`: Injected key-value string storage capability
//! - `watermark`: Feed acknowledgment watermark and unseen-item counting
//! - `config`: Process-wide query cache wiring
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Resource identifiers, filter objects, fetched item batches
//! - **Output**: Cache keys, staleness durations, unseen counts
//! - **Boundary**: Fetch execution, retry timing, and request deduplication
//!   belong to the external query engine this layer configures
//!
//! ## Usage
//! ```rust
//! use focusfeed_cache::{keys, StalenessWindow, WatermarkTracker};
//!
//! let key = keys::user_stats("user-42");
//! let window = StalenessWindow::VeryLong;
//! assert_eq!(key.to_string(), "users/stats/user-42");
//! assert_eq!(window.as_millis(), Some(3_600_000));
//!
//! let tracker = WatermarkTracker::detached();
//! assert_eq!(tracker.read(), None);
//! ```

// Core modules
pub mod config;
pub mod debounce;
pub mod errors;
pub mod keys;
pub mod staleness;
pub mod storage;
pub mod store;
pub mod watermark;

// Re-exports for convenience
pub use config::QueryCacheConfig;
pub use debounce::Debouncer;
pub use errors::{CacheError, Result};
pub use keys::CacheKey;
pub use staleness::StalenessWindow;
pub use storage::{FileStorage, MemoryStorage, NoopStorage, StorageBackend};
pub use store::ScalarCache;
pub use watermark::{count_new, TimestampLike, Timestamped, WatermarkTracker};
