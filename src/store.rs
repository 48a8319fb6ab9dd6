//! # Scalar Cache Module
//!
//! ## Purpose
//! A small string-keyed store for ad hoc memoization outside the query
//! engine's own cache. Lifecycle is entirely explicit: no TTL, no size bound,
//! no eviction. Callers own when values go in and when the store is cleared.
//!
//! ## Input/Output Specification
//! - **Input**: String keys and values of one caller-chosen type per store
//! - **Output**: Cloned values on `get`, existence on `has`
//! - **Semantics**: Last write wins; `clear` empties everything; absence is
//!   `None`, never an error
//!
//! ## Key Features
//! - Generic over the value type per call site
//! - Shared handle with interior mutability (no external locking)
//! - No per-key deletion; the only destructor is a full `clear`

use dashmap::DashMap;

/// String-keyed value store with explicit lifecycle management
pub struct ScalarCache<T> {
    entries: DashMap<String, T>,
}

impl<T: Clone> ScalarCache<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Store `value` under `key`, replacing any previous value wholesale
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.entries.insert(key.into(), value);
    }

    /// Retrieve the value stored under `key`, or `None` if it was never set
    /// or the store has been cleared since
    pub fn get(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Whether `key` currently holds a value
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Empty the entire store. A cleared store is indistinguishable from a
    /// fresh one.
    pub fn clear(&self) {
        let dropped = self.entries.len();
        self.entries.clear();
        tracing::debug!(dropped, "scalar cache cleared");
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for ScalarCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
