//! # Storage Backend Module
//!
//! ## Purpose
//! The injected key-value string storage capability behind the watermark
//! tracker. In the browser shell this is backed by origin storage; in tests
//! by memory; in capability-less contexts (server-side rendering) by a no-op.
//! The mechanism is swappable without touching any call site.
//!
//! ## Input/Output Specification
//! - **Input**: String keys and string values
//! - **Output**: `Option<String>` on read; writes and removals return nothing
//! - **Degradation**: Backends never error. A backend that cannot perform an
//!   operation logs and behaves as if the key were absent.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Capability-gated key-value string store. All operations are infallible at
/// the signature level; a degraded backend reads as empty and ignores writes.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if present
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str);

    /// Remove `key` entirely; absent keys are ignored
    fn remove(&self, key: &str);
}

/// In-memory backend for tests and ephemeral contexts
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

/// File-backed storage: one file per key under a base directory. The durable
/// stand-in for browser origin storage when the shell runs outside a browser.
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `base_dir`. The directory is created on
    /// first write, not here, so construction cannot fail.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys are dotted identifiers; anything else is flattened so a key
        // can never escape the base directory
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_dir.join(sanitized)
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "file storage read degraded to absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.base_dir) {
            tracing::warn!(key, error = %e, "file storage write dropped");
            return;
        }
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            tracing::warn!(key, error = %e, "file storage write dropped");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(key, error = %e, "file storage remove dropped");
            }
        }
    }
}

/// The capability-absent context: reads are empty, writes vanish
pub struct NoopStorage;

impl StorageBackend for NoopStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}

    fn remove(&self, _key: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Install a subscriber so the degradation warnings emitted by the file
    /// backend are visible when running with RUST_LOG set
    fn init_test_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_memory_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);
        storage.set("k", "v1");
        storage.set("k", "v2");
        assert_eq!(storage.get("k"), Some("v2".to_string()));
        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_file_backend_degrades_instead_of_erroring() {
        init_test_logging();

        // base "directory" is actually a file, so every operation fails at
        // the filesystem; the backend must log and read as empty
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let storage = FileStorage::new(blocker.path());

        storage.set("feed.last_seen", "1700000000000");
        assert_eq!(storage.get("feed.last_seen"), None);
        storage.remove("feed.last_seen");
        assert_eq!(storage.get("feed.last_seen"), None);
    }

    #[test]
    fn test_file_roundtrip() {
        init_test_logging();
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("feed.last_seen"), None);
        storage.set("feed.last_seen", "1700000000000");
        assert_eq!(storage.get("feed.last_seen"), Some("1700000000000".to_string()));
        storage.remove("feed.last_seen");
        assert_eq!(storage.get("feed.last_seen"), None);
    }

    #[test]
    fn test_file_remove_of_absent_key_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.remove("never_written");
    }

    #[test]
    fn test_file_keys_cannot_escape_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("../escape", "x");
        assert_eq!(storage.get("../escape"), Some("x".to_string()));
        assert!(dir.path().join(".._escape").exists());
    }

    #[test]
    fn test_noop_reads_empty_and_swallows_writes() {
        let storage = NoopStorage;
        storage.set("k", "v");
        assert_eq!(storage.get("k"), None);
        storage.remove("k");
    }
}
