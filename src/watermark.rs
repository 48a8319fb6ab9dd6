//! # Freshness Watermark Module
//!
//! ## Purpose
//! Tracks the last moment the user acknowledged the activity feed as a single
//! persisted epoch-millisecond timestamp, and counts how many items in a
//! fetched batch postdate it. One scalar instead of a set of seen ids keeps
//! the storage footprint constant regardless of feed size, and viewing the
//! feed only ever advances the watermark forward.
//!
//! ## Input/Output Specification
//! - **Input**: Feed item batches with heterogeneous creation-time shapes
//! - **Output**: The watermark (or `None` when never set) and an unseen count
//! - **Persistence**: One fixed storage key holding a decimal millis string,
//!   no versioning, no per-account namespacing
//!
//! ## Key Features
//! - `read` / `touch` / `reset` over one injected storage backend
//! - Capability guard: a detached tracker no-ops instead of crashing in
//!   contexts without storage (server-side rendering)
//! - Timestamp normalization across the three upstream wire shapes
//!
//! The storage key is shared by every account that signs in on the same
//! origin. `reset` on sign-out is what prevents one account's watermark from
//! leaking into the next session; that call is the auth teardown's job.

use crate::storage::{NoopStorage, StorageBackend};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed storage key for the watermark. There is exactly one watermark per
/// storage origin.
pub const WATERMARK_STORAGE_KEY: &str = "feed.last_seen";

/// Creation time of a feed item, in any of the shapes upstream serializers
/// emit. All shapes normalize to the same epoch-millisecond value when they
/// represent the same instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimestampLike {
    /// Raw epoch milliseconds
    EpochMillis(i64),
    /// Native datetime (RFC 3339 on the wire)
    DateTime(DateTime<Utc>),
    /// The document store's `{ seconds, nanoseconds? }` record
    SecondsRecord {
        seconds: i64,
        #[serde(default)]
        nanoseconds: Option<u32>,
    },
}

impl TimestampLike {
    /// Canonical epoch-millisecond value. The seconds record normalizes as
    /// `seconds * 1000`; the nanoseconds field is accepted but not folded in,
    /// matching what the document store client reports.
    pub fn to_epoch_millis(&self) -> i64 {
        match self {
            TimestampLike::EpochMillis(ms) => *ms,
            TimestampLike::DateTime(dt) => dt.timestamp_millis(),
            TimestampLike::SecondsRecord { seconds, .. } => seconds.saturating_mul(1000),
        }
    }
}

/// Anything carrying an optional creation time. Items with no recognizable
/// creation time normalize to epoch 0 and are never counted as new.
pub trait Timestamped {
    fn created_at(&self) -> Option<&TimestampLike>;
}

/// Normalize an optional creation time to epoch milliseconds, with 0 as the
/// permissive fallback for missing values
pub fn normalize_timestamp(ts: Option<&TimestampLike>) -> i64 {
    ts.map(TimestampLike::to_epoch_millis).unwrap_or(0)
}

/// Count the items whose creation time is strictly after `watermark`.
///
/// A `None` watermark means the user has never acknowledged the feed, and the
/// count is 0 by definition: a first view is a normal view, not a wall of
/// "new" badges. Ties with the watermark are excluded, so repeated counts
/// against an unchanged watermark and batch are stable. Never mutates the
/// batch or the watermark.
pub fn count_new<T: Timestamped>(items: &[T], watermark: Option<i64>) -> usize {
    let Some(watermark) = watermark else {
        return 0;
    };
    items
        .iter()
        .filter(|item| normalize_timestamp(item.created_at()) > watermark)
        .count()
}

/// Three-operation interface over the persisted watermark. The storage
/// mechanism is injected so call sites never know whether they are backed by
/// origin storage, a file, or nothing at all.
pub struct WatermarkTracker {
    storage: Arc<dyn StorageBackend>,
}

impl WatermarkTracker {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Tracker for storage-less contexts: `read` returns `None`, `touch` and
    /// `reset` do nothing. The documented capability guard, not an error.
    pub fn detached() -> Self {
        Self::new(Arc::new(NoopStorage))
    }

    /// The persisted watermark, or `None` when unset. A payload that fails to
    /// parse as decimal millis reads as unset rather than erroring.
    pub fn read(&self) -> Option<i64> {
        let raw = self.storage.get(WATERMARK_STORAGE_KEY)?;
        match raw.trim().parse::<i64>() {
            Ok(millis) => Some(millis),
            Err(_) => {
                tracing::debug!(raw, "unparseable watermark payload treated as unset");
                None
            }
        }
    }

    /// Advance the watermark to now. Each call persists a value greater than
    /// or equal to every previously persisted one.
    pub fn touch(&self) {
        let now = Utc::now().timestamp_millis();
        self.storage.set(WATERMARK_STORAGE_KEY, &now.to_string());
        tracing::debug!(watermark = now, "feed watermark advanced");
    }

    /// Clear the watermark unconditionally. Must run on every sign-out path,
    /// otherwise the next account on this origin inherits this one's
    /// watermark.
    pub fn reset(&self) {
        self.storage.remove(WATERMARK_STORAGE_KEY);
        tracing::debug!("feed watermark reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    struct FeedItem {
        created_at: Option<TimestampLike>,
    }

    impl Timestamped for FeedItem {
        fn created_at(&self) -> Option<&TimestampLike> {
            self.created_at.as_ref()
        }
    }

    fn item(ts: TimestampLike) -> FeedItem {
        FeedItem {
            created_at: Some(ts),
        }
    }

    #[test]
    fn test_three_shapes_normalize_identically() {
        let from_millis = TimestampLike::EpochMillis(1000);
        let from_record = TimestampLike::SecondsRecord {
            seconds: 1,
            nanoseconds: Some(0),
        };
        let from_datetime = TimestampLike::DateTime(Utc.timestamp_millis_opt(1000).unwrap());

        assert_eq!(from_millis.to_epoch_millis(), 1000);
        assert_eq!(from_record.to_epoch_millis(), 1000);
        assert_eq!(from_datetime.to_epoch_millis(), 1000);
    }

    #[test]
    fn test_missing_created_at_normalizes_to_zero() {
        let orphan = FeedItem { created_at: None };
        assert_eq!(normalize_timestamp(orphan.created_at()), 0);
        assert_eq!(count_new(&[orphan], Some(0)), 0);
    }

    #[test]
    fn test_untagged_wire_shapes_deserialize() {
        let ms: TimestampLike = serde_json::from_str("1000").unwrap();
        assert_eq!(ms.to_epoch_millis(), 1000);

        let record: TimestampLike =
            serde_json::from_str(r#"{"seconds": 1, "nanoseconds": 500}"#).unwrap();
        assert_eq!(record.to_epoch_millis(), 1000);

        let record_no_nanos: TimestampLike = serde_json::from_str(r#"{"seconds": 2}"#).unwrap();
        assert_eq!(record_no_nanos.to_epoch_millis(), 2000);

        let dt: TimestampLike = serde_json::from_str(r#""1970-01-01T00:00:01Z""#).unwrap();
        assert_eq!(dt.to_epoch_millis(), 1000);
    }

    #[test]
    fn test_count_new_is_zero_for_unset_watermark() {
        let items = vec![
            item(TimestampLike::EpochMillis(5_000)),
            item(TimestampLike::EpochMillis(10_000)),
        ];
        assert_eq!(count_new(&items, None), 0);
    }

    #[test]
    fn test_count_new_strictly_greater_excludes_ties() {
        let items = vec![
            item(TimestampLike::EpochMillis(999)),
            item(TimestampLike::EpochMillis(1000)),
            item(TimestampLike::EpochMillis(1001)),
            item(TimestampLike::EpochMillis(2000)),
        ];
        assert_eq!(count_new(&items, Some(1000)), 2);
        // stable under repetition against the same watermark and batch
        assert_eq!(count_new(&items, Some(1000)), 2);
    }

    #[test]
    fn test_count_new_mixed_shapes() {
        let items = vec![
            item(TimestampLike::SecondsRecord {
                seconds: 10,
                nanoseconds: None,
            }),
            item(TimestampLike::DateTime(
                Utc.timestamp_millis_opt(20_000).unwrap(),
            )),
            FeedItem { created_at: None },
        ];
        assert_eq!(count_new(&items, Some(9_999)), 2);
        assert_eq!(count_new(&items, Some(10_000)), 1);
        assert_eq!(count_new(&items, Some(20_000)), 0);
    }

    #[test]
    fn test_read_unset_then_touch_then_reset() {
        let tracker = WatermarkTracker::new(Arc::new(MemoryStorage::new()));
        assert_eq!(tracker.read(), None);

        let before = Utc::now().timestamp_millis();
        tracker.touch();
        let seen = tracker.read().unwrap();
        assert!(seen >= before);

        tracker.reset();
        assert_eq!(tracker.read(), None);
    }

    #[test]
    fn test_touch_never_moves_backward() {
        let tracker = WatermarkTracker::new(Arc::new(MemoryStorage::new()));
        tracker.touch();
        let first = tracker.read().unwrap();
        tracker.touch();
        let second = tracker.read().unwrap();
        assert!(second >= first);
    }

    #[test]
    fn test_corrupt_payload_reads_as_unset() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(WATERMARK_STORAGE_KEY, "not-a-number");
        let tracker = WatermarkTracker::new(storage);
        assert_eq!(tracker.read(), None);
    }

    #[test]
    fn test_detached_tracker_is_inert() {
        let tracker = WatermarkTracker::detached();
        tracker.touch();
        assert_eq!(tracker.read(), None);
        tracker.reset();
        assert_eq!(tracker.read(), None);
    }

    #[test]
    fn test_storage_payload_is_decimal_millis_string() {
        let storage = Arc::new(MemoryStorage::new());
        let tracker = WatermarkTracker::new(Arc::<MemoryStorage>::clone(&storage));
        tracker.touch();
        let raw = storage.get(WATERMARK_STORAGE_KEY).unwrap();
        assert!(raw.chars().all(|c| c.is_ascii_digit()));
    }
}
