//! # Staleness Window Module
//!
//! ## Purpose
//! Named duration classes attached to queries when they are registered with
//! the external query engine. The engine compares a cached entry's age against
//! the window to decide between reuse and refetch; this module only defines
//! the fixed table of windows and their millisecond values.
//!
//! ## Input/Output Specification
//! - **Input**: A window name chosen at the query call site
//! - **Output**: Millisecond duration, or unbounded for `Infinite`
//! - **Contract**: Finite windows strictly increase in declaration order
//!
//! Which window is paired with which cache key is a call-site policy decision;
//! nothing here enforces the binding.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long cached data is considered fresh before the query engine may
/// refetch it in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessWindow {
    /// 30 seconds - presence, active-session, and other near-live data
    RealTime,
    /// 60 seconds - feed pages, notification counts
    Short,
    /// 5 minutes - the default for most resource detail queries
    Medium,
    /// 15 minutes - slow-moving collections (projects, groups)
    Long,
    /// 60 minutes - aggregates and analytics breakdowns
    VeryLong,
    /// Never stale on a timer; invalidated only explicitly
    Infinite,
}

impl StalenessWindow {
    /// Window length in milliseconds. `None` means unbounded: the engine must
    /// never schedule a time-based refetch for it.
    pub fn as_millis(&self) -> Option<u64> {
        match self {
            StalenessWindow::RealTime => Some(30_000),
            StalenessWindow::Short => Some(60_000),
            StalenessWindow::Medium => Some(300_000),
            StalenessWindow::Long => Some(900_000),
            StalenessWindow::VeryLong => Some(3_600_000),
            StalenessWindow::Infinite => None,
        }
    }

    /// Window length as a [`Duration`], `None` when unbounded
    pub fn as_duration(&self) -> Option<Duration> {
        self.as_millis().map(Duration::from_millis)
    }

    /// All windows in increasing order of duration
    pub fn all() -> [StalenessWindow; 6] {
        [
            StalenessWindow::RealTime,
            StalenessWindow::Short,
            StalenessWindow::Medium,
            StalenessWindow::Long,
            StalenessWindow::VeryLong,
            StalenessWindow::Infinite,
        ]
    }
}
