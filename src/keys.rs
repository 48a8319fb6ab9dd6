//! # Cache Key Taxonomy Module
//!
//! ## Purpose
//! Deterministic, parameterized key constructors for every cacheable resource
//! the app fetches. The external query engine treats structurally-equal keys
//! as the same cache slot, so every constructor here is a pure function of
//! its parameters: no clock, no randomness, no hidden state.
//!
//! ## Input/Output Specification
//! - **Input**: Resource identifiers and optional filter/pagination objects
//! - **Output**: [`CacheKey`] values, an ordered sequence of JSON parts
//! - **Determinism**: Equal parameters always yield structurally-equal keys;
//!   any differing parameter yields a distinct key
//!
//! Filter and pagination objects are serialized verbatim into the key tail,
//! so each distinct filter combination partitions the cache into its own
//! slot. Callers that want to share a slot across calls must pass filters
//! that are equal by value.
//!
//! Which [`StalenessWindow`](crate::staleness::StalenessWindow) a key is
//! registered with is decided at the query call site, not here.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Structured cache key: an ordered sequence of primitive-serializable parts.
/// Equality is structural, which is exactly the identity the query engine
/// keys its slots on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheKey(Vec<Value>);

impl CacheKey {
    fn root(family: &'static str) -> Self {
        Self(vec![Value::from(family)])
    }

    fn part(mut self, part: impl Into<Value>) -> Self {
        self.0.push(part.into());
        self
    }

    fn opt_part(self, part: Option<impl Into<Value>>) -> Self {
        match part {
            Some(p) => self.part(p),
            None => self,
        }
    }

    /// Append a filter object verbatim to the key tail
    fn filter(mut self, filter: Option<&Value>) -> Self {
        if let Some(f) = filter {
            self.0.push(f.clone());
        }
        self
    }

    /// The key's parts, in order
    pub fn parts(&self) -> &[Value] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            match part {
                Value::String(s) => write!(f, "{}", s)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

/// Convert a typed filter struct into the [`Value`] form the constructors
/// accept. serde_json's map is BTree-backed, so field order in the resulting
/// value is deterministic regardless of struct declaration order. A filter
/// that cannot serialize (e.g. a map with non-string keys) normalizes to
/// JSON null rather than failing.
pub fn filter_value<F: Serialize>(filter: &F) -> Value {
    serde_json::to_value(filter).unwrap_or(Value::Null)
}

// Users

/// Aggregate stats (total focus time, session count) for one user
pub fn user_stats(user_id: &str) -> CacheKey {
    CacheKey::root("users").part("stats").part(user_id)
}

/// Public profile document for one user
pub fn user_profile(user_id: &str) -> CacheKey {
    CacheKey::root("users").part("profile").part(user_id)
}

/// A user's session list, optionally bounded to the most recent `limit`
pub fn user_sessions(user_id: &str, limit: Option<u32>) -> CacheKey {
    CacheKey::root("users")
        .part("sessions")
        .part(user_id)
        .opt_part(limit)
}

pub fn user_followers(user_id: &str) -> CacheKey {
    CacheKey::root("users").part("followers").part(user_id)
}

pub fn user_following(user_id: &str) -> CacheKey {
    CacheKey::root("users").part("following").part(user_id)
}

// Sessions

/// A single session document
pub fn session_detail(session_id: &str) -> CacheKey {
    CacheKey::root("sessions").part("detail").part(session_id)
}

/// All sessions authored by one user
pub fn sessions_by_user(user_id: &str) -> CacheKey {
    CacheKey::root("sessions").part("by-user").part(user_id)
}

/// One page of the session feed. The cursor and filter are part of the key,
/// so each page and each filter combination caches independently.
pub fn session_feed(page_size: u32, cursor: Option<&str>, filter: Option<&Value>) -> CacheKey {
    CacheKey::root("sessions")
        .part("feed")
        .part(page_size)
        .opt_part(cursor)
        .filter(filter)
}

/// The session a user is currently running, if any
pub fn active_session(user_id: &str) -> CacheKey {
    CacheKey::root("sessions").part("active").part(user_id)
}

// Projects

pub fn projects() -> CacheKey {
    CacheKey::root("projects").part("list")
}

pub fn project_detail(project_id: &str) -> CacheKey {
    CacheKey::root("projects").part("detail").part(project_id)
}

// Activities

/// Per-activity time statistics (e.g. "reading", "coding")
pub fn activity_stats(activity: &str) -> CacheKey {
    CacheKey::root("activities").part("stats").part(activity)
}

// Tasks

pub fn tasks() -> CacheKey {
    CacheKey::root("tasks").part("list")
}

pub fn task_detail(task_id: &str) -> CacheKey {
    CacheKey::root("tasks").part("detail").part(task_id)
}

// Groups

/// Group collection, optionally narrowed by a filter object
pub fn groups(filter: Option<&Value>) -> CacheKey {
    CacheKey::root("groups").part("list").filter(filter)
}

pub fn group_detail(group_id: &str) -> CacheKey {
    CacheKey::root("groups").part("detail").part(group_id)
}

pub fn group_members(group_id: &str) -> CacheKey {
    CacheKey::root("groups").part("members").part(group_id)
}

/// The groups one user belongs to
pub fn user_groups(user_id: &str) -> CacheKey {
    CacheKey::root("groups").part("by-user").part(user_id)
}

// Challenges

/// Challenge collection, optionally narrowed by a filter object
pub fn challenges(filter: Option<&Value>) -> CacheKey {
    CacheKey::root("challenges").part("list").filter(filter)
}

pub fn challenge_detail(challenge_id: &str) -> CacheKey {
    CacheKey::root("challenges").part("detail").part(challenge_id)
}

/// Challenges one user has joined
pub fn user_challenges(user_id: &str) -> CacheKey {
    CacheKey::root("challenges").part("by-user").part(user_id)
}

/// One user's progress within one challenge
pub fn challenge_progress(challenge_id: &str, user_id: &str) -> CacheKey {
    CacheKey::root("challenges")
        .part("progress")
        .part(challenge_id)
        .part(user_id)
}

// Suggestions

pub fn suggested_users() -> CacheKey {
    CacheKey::root("suggestions").part("users")
}

pub fn suggested_groups() -> CacheKey {
    CacheKey::root("suggestions").part("groups")
}

// Streaks

pub fn user_streak(user_id: &str) -> CacheKey {
    CacheKey::root("streaks").part("user").part(user_id)
}

// Analytics

/// Time-series chart data for one user over a named period ("week", "month")
pub fn analytics_chart(user_id: &str, period: &str) -> CacheKey {
    CacheKey::root("analytics")
        .part("chart")
        .part(user_id)
        .part(period)
}

/// Category breakdown for one user over a named period
pub fn analytics_categories(user_id: &str, period: &str) -> CacheKey {
    CacheKey::root("analytics")
        .part("categories")
        .part(user_id)
        .part(period)
}

// Comments

/// Comment list on one session
pub fn session_comments(session_id: &str) -> CacheKey {
    CacheKey::root("comments").part("session").part(session_id)
}

// Notifications

pub fn notifications(user_id: &str) -> CacheKey {
    CacheKey::root("notifications").part("user").part(user_id)
}
