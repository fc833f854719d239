//! Metrics registry for chirpdb
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Atomic, so a registry can be shared between stores behind `Arc`

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the data layer.
///
/// Relaxed ordering throughout; counters are observational only.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Users accepted
    users_added: AtomicU64,
    /// Posts accepted
    posts_added: AtomicU64,
    /// Follow edges accepted
    follows_added: AtomicU64,
    /// Writes rejected as duplicates
    duplicates_rejected: AtomicU64,
    /// Temporary trees built for derived orderings
    derived_views_built: AtomicU64,
    /// Read queries served
    queries_executed: AtomicU64,
    /// Marker-prefixed tokens counted by the trend tracker
    trend_tokens_recorded: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_users_added(&self) {
        self.users_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_posts_added(&self) {
        self.posts_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_follows_added(&self) {
        self.follows_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates_rejected(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_derived_views(&self) {
        self.derived_views_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_trend_tokens(&self, count: u64) {
        self.trend_tokens_recorded.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            users_added: self.users_added.load(Ordering::Relaxed),
            posts_added: self.posts_added.load(Ordering::Relaxed),
            follows_added: self.follows_added.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            derived_views_built: self.derived_views_built.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            trend_tokens_recorded: self.trend_tokens_recorded.load(Ordering::Relaxed),
        }
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub users_added: u64,
    pub posts_added: u64,
    pub follows_added: u64,
    pub duplicates_rejected: u64,
    pub derived_views_built: u64,
    pub queries_executed: u64,
    pub trend_tokens_recorded: u64,
}
