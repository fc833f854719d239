//! Observable events for chirpdb
//!
//! Events are explicit and typed. Each carries the severity it is logged at.

use std::fmt;

use super::logger::Severity;

/// Observable events in chirpdb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Store configuration loaded from disk
    ConfigLoaded,
    /// Data layer constructed
    DataLayerReady,

    // Writes
    /// User accepted into the identity index
    UserAdded,
    /// Post accepted into the identity index
    PostAdded,
    /// Follow edge accepted into both sub-indexes
    FollowAdded,
    /// Write rejected because the identity or edge already exists
    DuplicateRejected,

    // Reads
    /// Temporary tree built for a non-identity ordering
    DerivedViewBuilt,
    /// Leaderboard ranked
    LeaderboardRanked,
    /// Trends ranked
    TrendsRanked,

    // Failures
    /// A store lock was poisoned by a panicking writer
    LockPoisoned,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataLayerReady => "DATA_LAYER_READY",

            Event::UserAdded => "USER_ADDED",
            Event::PostAdded => "POST_ADDED",
            Event::FollowAdded => "FOLLOW_ADDED",
            Event::DuplicateRejected => "DUPLICATE_REJECTED",

            Event::DerivedViewBuilt => "DERIVED_VIEW_BUILT",
            Event::LeaderboardRanked => "LEADERBOARD_RANKED",
            Event::TrendsRanked => "TRENDS_RANKED",

            Event::LockPoisoned => "LOCK_POISONED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::DataLayerReady => Severity::Info,
            Event::DuplicateRejected => Severity::Warn,
            Event::LockPoisoned => Severity::Error,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
