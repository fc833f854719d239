//! Ranking aggregates
//!
//! - `Leaderboard`: updated on every accepted follow, sorted on read
//! - `TrendTracker`: counters updated on every post, sorted on read
//!
//! Both sort through a temporary `OrderedMap` keyed by the ranking entry and
//! read it highest first. Ties on count go to a configurable `TieBreak`.

mod leaderboard;
mod tie_break;
mod trends;

pub use leaderboard::{FollowerRankingEntry, Leaderboard};
pub use tie_break::{Recency, TieBreak};
pub use trends::{TrendEntry, TrendTracker, DEFAULT_TREND_MARKER, TRENDING_SLOTS};
