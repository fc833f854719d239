//! Recency tie-break policy for rankings
//!
//! Two ranking entries with the same count are ordered by a timestamp. Which
//! direction wins is a policy choice, made per aggregate in `StoreConfig`.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Timestamp;

/// Which of two equally counted entries ranks higher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The older timestamp ranks higher (reached the count first)
    EarliestWins,
    /// The newer timestamp ranks higher (most recently active)
    LatestWins,
}

impl TieBreak {
    /// Wrap a timestamp so that `Ord` follows this policy
    pub fn recency(self, at: Timestamp) -> Recency {
        Recency { at, policy: self }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TieBreak::EarliestWins => "earliest_wins",
            TieBreak::LatestWins => "latest_wins",
        }
    }
}

/// A timestamp ordered by a `TieBreak`: greater means ranks higher.
///
/// Only compare values built with the same policy.
#[derive(Debug, Clone, Copy)]
pub struct Recency {
    at: Timestamp,
    policy: TieBreak,
}

impl Recency {
    pub fn at(&self) -> Timestamp {
        self.at
    }
}

impl Ord for Recency {
    fn cmp(&self, other: &Self) -> Ordering {
        let chronological = self.at.cmp(&other.at);
        match self.policy {
            TieBreak::LatestWins => chronological,
            TieBreak::EarliestWins => chronological.reverse(),
        }
    }
}

impl PartialOrd for Recency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Recency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Recency {}

/// Most-recent-wins update: replace only if `candidate` is strictly newer.
pub(crate) fn keep_latest(stored: &mut Timestamp, candidate: Timestamp) {
    if candidate > *stored {
        *stored = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2019, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_earliest_wins_ranks_older_higher() {
        let older = TieBreak::EarliestWins.recency(t0());
        let newer = TieBreak::EarliestWins.recency(t0() + Duration::hours(1));
        assert!(older > newer);
    }

    #[test]
    fn test_latest_wins_ranks_newer_higher() {
        let older = TieBreak::LatestWins.recency(t0());
        let newer = TieBreak::LatestWins.recency(t0() + Duration::hours(1));
        assert!(newer > older);
        assert_eq!(newer.at(), t0() + Duration::hours(1));
    }

    #[test]
    fn test_keep_latest_ignores_ties_and_older() {
        let mut stored = t0();
        keep_latest(&mut stored, t0() - Duration::minutes(5));
        assert_eq!(stored, t0());
        keep_latest(&mut stored, t0());
        assert_eq!(stored, t0());
        keep_latest(&mut stored, t0() + Duration::minutes(5));
        assert_eq!(stored, t0() + Duration::minutes(5));
    }

    #[test]
    fn test_policy_serde_names() {
        let policy: TieBreak = serde_json::from_str("\"earliest_wins\"").unwrap();
        assert_eq!(policy, TieBreak::EarliestWins);
        assert_eq!(serde_json::to_string(&TieBreak::LatestWins).unwrap(), "\"latest_wins\"");
    }
}
