//! Incremental follower leaderboard
//!
//! Each accepted follow bumps the followee's entry in place, so ranking never
//! re-scans edges. `top_ranked` sorts the entries through a temporary tree.

use std::cmp::Reverse;

use serde::Serialize;

use super::tie_break::{keep_latest, Recency, TieBreak};
use crate::index::{DerivedView, OrderedMap};
use crate::model::{Timestamp, UserId};

/// Ranking record for one followed user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowerRankingEntry {
    subject: UserId,
    followers: usize,
    last_gained: Timestamp,
}

impl FollowerRankingEntry {
    fn new(subject: UserId, first_seen: Timestamp) -> Self {
        Self {
            subject,
            followers: 0,
            last_gained: first_seen,
        }
    }

    fn add_follower(&mut self, when: Timestamp) {
        self.followers += 1;
        keep_latest(&mut self.last_gained, when);
    }

    pub fn subject(&self) -> UserId {
        self.subject
    }

    pub fn followers(&self) -> usize {
        self.followers
    }

    /// Newest follow event seen for this subject
    pub fn last_gained(&self) -> Timestamp {
        self.last_gained
    }
}

/// Total order over ranking entries; greater ranks higher.
///
/// Count first, then recency under the configured policy, then the lower
/// subject id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    followers: usize,
    recency: Recency,
    subject: Reverse<UserId>,
}

/// Follower-count leaderboard, maintained on every accepted follow
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<FollowerRankingEntry>,
    /// subject -> position in `entries`
    positions: OrderedMap<UserId, usize>,
    tie_break: TieBreak,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(TieBreak::EarliestWins)
    }
}

impl Leaderboard {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            entries: Vec::new(),
            positions: OrderedMap::new(),
            tie_break,
        }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Count one new follower for `subject`, creating its entry on first use.
    pub fn record_follow(&mut self, subject: UserId, when: Timestamp) -> &FollowerRankingEntry {
        let position = match self.positions.get(&subject) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.entries.push(FollowerRankingEntry::new(subject, when));
                self.positions.insert(subject, position);
                position
            }
        };

        let entry = &mut self.entries[position];
        entry.add_follower(when);
        entry
    }

    /// Ranking entry for `subject`, if it has ever gained a follower
    pub fn entry(&self, subject: UserId) -> Option<&FollowerRankingEntry> {
        self.positions.get(&subject).map(|&position| &self.entries[position])
    }

    /// Number of ranked subjects
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subject ids, highest rank first.
    pub fn top_ranked(&self) -> Vec<UserId> {
        let tie_break = self.tie_break;
        DerivedView::build(self.entries.iter(), |entry| RankKey {
            followers: entry.followers,
            recency: tie_break.recency(entry.last_gained),
            subject: Reverse(entry.subject),
        })
        .descending()
        .into_iter()
        .map(FollowerRankingEntry::subject)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(minutes: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2018, 6, 1, 9, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn test_entry_created_on_first_follow() {
        let mut board = Leaderboard::default();
        assert!(board.entry(1).is_none());

        let entry = board.record_follow(1, at(5));
        assert_eq!(entry.followers(), 1);
        assert_eq!(entry.last_gained(), at(5));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_last_gained_keeps_newest() {
        let mut board = Leaderboard::default();
        board.record_follow(1, at(10));
        board.record_follow(1, at(3));
        board.record_follow(1, at(12));
        board.record_follow(1, at(11));

        let entry = board.entry(1).unwrap();
        assert_eq!(entry.followers(), 4);
        assert_eq!(entry.last_gained(), at(12));
    }

    #[test]
    fn test_count_dominates_timestamps() {
        let mut board = Leaderboard::default();
        // C gains one follower earlier than anything B gets
        board.record_follow(30, at(0));
        board.record_follow(20, at(1));
        board.record_follow(20, at(2));
        board.record_follow(20, at(3));

        assert_eq!(board.top_ranked(), vec![20, 30]);
    }

    #[test]
    fn test_earliest_wins_tie_break() {
        let mut board = Leaderboard::new(TieBreak::EarliestWins);
        board.record_follow(1, at(9));
        board.record_follow(2, at(4));

        // Equal counts: the subject that reached the count first ranks higher
        assert_eq!(board.top_ranked(), vec![2, 1]);
    }

    #[test]
    fn test_latest_wins_tie_break() {
        let mut board = Leaderboard::new(TieBreak::LatestWins);
        board.record_follow(1, at(9));
        board.record_follow(2, at(4));

        assert_eq!(board.top_ranked(), vec![1, 2]);
    }

    #[test]
    fn test_full_tie_falls_back_to_lower_id() {
        let mut board = Leaderboard::default();
        board.record_follow(8, at(1));
        board.record_follow(3, at(1));
        board.record_follow(5, at(1));

        assert_eq!(board.top_ranked(), vec![3, 5, 8]);
    }
}
