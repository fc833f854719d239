//! Lazy trend aggregate
//!
//! Posts feed marker-prefixed tokens into a flat list of counters. Ranking
//! happens only when asked for, through a temporary tree.

use serde::Serialize;

use super::tie_break::{keep_latest, Recency, TieBreak};
use crate::index::{padded, DerivedView, OrderedMap};
use crate::model::Timestamp;

/// Number of slots `top_trending` always returns
pub const TRENDING_SLOTS: usize = 10;

/// Character that marks a token as a trend
pub const DEFAULT_TREND_MARKER: char = '#';

/// Occurrence record for one trend token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendEntry {
    token: String,
    occurrences: usize,
    last_seen: Timestamp,
}

impl TrendEntry {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn occurrences(&self) -> usize {
        self.occurrences
    }

    /// Newest post timestamp the token appeared in
    pub fn last_seen(&self) -> Timestamp {
        self.last_seen
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct TrendKey<'a> {
    occurrences: usize,
    recency: Recency,
    token: &'a str,
}

/// Per-token counters fed from post text
#[derive(Debug, Clone)]
pub struct TrendTracker {
    entries: Vec<TrendEntry>,
    /// token -> position in `entries`
    positions: OrderedMap<String, usize>,
    marker: char,
    tie_break: TieBreak,
}

impl Default for TrendTracker {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_MARKER, TieBreak::LatestWins)
    }
}

impl TrendTracker {
    pub fn new(marker: char, tie_break: TieBreak) -> Self {
        Self {
            entries: Vec::new(),
            positions: OrderedMap::new(),
            marker,
            tie_break,
        }
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    /// Any token starting with the marker is a trend, the bare marker included
    pub fn is_trend_token(&self, token: &str) -> bool {
        token.starts_with(self.marker)
    }

    /// Count every trend token in `text`. Returns how many were counted.
    ///
    /// A token repeated within one post counts once per occurrence.
    pub fn record_post(&mut self, text: &str, when: Timestamp) -> usize {
        let mut counted = 0;
        for token in text.split_whitespace() {
            if self.is_trend_token(token) {
                self.record_token(token, when);
                counted += 1;
            }
        }
        counted
    }

    fn record_token(&mut self, token: &str, when: Timestamp) {
        match self.positions.get(token) {
            Some(&position) => {
                let entry = &mut self.entries[position];
                entry.occurrences += 1;
                keep_latest(&mut entry.last_seen, when);
            }
            None => {
                self.positions.insert(token.to_owned(), self.entries.len());
                self.entries.push(TrendEntry {
                    token: token.to_owned(),
                    occurrences: 1,
                    last_seen: when,
                });
            }
        }
    }

    pub fn entry(&self, token: &str) -> Option<&TrendEntry> {
        self.positions
            .get(token)
            .map(|&position| &self.entries[position])
    }

    /// Number of distinct tokens seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, highest rank first
    pub fn ranked(&self) -> Vec<&TrendEntry> {
        self.view().descending()
    }

    /// The ten highest ranked tokens, highest first; unused slots are `None`.
    pub fn top_trending(&self) -> [Option<String>; TRENDING_SLOTS] {
        let view = self.view();
        padded(
            view.top_n(TRENDING_SLOTS)
                .into_iter()
                .map(|entry| entry.token.clone()),
        )
    }

    fn view(&self) -> DerivedView<TrendKey<'_>, &TrendEntry> {
        let tie_break = self.tie_break;
        DerivedView::build(self.entries.iter(), |entry| TrendKey {
            occurrences: entry.occurrences,
            recency: tie_break.recency(entry.last_seen),
            token: entry.token.as_str(),
        })
    }
}
