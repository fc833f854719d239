//! Follow-graph store
//!
//! Each edge is held twice: in the follower's "follows" sub-index and in the
//! followee's "followers" sub-index, both `OrderedMap<UserId, Timestamp>`
//! keyed by the counterpart. Sub-indexes are created on first use.
//!
//! A pair moves from absent to present exactly once; there is no unfollow.

use std::cmp::Ordering;
use std::sync::Arc;

use super::errors::{StoreError, StoreResult};
use crate::config::StoreConfig;
use crate::index::{sorted_by, OrderedMap};
use crate::model::{FollowEdge, Timestamp, UserId};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::ranking::Leaderboard;

type EdgeIndex = OrderedMap<UserId, OrderedMap<UserId, Timestamp>>;

/// Directed follow relationships and the follower leaderboard
#[derive(Debug)]
pub struct FollowStore {
    /// follower -> (followee -> since)
    follows: EdgeIndex,
    /// followee -> (follower -> since)
    followers: EdgeIndex,
    leaderboard: Leaderboard,
    edge_count: usize,
    metrics: Arc<MetricsRegistry>,
}

impl Default for FollowStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl FollowStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_metrics(config, Arc::new(MetricsRegistry::new()))
    }

    /// Create a store reporting into a shared registry
    pub fn with_metrics(config: &StoreConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            follows: OrderedMap::new(),
            followers: OrderedMap::new(),
            leaderboard: Leaderboard::new(config.leaderboard_tie_break),
            edge_count: 0,
            metrics,
        }
    }

    /// Add an edge to both sub-indexes and the leaderboard.
    ///
    /// An existing edge is rejected before anything is touched.
    pub fn insert_edge(&mut self, edge: FollowEdge) -> StoreResult<()> {
        let FollowEdge {
            follower_id,
            followee_id,
            since,
        } = edge;

        if self.edge(follower_id, followee_id).is_some() {
            self.metrics.increment_duplicates_rejected();
            log_event(
                Event::DuplicateRejected,
                &[
                    ("followee", followee_id.to_string().as_str()),
                    ("follower", follower_id.to_string().as_str()),
                    ("kind", "follow"),
                ],
            );
            return Err(StoreError::DuplicateRelationship {
                follower: follower_id,
                followee: followee_id,
            });
        }

        link(&mut self.follows, follower_id, followee_id, since);
        link(&mut self.followers, followee_id, follower_id, since);
        let followers_now = self.leaderboard.record_follow(followee_id, since).followers();
        self.edge_count += 1;

        self.metrics.increment_follows_added();
        log_event(
            Event::FollowAdded,
            &[
                ("followee", followee_id.to_string().as_str()),
                ("followee_count", followers_now.to_string().as_str()),
                ("follower", follower_id.to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// `follower` starts following `followee`. Returns false iff the edge
    /// already existed.
    pub fn follow(&mut self, follower: UserId, followee: UserId, when: Timestamp) -> bool {
        self.insert_edge(FollowEdge::new(follower, followee, when)).is_ok()
    }

    /// The stored edge, if `follower` follows `followee`
    pub fn edge(&self, follower: UserId, followee: UserId) -> Option<FollowEdge> {
        self.follows
            .get(&follower)?
            .get(&followee)
            .map(|&since| FollowEdge::new(follower, followee, since))
    }

    /// O(log n) check through the followee's sub-index
    pub fn is_follower(&self, follower: UserId, followee: UserId) -> bool {
        self.metrics.increment_queries();
        self.followers
            .get(&followee)
            .is_some_and(|sub| sub.contains_key(&follower))
    }

    /// Users following `id`, oldest edge first (ties by id)
    pub fn followers_of(&self, id: UserId) -> Vec<UserId> {
        self.by_date(self.followers.get(&id))
    }

    /// Users `id` follows, oldest edge first (ties by id)
    pub fn follows_of(&self, id: UserId) -> Vec<UserId> {
        self.by_date(self.follows.get(&id))
    }

    pub fn follower_count_of(&self, id: UserId) -> usize {
        self.metrics.increment_queries();
        self.followers.get(&id).map_or(0, |sub| sub.len())
    }

    pub fn follows_count_of(&self, id: UserId) -> usize {
        self.metrics.increment_queries();
        self.follows.get(&id).map_or(0, |sub| sub.len())
    }

    /// Users following both `a` and `b`
    pub fn mutual_followers(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.intersect(self.followers.get(&a), self.followers.get(&b))
    }

    /// Users followed by both `a` and `b`
    pub fn mutual_follows(&self, a: UserId, b: UserId) -> Vec<UserId> {
        self.intersect(self.follows.get(&a), self.follows.get(&b))
    }

    /// Followed users, most followers first
    pub fn top_ranked_by_popularity(&self) -> Vec<UserId> {
        self.metrics.increment_queries();
        self.metrics.increment_derived_views();
        log_event(
            Event::LeaderboardRanked,
            &[("subjects", self.leaderboard.len().to_string().as_str())],
        );
        self.leaderboard.top_ranked()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    /// Number of distinct edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    fn by_date(&self, sub: Option<&OrderedMap<UserId, Timestamp>>) -> Vec<UserId> {
        self.metrics.increment_queries();
        let Some(sub) = sub else {
            return Vec::new();
        };

        self.metrics.increment_derived_views();
        log_event(Event::DerivedViewBuilt, &[("store", "follows")]);
        sorted_by(sub.ascending(), |(id, since)| (**since, **id))
            .into_iter()
            .map(|(id, _)| *id)
            .collect()
    }

    /// Walk both id-ordered sub-indexes together; each match is keyed by the
    /// earlier of its two edge timestamps.
    fn intersect(
        &self,
        left: Option<&OrderedMap<UserId, Timestamp>>,
        right: Option<&OrderedMap<UserId, Timestamp>>,
    ) -> Vec<UserId> {
        self.metrics.increment_queries();
        let (Some(left), Some(right)) = (left, right) else {
            return Vec::new();
        };

        let mut lhs = left.ascending().peekable();
        let mut rhs = right.ascending().peekable();
        let mut shared = Vec::new();

        while let (Some(&(l_id, l_since)), Some(&(r_id, r_since))) = (lhs.peek(), rhs.peek()) {
            match l_id.cmp(r_id) {
                Ordering::Less => {
                    lhs.next();
                }
                Ordering::Greater => {
                    rhs.next();
                }
                Ordering::Equal => {
                    shared.push((*l_id, (*l_since).min(*r_since)));
                    lhs.next();
                    rhs.next();
                }
            }
        }

        self.metrics.increment_derived_views();
        log_event(Event::DerivedViewBuilt, &[("store", "follows")]);
        sorted_by(shared, |(id, since)| (*since, *id))
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }
}

/// Insert `counterpart -> since` into `owner`'s sub-index, creating it first
/// if this is the owner's first edge on this side.
fn link(index: &mut EdgeIndex, owner: UserId, counterpart: UserId, since: Timestamp) {
    match index.get_mut(&owner) {
        Some(sub) => sub.insert(counterpart, since),
        None => {
            let mut sub = OrderedMap::new();
            sub.insert(counterpart, since);
            index.insert(owner, sub);
        }
    }
}
