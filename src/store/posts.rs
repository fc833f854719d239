//! Post store
//!
//! Identity index keyed by post id, a posted-at ordering under the configured
//! `SecondaryIndexPolicy`, and the trend tracker fed on every accepted post.

use std::sync::Arc;

use super::date_index::DateIndex;
use super::errors::{EntityKind, StoreError, StoreResult};
use super::predicate::PostFilter;
use crate::config::{SecondaryIndexPolicy, StoreConfig};
use crate::index::OrderedMap;
use crate::model::{PostId, PostRecord, UserId};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::ranking::{TrendTracker, TRENDING_SLOTS};

/// All posts plus the trend aggregate derived from them
#[derive(Debug)]
pub struct PostStore {
    posts: OrderedMap<PostId, PostRecord>,
    by_posted: DateIndex<PostId>,
    trends: TrendTracker,
    metrics: Arc<MetricsRegistry>,
}

impl Default for PostStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl PostStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_metrics(config, Arc::new(MetricsRegistry::new()))
    }

    /// Create a store reporting into a shared registry
    pub fn with_metrics(config: &StoreConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            posts: OrderedMap::new(),
            by_posted: DateIndex::new(config.secondary_index_policy),
            trends: TrendTracker::new(config.trend_marker, config.trend_tie_break),
            metrics,
        }
    }

    /// Insert a post and count its trend tokens.
    ///
    /// A post whose id is already present is rejected before any index or
    /// trend counter is touched.
    pub fn insert(&mut self, post: PostRecord) -> StoreResult<()> {
        if self.posts.contains_key(&post.id) {
            self.metrics.increment_duplicates_rejected();
            log_event(
                Event::DuplicateRejected,
                &[("id", post.id.to_string().as_str()), ("kind", "post")],
            );
            return Err(StoreError::DuplicateIdentity {
                kind: EntityKind::Post,
                id: post.id,
            });
        }

        let id = post.id;
        let counted = self.trends.record_post(&post.text, post.posted_at);
        self.by_posted.record(post.posted_at, id);
        self.posts.insert(id, post);

        self.metrics.increment_posts_added();
        self.metrics.add_trend_tokens(counted as u64);
        log_event(
            Event::PostAdded,
            &[
                ("id", id.to_string().as_str()),
                ("trend_tokens", counted.to_string().as_str()),
            ],
        );
        Ok(())
    }

    /// Returns false iff the id was already present
    pub fn add_post(&mut self, post: PostRecord) -> bool {
        self.insert(post).is_ok()
    }

    pub fn get_post(&self, id: PostId) -> Option<&PostRecord> {
        self.metrics.increment_queries();
        self.posts.get(&id)
    }

    /// Every post, ascending by id
    pub fn all(&self) -> Vec<&PostRecord> {
        self.metrics.increment_queries();
        self.posts.ascending().map(|(_, post)| post).collect()
    }

    /// Posts matching `filter`, ascending by posted-at (ties by id)
    pub fn posts_where(&self, filter: &PostFilter) -> Vec<&PostRecord> {
        self.metrics.increment_queries();
        if self.by_posted.policy() == SecondaryIndexPolicy::RebuildPerQuery {
            self.metrics.increment_derived_views();
            log_event(Event::DerivedViewBuilt, &[("store", "posts")]);
        }
        self.by_posted
            .ordered(&self.posts, |post| post.posted_at, |post| filter.matches(post))
    }

    /// Posts by one author, ascending by posted-at
    pub fn posts_by_author(&self, author: UserId) -> Vec<&PostRecord> {
        self.posts_where(&PostFilter::AuthorIs(author))
    }

    /// The ten highest ranked trend tokens; unused slots are `None`
    pub fn top_trending(&self) -> [Option<String>; TRENDING_SLOTS] {
        self.metrics.increment_queries();
        self.metrics.increment_derived_views();
        log_event(
            Event::TrendsRanked,
            &[("distinct_tokens", self.trends.len().to_string().as_str())],
        );
        self.trends.top_trending()
    }

    pub fn trends(&self) -> &TrendTracker {
        &self.trends
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }
}
