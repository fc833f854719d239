//! Shared data layer
//!
//! `DataLayer` puts each store behind its own `RwLock`: one writer per store
//! at a time, any number of readers. Reads hand back owned copies so no
//! guard escapes a call.
//!
//! A poisoned lock is reported as `StoreError::Poisoned`, never unwrapped.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::StoreConfig;
use crate::model::{FollowEdge, PostId, PostRecord, Timestamp, UserId, UserRecord};
use crate::observability::{log_event, Event, Logger, MetricsRegistry, MetricsSnapshot};
use crate::ranking::TRENDING_SLOTS;
use crate::store::{
    FollowStore, PostFilter, PostStore, StoreError, StoreResult, UserFilter, UserStore,
};

/// Users, posts and follows behind one lock each
#[derive(Debug)]
pub struct DataLayer {
    users: RwLock<UserStore>,
    posts: RwLock<PostStore>,
    follows: RwLock<FollowStore>,
    metrics: Arc<MetricsRegistry>,
}

impl Default for DataLayer {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl DataLayer {
    /// Build empty stores from `config` and apply its log level
    pub fn new(config: &StoreConfig) -> Self {
        Logger::set_min_severity(config.log_level);

        let metrics = Arc::new(MetricsRegistry::new());
        let layer = Self {
            users: RwLock::new(UserStore::with_metrics(config, Arc::clone(&metrics))),
            posts: RwLock::new(PostStore::with_metrics(config, Arc::clone(&metrics))),
            follows: RwLock::new(FollowStore::with_metrics(config, Arc::clone(&metrics))),
            metrics,
        };

        log_event(
            Event::DataLayerReady,
            &[
                ("log_level", config.log_level.as_str()),
                ("trend_marker", config.trend_marker.to_string().as_str()),
            ],
        );
        layer
    }

    // ========== Users ==========

    pub fn insert_user(&self, user: UserRecord) -> StoreResult<()> {
        write(&self.users, "users")?.insert(user)
    }

    /// Returns false iff the id is taken
    pub fn add_user(&self, user: UserRecord) -> StoreResult<bool> {
        Ok(write(&self.users, "users")?.add_user(user))
    }

    pub fn get_user(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        Ok(read(&self.users, "users")?.get_user(id).cloned())
    }

    pub fn all_users(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(owned(read(&self.users, "users")?.all()))
    }

    pub fn users_where(&self, filter: &UserFilter) -> StoreResult<Vec<UserRecord>> {
        Ok(owned(read(&self.users, "users")?.users_where(filter)))
    }

    pub fn user_count(&self) -> StoreResult<usize> {
        Ok(read(&self.users, "users")?.len())
    }

    // ========== Posts ==========

    pub fn insert_post(&self, post: PostRecord) -> StoreResult<()> {
        write(&self.posts, "posts")?.insert(post)
    }

    /// Returns false iff the id is taken
    pub fn add_post(&self, post: PostRecord) -> StoreResult<bool> {
        Ok(write(&self.posts, "posts")?.add_post(post))
    }

    pub fn get_post(&self, id: PostId) -> StoreResult<Option<PostRecord>> {
        Ok(read(&self.posts, "posts")?.get_post(id).cloned())
    }

    pub fn all_posts(&self) -> StoreResult<Vec<PostRecord>> {
        Ok(owned(read(&self.posts, "posts")?.all()))
    }

    pub fn posts_where(&self, filter: &PostFilter) -> StoreResult<Vec<PostRecord>> {
        Ok(owned(read(&self.posts, "posts")?.posts_where(filter)))
    }

    pub fn posts_by_author(&self, author: UserId) -> StoreResult<Vec<PostRecord>> {
        Ok(owned(read(&self.posts, "posts")?.posts_by_author(author)))
    }

    pub fn post_count(&self) -> StoreResult<usize> {
        Ok(read(&self.posts, "posts")?.len())
    }

    pub fn top_trending(&self) -> StoreResult<[Option<String>; TRENDING_SLOTS]> {
        Ok(read(&self.posts, "posts")?.top_trending())
    }

    // ========== Follows ==========

    pub fn insert_edge(&self, edge: FollowEdge) -> StoreResult<()> {
        write(&self.follows, "follows")?.insert_edge(edge)
    }

    /// Returns false iff the edge already exists
    pub fn follow(&self, follower: UserId, followee: UserId, when: Timestamp) -> StoreResult<bool> {
        Ok(write(&self.follows, "follows")?.follow(follower, followee, when))
    }

    pub fn is_follower(&self, follower: UserId, followee: UserId) -> StoreResult<bool> {
        Ok(read(&self.follows, "follows")?.is_follower(follower, followee))
    }

    pub fn followers_of(&self, id: UserId) -> StoreResult<Vec<UserId>> {
        Ok(read(&self.follows, "follows")?.followers_of(id))
    }

    pub fn follows_of(&self, id: UserId) -> StoreResult<Vec<UserId>> {
        Ok(read(&self.follows, "follows")?.follows_of(id))
    }

    pub fn follower_count_of(&self, id: UserId) -> StoreResult<usize> {
        Ok(read(&self.follows, "follows")?.follower_count_of(id))
    }

    pub fn follows_count_of(&self, id: UserId) -> StoreResult<usize> {
        Ok(read(&self.follows, "follows")?.follows_count_of(id))
    }

    pub fn mutual_followers(&self, a: UserId, b: UserId) -> StoreResult<Vec<UserId>> {
        Ok(read(&self.follows, "follows")?.mutual_followers(a, b))
    }

    pub fn mutual_follows(&self, a: UserId, b: UserId) -> StoreResult<Vec<UserId>> {
        Ok(read(&self.follows, "follows")?.mutual_follows(a, b))
    }

    pub fn top_ranked_by_popularity(&self) -> StoreResult<Vec<UserId>> {
        Ok(read(&self.follows, "follows")?.top_ranked_by_popularity())
    }

    // ========== Metrics ==========

    /// Counters shared by all three stores
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

fn read<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> StoreResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| poisoned(store))
}

fn write<'a, T>(lock: &'a RwLock<T>, store: &'static str) -> StoreResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| poisoned(store))
}

fn poisoned(store: &'static str) -> StoreError {
    log_event(Event::LockPoisoned, &[("store", store)]);
    StoreError::Poisoned(store)
}

fn owned<T: Clone>(records: Vec<&T>) -> Vec<T> {
    records.into_iter().cloned().collect()
}
