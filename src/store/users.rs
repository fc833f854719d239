//! User store
//!
//! Identity index keyed by user id, plus a join-date ordering produced under
//! the configured `SecondaryIndexPolicy`.

use std::sync::Arc;

use super::date_index::DateIndex;
use super::errors::{EntityKind, StoreError, StoreResult};
use super::predicate::UserFilter;
use crate::config::{SecondaryIndexPolicy, StoreConfig};
use crate::index::OrderedMap;
use crate::model::{UserId, UserRecord};
use crate::observability::{log_event, Event, MetricsRegistry};

/// All registered users
#[derive(Debug)]
pub struct UserStore {
    users: OrderedMap<UserId, UserRecord>,
    by_joined: DateIndex<UserId>,
    metrics: Arc<MetricsRegistry>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl UserStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_metrics(config, Arc::new(MetricsRegistry::new()))
    }

    /// Create a store reporting into a shared registry
    pub fn with_metrics(config: &StoreConfig, metrics: Arc<MetricsRegistry>) -> Self {
        Self {
            users: OrderedMap::new(),
            by_joined: DateIndex::new(config.secondary_index_policy),
            metrics,
        }
    }

    /// Insert a user, rejecting an id that is already present.
    pub fn insert(&mut self, user: UserRecord) -> StoreResult<()> {
        if self.users.contains_key(&user.id) {
            self.metrics.increment_duplicates_rejected();
            log_event(
                Event::DuplicateRejected,
                &[("id", user.id.to_string().as_str()), ("kind", "user")],
            );
            return Err(StoreError::DuplicateIdentity {
                kind: EntityKind::User,
                id: user.id,
            });
        }

        let id = user.id;
        self.by_joined.record(user.joined_at, id);
        self.users.insert(id, user);

        self.metrics.increment_users_added();
        log_event(Event::UserAdded, &[("id", id.to_string().as_str())]);
        Ok(())
    }

    /// Returns false iff the id was already present
    pub fn add_user(&mut self, user: UserRecord) -> bool {
        self.insert(user).is_ok()
    }

    pub fn get_user(&self, id: UserId) -> Option<&UserRecord> {
        self.metrics.increment_queries();
        self.users.get(&id)
    }

    /// Every user, ascending by id
    pub fn all(&self) -> Vec<&UserRecord> {
        self.metrics.increment_queries();
        self.users.ascending().map(|(_, user)| user).collect()
    }

    /// Users matching `filter`, ascending by join date (ties by id)
    pub fn users_where(&self, filter: &UserFilter) -> Vec<&UserRecord> {
        self.metrics.increment_queries();
        if self.by_joined.policy() == SecondaryIndexPolicy::RebuildPerQuery {
            self.metrics.increment_derived_views();
            log_event(Event::DerivedViewBuilt, &[("store", "users")]);
        }
        self.by_joined
            .ordered(&self.users, |user| user.joined_at, |user| filter.matches(user))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }
}
