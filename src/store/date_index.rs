//! Date ordering over an identity index
//!
//! Under `RebuildPerQuery` nothing is stored: each query copies the matching
//! records into a temporary tree keyed by `(date, id)`. Under `Maintained` a
//! `(date, id)` tree is updated on every accepted insert and walked directly.
//! Both produce the same sequence.

use crate::config::SecondaryIndexPolicy;
use crate::index::{DerivedView, OrderedMap};
use crate::model::Timestamp;

#[derive(Debug, Clone)]
pub(crate) struct DateIndex<Id> {
    policy: SecondaryIndexPolicy,
    maintained: OrderedMap<(Timestamp, Id), ()>,
}

impl<Id: Ord + Copy> DateIndex<Id> {
    pub(crate) fn new(policy: SecondaryIndexPolicy) -> Self {
        Self {
            policy,
            maintained: OrderedMap::new(),
        }
    }

    pub(crate) fn policy(&self) -> SecondaryIndexPolicy {
        self.policy
    }

    /// Called after the identity index accepted `id`
    pub(crate) fn record(&mut self, at: Timestamp, id: Id) {
        if self.policy == SecondaryIndexPolicy::Maintained {
            self.maintained.insert((at, id), ());
        }
    }

    /// Records from `primary` matching `filter`, ascending by date then id.
    pub(crate) fn ordered<'a, R, D, F>(&self, primary: &'a OrderedMap<Id, R>, date_of: D, filter: F) -> Vec<&'a R>
    where
        D: Fn(&R) -> Timestamp,
        F: Fn(&R) -> bool,
    {
        match self.policy {
            SecondaryIndexPolicy::RebuildPerQuery => {
                let matching = primary.ascending().filter(|(_, record)| filter(record));
                DerivedView::build(matching, |(id, record)| (date_of(record), **id))
                    .ascending()
                    .into_iter()
                    .map(|(_, record)| record)
                    .collect()
            }
            SecondaryIndexPolicy::Maintained => self
                .maintained
                .ascending()
                .filter_map(|((_, id), _)| primary.get(id))
                .filter(|record| filter(record))
                .collect(),
        }
    }
}
