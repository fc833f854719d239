//! Derived views: rebuild-and-sort orderings
//!
//! A derived view copies entries into a fresh `OrderedMap` keyed by some
//! attribute, reads it back in order, and drops the tree. Nothing has to be
//! kept in sync with the source map between queries.

use super::avl::OrderedMap;
use super::traversal::top_n;

/// A temporary tree ordering `T` by a derived key `K`.
#[derive(Debug)]
pub struct DerivedView<K, T> {
    map: OrderedMap<K, T>,
}

impl<K: Ord, T> DerivedView<K, T> {
    /// Build a view over `entries`, keyed by `key_fn`.
    ///
    /// O(n log n). Entries with equal derived keys come back newest-inserted
    /// first; callers wanting a stable tie order fold an identity into `K`.
    pub fn build<I, F>(entries: I, key_fn: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> K,
    {
        let mut map = OrderedMap::new();
        for entry in entries {
            let key = key_fn(&entry);
            map.insert(key, entry);
        }
        Self { map }
    }

    /// Number of entries in the view
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the view is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The `n` highest-keyed entries, highest first, without consuming the view
    pub fn top_n(&self, n: usize) -> Vec<&T> {
        top_n(&self.map, n)
    }

    /// Consume the view, smallest key first
    pub fn ascending(self) -> Vec<T> {
        self.map.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Consume the view, largest key first
    pub fn descending(self) -> Vec<T> {
        self.map.into_iter().rev().map(|(_, entry)| entry).collect()
    }
}

/// Shorthand for `DerivedView::build(entries, key_fn).ascending()`.
pub fn sorted_by<I, T, K, F>(entries: I, key_fn: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: Fn(&T) -> K,
{
    DerivedView::build(entries, key_fn).ascending()
}
