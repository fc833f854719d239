//! Ordered traversal over an `OrderedMap` snapshot
//!
//! Iterators keep an explicit stack of pending nodes, so a walk never
//! recurses and costs O(n) in total.

use std::ops::Bound;

use super::avl::{Node, OrderedMap};

/// In-order iterator, smallest key first.
pub struct Ascending<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Ascending<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Ascending<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Ascending<'_, K, V> {}

/// Reverse in-order iterator, largest key first.
pub struct Descending<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Descending<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_right_spine(root);
        iter
    }

    fn push_right_spine(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.right.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Descending<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_right_spine(node.left.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Descending<'_, K, V> {}

/// Bounded ascending iterator produced by `OrderedMap::range`.
pub struct Range<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    upper: Bound<&'a K>,
    done: bool,
}

impl<'a, K: Ord, V> Range<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, lower: Bound<&'a K>, upper: Bound<&'a K>) -> Self {
        let mut stack = Vec::new();
        let mut current = root;

        // Seek the lower bound, keeping every node that is still in range
        while let Some(node) = current {
            let in_range = match lower {
                Bound::Included(lo) => node.key >= *lo,
                Bound::Excluded(lo) => node.key > *lo,
                Bound::Unbounded => true,
            };
            if in_range {
                stack.push(node);
                current = node.left.as_deref();
            } else {
                current = node.right.as_deref();
            }
        }

        Self {
            stack,
            upper,
            done: false,
        }
    }

    fn below_upper(&self, key: &K) -> bool {
        match self.upper {
            Bound::Included(hi) => key <= hi,
            Bound::Excluded(hi) => key < hi,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, K: Ord, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let node = self.stack.pop()?;
        if !self.below_upper(&node.key) {
            self.done = true;
            self.stack.clear();
            return None;
        }

        let mut current = node.right.as_deref();
        while let Some(next) = current {
            self.stack.push(next);
            current = next.left.as_deref();
        }

        Some((&node.key, &node.value))
    }
}

/// The `n` highest-keyed values, highest first.
pub fn top_n<K, V>(map: &OrderedMap<K, V>, n: usize) -> Vec<&V> {
    map.descending().take(n).map(|(_, v)| v).collect()
}

/// Fill a fixed number of slots from `items`; unused slots stay `None`.
pub fn padded<T, I, const N: usize>(items: I) -> [Option<T>; N]
where
    I: IntoIterator<Item = T>,
{
    let mut slots: [Option<T>; N] = std::array::from_fn(|_| None);
    for (slot, item) in slots.iter_mut().zip(items) {
        *slot = Some(item);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_size() {
        let map: OrderedMap<u32, ()> = (0..50).map(|k| (k, ())).collect();
        let mut iter = map.ascending();
        assert_eq!(iter.len(), 50);
        iter.next();
        assert_eq!(iter.len(), 49);
        assert_eq!(map.descending().len(), 50);
    }

    #[test]
    fn test_ascending_descending_mirror() {
        let map: OrderedMap<u32, u32> = [9, 2, 7, 4, 5, 1].into_iter().map(|k| (k, k)).collect();
        let mut forward: Vec<u32> = map.ascending().map(|(k, _)| *k).collect();
        let backward: Vec<u32> = map.descending().map(|(k, _)| *k).collect();
        forward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_top_n() {
        let map: OrderedMap<u32, &str> = [(1, "low"), (5, "high"), (3, "mid")].into_iter().collect();
        assert_eq!(top_n(&map, 2), vec![&"high", &"mid"]);
        assert_eq!(top_n(&map, 10).len(), 3);
        assert!(top_n(&map, 0).is_empty());
    }

    #[test]
    fn test_padded_slots() {
        let slots: [Option<u8>; 4] = padded([1, 2]);
        assert_eq!(slots, [Some(1), Some(2), None, None]);

        let truncated: [Option<u8>; 2] = padded([1, 2, 3]);
        assert_eq!(truncated, [Some(1), Some(2)]);
    }

    #[test]
    fn test_range_on_empty_map() {
        let map: OrderedMap<u32, ()> = OrderedMap::new();
        assert_eq!(map.range(Bound::Unbounded, Bound::Unbounded).count(), 0);
    }
}
