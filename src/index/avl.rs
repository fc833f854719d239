//! Height-balanced (AVL) ordered map
//!
//! Every store in the crate is built from this one tree. Nodes own their
//! children outright; there are no parent links.
//!
//! # Invariants
//!
//! - In-order traversal is non-decreasing by key
//! - Every node caches `1 + max(height(left), height(right))`
//! - Every node has a balance factor in {-1, 0, 1} after each public call
//!
//! # Duplicate keys
//!
//! The map is a multi-map. `insert` never overwrites: a key equal to
//! existing keys descends left, so the new entry lands in-order before all
//! of them. Equal keys therefore traverse newest-inserted first, and `get`
//! returns the newest value.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

use super::errors::{InvariantViolation, InvariantResult};
use super::traversal::{Ascending, Descending, Range};

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

/// A single tree node.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Height of the subtree rooted here (leaf = 1)
    pub(crate) height: u32,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Self {
        Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }
}

/// Generic ordered map backed by an AVL tree.
///
/// Insert and lookup are O(log n); a full traversal is O(n).
#[derive(Clone)]
pub struct OrderedMap<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (empty = 0)
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Entries in ascending key order.
    ///
    /// The walk reflects the tree at call time; the borrow prevents any
    /// mutation until the iterator is dropped.
    pub fn ascending(&self) -> Ascending<'_, K, V> {
        Ascending::new(self.root.as_deref(), self.len)
    }

    /// Entries in descending key order
    pub fn descending(&self) -> Descending<'_, K, V> {
        Descending::new(self.root.as_deref(), self.len)
    }

    /// Smallest entry
    pub fn first(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Largest entry
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Insert an entry.
    ///
    /// Always succeeds. Rebalances every ancestor of the new node before
    /// returning.
    pub fn insert(&mut self, key: K, value: V) {
        let root = self.root.take();
        self.root = Some(insert_into(root, key, value));
        self.len += 1;
    }

    /// Lookup the most recently inserted value for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        let mut found = None;

        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => {
                    // Newer duplicates sit further left
                    found = Some(&node.value);
                    current = node.left.as_deref();
                }
            }
        }

        found
    }

    /// Mutable lookup; same entry `get` would return
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        find_mut(&mut self.root, key).map(|node| &mut node.value)
    }

    /// Returns true if at least one entry has this key
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// All values stored under `key`, newest first
    pub fn get_all<'a>(&'a self, key: &'a K) -> Vec<&'a V> {
        self.range(Bound::Included(key), Bound::Included(key))
            .map(|(_, v)| v)
            .collect()
    }

    /// Number of entries stored under `key`
    pub fn count(&self, key: &K) -> usize {
        self.range(Bound::Included(key), Bound::Included(key)).count()
    }

    /// Entries whose keys fall within the bounds, ascending.
    pub fn range<'a>(&'a self, lower: Bound<&'a K>, upper: Bound<&'a K>) -> Range<'a, K, V> {
        Range::new(self.root.as_deref(), lower, upper)
    }

    /// Validate ordering, cached heights, balance and element count.
    pub fn check_invariants(&self) -> InvariantResult<()> {
        let counted = check_node(self.root.as_deref())?.1;
        if counted != self.len {
            return Err(InvariantViolation::LengthMismatch {
                recorded: self.len,
                counted,
            });
        }

        let mut previous: Option<&K> = None;
        for (position, (key, _)) in self.ascending().enumerate() {
            if let Some(prev) = previous {
                if prev > key {
                    return Err(InvariantViolation::OutOfOrder { position });
                }
            }
            previous = Some(key);
        }

        Ok(())
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Ascending<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.ascending()
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    /// Consumes the tree in ascending order
    fn into_iter(self) -> Self::IntoIter {
        let mut out = Vec::with_capacity(self.len);
        drain_in_order(self.root, &mut out);
        out.into_iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.ascending()).finish()
    }
}

// =============================================================================
// Tree mechanics
// =============================================================================

fn height<K, V>(link: &Link<K, V>) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn update_height<K, V>(node: &mut Node<K, V>) {
    node.height = 1 + height(&node.left).max(height(&node.right));
}

fn balance_factor<K, V>(node: &Node<K, V>) -> i64 {
    i64::from(height(&node.left)) - i64::from(height(&node.right))
}

fn insert_into<K: Ord, V>(link: Link<K, V>, key: K, value: V) -> Box<Node<K, V>> {
    match link {
        None => Box::new(Node::leaf(key, value)),
        Some(mut node) => {
            if key <= node.key {
                node.left = Some(insert_into(node.left.take(), key, value));
            } else {
                node.right = Some(insert_into(node.right.take(), key, value));
            }
            rebalance(node)
        }
    }
}

fn rotate_right<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

fn rotate_left<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Restore the AVL property at `node`, assuming both subtrees satisfy it.
fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    update_height(&mut node);
    let balance = balance_factor(&node);

    if balance > 1 {
        // Left-right: straighten the left child first
        if node.left.as_deref().map_or(0, balance_factor) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // Right-left
        if node.right.as_deref().map_or(0, balance_factor) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn find_mut<'a, K, V, Q>(link: &'a mut Link<K, V>, key: &Q) -> Option<&'a mut Node<K, V>>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let node = link.as_deref_mut()?;
    match key.cmp(node.key.borrow()) {
        Ordering::Less => find_mut(&mut node.left, key),
        Ordering::Greater => find_mut(&mut node.right, key),
        Ordering::Equal => {
            if contains(node.left.as_deref(), key) {
                find_mut(&mut node.left, key)
            } else {
                Some(node)
            }
        }
    }
}

fn contains<K, V, Q>(mut current: Option<&Node<K, V>>, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    while let Some(node) = current {
        current = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return true,
        };
    }
    false
}

fn drain_in_order<K, V>(link: Link<K, V>, out: &mut Vec<(K, V)>) {
    if let Some(node) = link {
        let Node {
            key,
            value,
            left,
            right,
            ..
        } = *node;
        drain_in_order(left, out);
        out.push((key, value));
        drain_in_order(right, out);
    }
}

/// Returns (height, node count) of a valid subtree.
fn check_node<K, V>(node: Option<&Node<K, V>>) -> InvariantResult<(u32, usize)> {
    let Some(node) = node else {
        return Ok((0, 0));
    };

    let (left_height, left_count) = check_node(node.left.as_deref())?;
    let (right_height, right_count) = check_node(node.right.as_deref())?;

    let expected = 1 + left_height.max(right_height);
    if node.height != expected {
        return Err(InvariantViolation::StaleHeight {
            cached: node.height,
            actual: expected,
        });
    }

    let balance = i64::from(left_height) - i64::from(right_height);
    if !(-1..=1).contains(&balance) {
        return Err(InvariantViolation::Unbalanced { balance });
    }

    Ok((expected, left_count + right_count + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<V>(map: &OrderedMap<i32, V>) -> Vec<i32> {
        map.ascending().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_empty_map() {
        let map: OrderedMap<i32, &str> = OrderedMap::new();
        assert!(map.is_empty());
        assert_eq!(map.height(), 0);
        assert_eq!(map.get(&1), None);
        assert!(map.first().is_none());
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_order_fidelity() {
        let mut map = OrderedMap::new();
        for k in [5, 3, 8, 1, 4, 7, 9] {
            map.insert(k, k * 10);
        }
        assert_eq!(keys(&map), vec![1, 3, 4, 5, 7, 8, 9]);
        assert_eq!(map.len(), 7);
        assert_eq!(map.get(&4), Some(&40));
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_ascending_insert_stays_balanced() {
        let mut map = OrderedMap::new();
        for k in 0..1024 {
            map.insert(k, ());
            assert!(map.check_invariants().is_ok());
        }
        // A perfect tree of 1023 nodes has height 10
        assert!(map.height() <= 11);
    }

    #[test]
    fn test_each_rotation_case() {
        // LL, RR, LR, RL
        for order in [[3, 2, 1], [1, 2, 3], [3, 1, 2], [1, 3, 2]] {
            let mut map = OrderedMap::new();
            for k in order {
                map.insert(k, ());
            }
            assert_eq!(map.height(), 2, "order {:?}", order);
            assert_eq!(map.root.as_ref().map(|n| n.key), Some(2));
            assert_eq!(keys(&map), vec![1, 2, 3]);
        }
    }

    #[test]
    fn test_duplicates_newest_first() {
        let mut map = OrderedMap::new();
        map.insert(1, "a");
        map.insert(2, "first");
        map.insert(3, "c");
        map.insert(2, "second");
        map.insert(2, "third");

        assert_eq!(map.len(), 5);
        assert_eq!(map.get(&2), Some(&"third"));
        assert_eq!(map.get_all(&2), vec![&"third", &"second", &"first"]);
        assert_eq!(map.count(&2), 3);
        assert_eq!(map.count(&9), 0);
        assert!(map.check_invariants().is_ok());
    }

    #[test]
    fn test_get_mut_targets_newest_duplicate() {
        let mut map = OrderedMap::new();
        for v in 0..20 {
            map.insert(7, v);
            map.insert(v, -1);
        }
        if let Some(value) = map.get_mut(&7) {
            *value = 100;
        }
        assert_eq!(map.get(&7), Some(&100));
        assert_eq!(map.get_all(&7).len(), 21);
    }

    #[test]
    fn test_range_bounds() {
        let map: OrderedMap<i32, ()> = (1..=10).map(|k| (k, ())).collect();

        let inclusive: Vec<i32> = map
            .range(Bound::Included(&3), Bound::Included(&6))
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(inclusive, vec![3, 4, 5, 6]);

        let exclusive: Vec<i32> = map
            .range(Bound::Excluded(&3), Bound::Excluded(&6))
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(exclusive, vec![4, 5]);

        let open: Vec<i32> = map
            .range(Bound::Unbounded, Bound::Excluded(&3))
            .map(|(k, _)| *k)
            .collect();
        assert_eq!(open, vec![1, 2]);
    }

    #[test]
    fn test_first_last_and_descending() {
        let map: OrderedMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
        assert_eq!(map.first(), Some((&1, &'a')));
        assert_eq!(map.last(), Some((&3, &'c')));
        let desc: Vec<i32> = map.descending().map(|(k, _)| *k).collect();
        assert_eq!(desc, vec![3, 2, 1]);
    }

    #[test]
    fn test_owned_into_iter() {
        let map: OrderedMap<i32, String> =
            [(2, "b".to_string()), (1, "a".to_string())].into_iter().collect();
        let owned: Vec<(i32, String)> = map.into_iter().collect();
        assert_eq!(owned, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut map: OrderedMap<String, u32> = OrderedMap::new();
        map.insert("#rust".to_string(), 1);
        map.insert("#go".to_string(), 2);

        assert_eq!(map.get("#go"), Some(&2));
        assert!(map.contains_key("#rust"));
        assert!(!map.contains_key("#"));
        if let Some(value) = map.get_mut("#rust") {
            *value += 10;
        }
        assert_eq!(map.get("#rust"), Some(&11));
    }

    #[test]
    fn test_debug_output() {
        let map: OrderedMap<i32, i32> = [(2, 20), (1, 10)].into_iter().collect();
        assert_eq!(format!("{:?}", map), "{1: 10, 2: 20}");
    }
}
