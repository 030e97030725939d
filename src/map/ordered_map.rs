//! Persistent ordered map over the weight-balanced tree in [`crate::wbt`].

use std::fmt;
use std::ops;
use std::rc::Rc;

use crate::map::OrderedSet;
use crate::seq::LazySeq;
use crate::wbt::{self, Node};

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Persistent ordered map, keyed by `K: Ord`. Iteration order follows key
/// order; `O(1)` `len` comes from the tree's cached subtree size.
pub struct OrderedMap<K, V> {
    root: Link<K, V>,
}

impl<K, V> Clone for OrderedMap<K, V> {
    fn clone(&self) -> Self {
        Self { root: self.root.clone() }
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Number of key-value pairs, `O(1)`.
    #[must_use]
    pub fn len(&self) -> usize {
        wbt::node::size(self.root.as_ref())
    }

    /// `true` if the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) const fn from_root(root: Link<K, V>) -> Self {
        Self { root }
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Looks up `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        wbt::get::lookup(self.root.as_ref(), key)
    }

    /// `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// The entry with the smallest key.
    #[must_use]
    pub fn lookup_min(&self) -> Option<(&K, &V)> {
        wbt::minmax::lookup_min(&self.root)
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn lookup_max(&self) -> Option<(&K, &V)> {
        wbt::minmax::lookup_max(&self.root)
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Iterates in ascending key order.
    #[must_use]
    pub fn iter(&self) -> wbt::iter::Asc<'_, K, V> {
        wbt::iter::iterate_asc(&self.root)
    }

    /// Iterates in descending key order.
    #[must_use]
    pub fn iter_desc(&self) -> wbt::iter::Desc<'_, K, V> {
        wbt::iter::iterate_desc(&self.root)
    }

    /// Folds over every entry in ascending key order.
    pub fn fold<S>(&self, init: S, mut f: impl FnMut(S, &K, &V) -> S) -> S {
        let mut acc = init;
        for (k, v) in self.iter() {
            acc = f(acc, k, v);
        }
        acc
    }

    /// Calls `f` once per entry, ascending, for side effects.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }
}

impl<K: Clone + 'static, V: Clone + 'static> OrderedMap<K, V> {
    /// A lazy, single-use ascending view over this map's entries.
    #[must_use]
    pub fn to_asc_lazy_seq(&self) -> LazySeq<(K, V)> {
        LazySeq::from_iter(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>())
    }

    /// A lazy, single-use descending view over this map's entries.
    #[must_use]
    pub fn to_desc_lazy_seq(&self) -> LazySeq<(K, V)> {
        LazySeq::from_iter(self.iter_desc().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>())
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> OrderedMap<K, V> {
    /// Applies `f` to the current value (if any) under `key`; `f` returning
    /// `None` deletes the key. Returns the prior value, if any.
    pub fn alter(&mut self, key: &K, f: impl FnOnce(Option<&V>) -> Option<V>) -> Option<V> {
        let outcome = wbt::alter::alter(self.root.clone(), key, f);
        self.root = outcome.node;
        outcome.old_value
    }

    /// Inserts `key` → `value`. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.alter(&key, |_| Some(value))
    }

    /// Applies `f` to the value at `key` if present; a no-op otherwise.
    pub fn modify(&mut self, key: &K, f: impl FnOnce(&V) -> V) {
        let mut f = Some(f);
        self.alter(key, |existing| existing.map(|v| (f.take().expect("called once"))(v)));
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.alter(key, |_| None)
    }

    /// Removes and returns the minimum entry, if any.
    pub fn delete_min_entry(&mut self) -> Option<(K, V)> {
        let (k, v, rest) = wbt::minmax::min_view(&self.root)?;
        self.root = rest;
        Some((k, v))
    }

    /// Removes and returns the maximum entry, if any.
    pub fn delete_max_entry(&mut self) -> Option<(K, V)> {
        let (k, v, rest) = wbt::minmax::max_view(&self.root)?;
        self.root = rest;
        Some((k, v))
    }

    /// Splits around `key`: everything `< key`, the value at `key` (if
    /// present), and everything `> key`.
    #[must_use]
    pub fn split(&self, key: &K) -> (Self, Option<V>, Self) {
        let (lt, found, gt) = wbt::split::split(&self.root, key);
        (Self::from_root(lt), found, Self::from_root(gt))
    }

    /// Splits into `(matching pred, not matching pred)`.
    #[must_use]
    pub fn partition(&self, pred: impl FnMut(&K, &V) -> bool) -> (Self, Self) {
        let (t, f) = wbt::split::partition(&self.root, pred);
        (Self::from_root(t), Self::from_root(f))
    }

    /// Merges with `other`, applying `merge(key, self_value, other_value)`
    /// for keys present in both. Returns `self` unchanged (by `Rc` identity)
    /// when nothing from `other` actually changes the result.
    #[must_use]
    pub fn union(&self, other: &Self, mut merge: impl FnMut(&K, &V, &V) -> V) -> Self {
        Self::from_root(wbt::combine::union(&self.root, &other.root, &mut merge))
    }

    /// Keeps only keys present in both, applying `merge`.
    #[must_use]
    pub fn intersection(&self, other: &Self, mut merge: impl FnMut(&K, &V, &V) -> V) -> Self {
        Self::from_root(wbt::combine::intersection(&self.root, &other.root, &mut merge))
    }

    /// Every key of `self` not present in `other`. A direct two-tree splice
    /// — `self` unchanged (by reference) when `other` is empty.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self::from_root(wbt::combine::difference(&self.root, &other.root))
    }

    /// `self` with every key of `keys` removed. `keys` has a different value
    /// type (`()`) than `self`, so this is an `O(n log n)` filter rather
    /// than a two-tree splice.
    #[must_use]
    pub fn without_keys(&self, keys: &OrderedSet<K>) -> Self {
        self.filter(|k, _| !keys.contains(k))
    }

    /// Keys present in exactly one of `self`/`other`.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> OrderedSet<K> {
        self.difference(other).key_set().union(&other.difference(self).key_set())
    }

    /// A single joint pass: for every key in `helper`, applies
    /// `f(self's current value, helper's value, key)` and installs or
    /// deletes per the result.
    #[must_use]
    pub fn adjust<W>(&self, helper: &OrderedMap<K, W>, mut f: impl FnMut(Option<&V>, &W, &K) -> Option<V>) -> Self {
        Self::from_root(wbt::combine::adjust(&self.root, &helper.root, &mut f))
    }

    /// `self` with every entry of `other` layered on top (right-biased).
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        self.union(other, |_, _, b| b.clone())
    }

    /// Keeps only entries matching `pred`.
    #[must_use]
    pub fn filter(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Self {
        Self::from_root(wbt::transform::collect_values(&self.root, &mut |k, v| {
            if pred(k, v) { Some(v.clone()) } else { None }
        }))
    }

    /// Replaces every value via `f`, preserving key layout.
    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(&K, &V) -> V) -> Self {
        Self::from_root(wbt::transform::map_values(&self.root, &mut f))
    }

    /// Filter+map in one pass: `f` returns `None` to drop an entry.
    #[must_use]
    pub fn collect_values(&self, mut f: impl FnMut(&K, &V) -> Option<V>) -> Self {
        Self::from_root(wbt::transform::collect_values(&self.root, &mut f))
    }

    /// This map's keys as an [`OrderedSet`]. `O(n)`, since node layout is
    /// monomorphized over `V` (see `DESIGN.md`).
    #[must_use]
    pub fn key_set(&self) -> OrderedSet<K>
    where
        K: Clone,
    {
        OrderedSet::from_iter(self.iter().map(|(k, _)| k.clone()))
    }

    /// `true` if every key of `self` is present in `other`.
    #[must_use]
    pub fn is_subset_of<W>(&self, other: &OrderedMap<K, W>) -> bool {
        self.iter().all(|(k, _)| other.contains_key(k))
    }

    /// `true` if every key of `other` is present in `self`.
    #[must_use]
    pub fn is_superset_of<W>(&self, other: &OrderedMap<K, W>) -> bool {
        other.is_subset_of(self)
    }

    /// `true` if `self` and `other` share no keys.
    #[must_use]
    pub fn is_disjoint_from<W>(&self, other: &OrderedMap<K, W>) -> bool {
        self.iter().all(|(k, _)| !other.contains_key(k))
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> ops::Index<&K> for OrderedMap<K, V> {
    type Output = V;

    /// # Panics
    /// Panics if `key` is absent.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = wbt::iter::Asc<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.0 == b.0 && a.1 == b.1)
    }
}

impl<K: Ord, V: Eq> Eq for OrderedMap<K, V> {}
