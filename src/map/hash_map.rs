//! Persistent hash map over the CHAMP-style trie in [`crate::hamt`].

use std::fmt;
use std::hash::Hash;
use std::ops;
use std::rc::Rc;

use crate::adhash;
use crate::hamt::{self, Node};
use crate::map::HashSet;
use crate::seq::LazySeq;

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Persistent hash map, keyed by `K: Hash + Eq + Ord` (the `Ord` bound lets
/// hash collisions fall through to an ordered bucket instead of a linear
/// scan; see [`crate::hamt`]).
///
/// `Clone` is `O(1)` (an `Rc` bump); every mutating method replaces
/// `self`'s root with a freshly linked one while any clone taken beforehand
/// keeps pointing at its own, structurally-shared, unaffected root.
pub struct HashMap<K, V> {
    root: Link<K, V>,
    len: usize,
    adhash: u64,
}

impl<K, V> Clone for HashMap<K, V> {
    fn clone(&self) -> Self {
        Self { root: self.root.clone(), len: self.len, adhash: self.adhash }
    }
}

impl<K, V> HashMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self { root: None, len: 0, adhash: 0 }
    }

    /// Number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The incrementally maintained structural digest, `φ(S) = Σ f(k, v)`.
    /// Two maps with equal `structural_hash` and equal `len` contain the
    /// same entries with overwhelming probability; used as a fast-reject
    /// before [`PartialEq`] falls back to entry-by-entry comparison.
    #[must_use]
    pub const fn structural_hash(&self) -> u64 {
        self.adhash
    }

    pub(crate) const fn from_parts(root: Link<K, V>, len: usize, adhash: u64) -> Self {
        Self { root, len, adhash }
    }
}

impl<K: Hash + Eq + Ord, V> HashMap<K, V> {
    /// Looks up `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        hamt::get::get(self.root.as_ref(), adhash::hash_one(key), key)
    }

    /// `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V> HashMap<K, V> {
    /// Iterates over `(&K, &V)` pairs in an unspecified but deterministic
    /// order.
    #[must_use]
    pub fn iter(&self) -> hamt::iter::Iter<'_, K, V> {
        hamt::iter::Iter::new(self.root.as_ref())
    }

    /// Folds over every entry.
    pub fn fold<S>(&self, init: S, mut f: impl FnMut(S, &K, &V) -> S) -> S {
        let mut acc = init;
        for (k, v) in self.iter() {
            acc = f(acc, k, v);
        }
        acc
    }

    /// Calls `f` once per entry, for side effects.
    pub fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }
}

impl<K: Clone + 'static, V: Clone + 'static> HashMap<K, V> {
    /// A lazy, single-use view over this map's entries.
    #[must_use]
    pub fn to_lazy_seq(&self) -> LazySeq<(K, V)> {
        LazySeq::from_iter(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<Vec<_>>())
    }
}

fn summarize<K: Hash + Eq + Ord, V: Hash>(root: &Link<K, V>) -> (usize, u64) {
    let mut len = 0usize;
    let mut adhash = 0u64;
    for (k, v) in hamt::iter::Iter::new(root.as_ref()) {
        len += 1;
        adhash = adhash.wrapping_add(adhash::entry_digest(adhash::hash_one(k), adhash::hash_one(v)));
    }
    (len, adhash)
}

fn from_root<K: Hash + Eq + Ord, V: Hash>(root: Link<K, V>) -> HashMap<K, V> {
    let (len, adhash) = summarize(&root);
    HashMap::from_parts(root, len, adhash)
}

impl<K: Hash + Eq + Ord + Clone, V: Clone + PartialEq + Hash> HashMap<K, V> {
    /// Applies `f` to the current value (if any) under `key`; `f` returning
    /// `None` deletes the key. Returns the prior value, if any.
    ///
    /// `f` runs exactly once. If the produced value equals the prior one,
    /// the map's root is left as the same `Rc` allocation.
    pub fn alter(&mut self, key: &K, f: impl FnOnce(Option<&V>) -> Option<V>) -> Option<V> {
        let hash = adhash::hash_one(key);
        let mut produced: Option<Option<V>> = None;
        let outcome = hamt::alter::alter(self.root.clone(), hash, key, |existing| {
            let result = f(existing);
            produced = Some(result.clone());
            result
        });
        if !outcome.unchanged {
            let old_contrib =
                outcome.old_value.as_ref().map_or(0, |v| adhash::entry_digest(hash, adhash::hash_one(v)));
            let new_contrib = produced
                .as_ref()
                .and_then(Option::as_ref)
                .map_or(0, |v| adhash::entry_digest(hash, adhash::hash_one(v)));
            self.adhash = self.adhash.wrapping_sub(old_contrib).wrapping_add(new_contrib);
            self.root = outcome.node;
            self.len = (self.len as i64 + i64::from(outcome.size_delta)) as usize;
        }
        outcome.old_value
    }

    /// Inserts `key` → `value`. Returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.alter(&key, |_| Some(value))
    }

    /// Applies `f` to the value at `key` if present; a no-op otherwise.
    /// Unlike [`alter`](Self::alter), `f` cannot delete the key.
    pub fn modify(&mut self, key: &K, f: impl FnOnce(&V) -> V) {
        let mut f = Some(f);
        self.alter(key, |existing| existing.map(|v| (f.take().expect("called once"))(v)));
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.alter(key, |_| None)
    }
}

impl<K: Hash + Eq + Ord + Clone, V: Clone + PartialEq + Hash> HashMap<K, V> {
    /// Wraps this map's keys as a [`HashSet`]. Always `O(n)`: node layout is
    /// monomorphized over `V`, so even when `V = ()` the trie cannot be
    /// reused as-is without a second, `V`-erased inherent `impl` that would
    /// overlap this one (see `DESIGN.md`).
    #[must_use]
    pub fn key_set(&self) -> HashSet<K> {
        HashSet::from_iter(self.iter().map(|(k, _)| k.clone()))
    }

    /// Merges with `other`, applying `merge(key, self_value, other_value)`
    /// for keys present in both. Returns `self` unchanged (by `Rc` identity)
    /// when `other` is empty.
    #[must_use]
    pub fn union(&self, other: &Self, mut merge: impl FnMut(&K, &V, &V) -> V) -> Self {
        let mut intersection_count = 0;
        let root = hamt::combine::union(&self.root, &other.root, &mut merge, &mut intersection_count);
        let (_, adhash) = summarize(&root);
        HashMap::from_parts(root, self.len + other.len - intersection_count, adhash)
    }

    /// Keeps only keys present in both, applying `merge`.
    #[must_use]
    pub fn intersection(&self, other: &Self, mut merge: impl FnMut(&K, &V, &V) -> V) -> Self {
        let mut count = 0;
        let root = hamt::combine::intersection(&self.root, &other.root, &mut merge, &mut count);
        let (_, adhash) = summarize(&root);
        HashMap::from_parts(root, count, adhash)
    }

    /// Every key of `self` not present in `other`. A direct two-tree splice,
    /// not a fold — `self` unchanged (by reference) when `other` is empty.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        let root = hamt::combine::difference(&self.root, &other.root);
        from_root(root)
    }

    /// `self` with every key of `keys` removed. Implemented as an `O(n log
    /// n)` filter rather than a two-tree splice, since `keys` has a
    /// different value type (`()`) than `self`.
    #[must_use]
    pub fn without_keys(&self, keys: &HashSet<K>) -> Self {
        self.filter(|k, _| !keys.contains(k))
    }

    /// Keys present in exactly one of `self`/`other`.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> HashSet<K> {
        self.difference(other).key_set().union(&other.difference(self).key_set())
    }

    /// A single joint pass: for every key in `helper`, applies
    /// `f(self's current value, helper's value, key)` and installs or
    /// deletes per the result.
    #[must_use]
    pub fn adjust<W: Clone>(&self, helper: &HashMap<K, W>, mut f: impl FnMut(Option<&V>, &W, &K) -> Option<V>) -> Self {
        let root = hamt::combine::adjust(&self.root, &helper.root, &mut f);
        from_root(root)
    }

    /// `self` with every entry of `other` layered on top (right-biased).
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        self.union(other, |_, _, b| b.clone())
    }

    /// Keeps only entries matching `pred`.
    #[must_use]
    pub fn filter(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Self {
        let root = hamt::transform::collect_values(&self.root, &mut |k, v| if pred(k, v) { Some(v.clone()) } else { None });
        from_root(root)
    }

    /// Replaces every value via `f`, preserving key layout.
    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(&K, &V) -> V) -> Self {
        let root = hamt::transform::map_values(&self.root, &mut f);
        from_root(root)
    }

    /// Filter+map in one pass: `f` returns `None` to drop an entry.
    #[must_use]
    pub fn collect_values(&self, mut f: impl FnMut(&K, &V) -> Option<V>) -> Self {
        let root = hamt::transform::collect_values(&self.root, &mut f);
        from_root(root)
    }
}

impl<K: Hash + Eq + Ord, V> HashMap<K, V> {
    /// `true` if every key of `self` is present in `other`.
    #[must_use]
    pub fn is_subset_of<W>(&self, other: &HashMap<K, W>) -> bool {
        self.iter().all(|(k, _)| other.contains_key(k))
    }

    /// `true` if every key of `other` is present in `self`.
    #[must_use]
    pub fn is_superset_of<W>(&self, other: &HashMap<K, W>) -> bool {
        other.is_subset_of(self)
    }

    /// `true` if `self` and `other` share no keys.
    #[must_use]
    pub fn is_disjoint_from<W>(&self, other: &HashMap<K, W>) -> bool {
        self.iter().all(|(k, _)| !other.contains_key(k))
    }
}

impl<K, V> Default for HashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug + Hash + Eq, V: fmt::Debug> fmt::Debug for HashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Ord + Clone, V: Clone + PartialEq + Hash> Extend<(K, V)> for HashMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Hash + Eq + Ord + Clone, V: Clone + PartialEq + Hash> FromIterator<(K, V)> for HashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq + Ord, V> ops::Index<&K> for HashMap<K, V> {
    type Output = V;

    /// # Panics
    /// Panics if `key` is absent.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a HashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hamt::iter::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Hash + Eq + Ord, V: PartialEq> PartialEq for HashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len || self.adhash != other.adhash {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Hash + Eq + Ord, V: Eq> Eq for HashMap<K, V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove_roundtrip() {
        let mut m = HashMap::new();
        assert_eq!(m.insert("a", 1), None);
        assert_eq!(m.insert("a", 2), Some(1));
        assert_eq!(m.get(&"a"), Some(&2));
        assert_eq!(m.remove(&"a"), Some(2));
        assert_eq!(m.get(&"a"), None);
        assert!(m.is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let mut m = HashMap::new();
        m.insert(1, "one");
        let snapshot = m.clone();
        m.insert(2, "two");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn union_prefers_right_on_conflict() {
        let a: HashMap<i32, i32> = [(1, 10), (2, 20)].into_iter().collect();
        let b: HashMap<i32, i32> = [(2, 200), (3, 300)].into_iter().collect();
        let u = a.union(&b, |_, _, r| *r);
        assert_eq!(u.get(&2), Some(&200));
        assert_eq!(u.len(), 3);
    }

    #[test]
    fn difference_and_symmetric_difference() {
        let a: HashMap<i32, i32> = [(1, 1), (2, 2), (3, 3)].into_iter().collect();
        let b: HashMap<i32, i32> = [(2, 20), (3, 30), (4, 40)].into_iter().collect();
        let d = a.difference(&b);
        assert_eq!(d.len(), 1);
        assert!(d.contains_key(&1));

        let sym = a.symmetric_difference(&b);
        assert_eq!(sym.len(), 3);
        assert!(sym.contains(&1) && sym.contains(&4));
    }

    #[test]
    fn structural_equality_matches_content() {
        let a: HashMap<i32, i32> = [(1, 1), (2, 2)].into_iter().collect();
        let b: HashMap<i32, i32> = [(2, 2), (1, 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.structural_hash(), b.structural_hash());
    }
}
