//! Persistent hash set: a thin wrapper over [`HashMap<K, ()>`].

use std::fmt;
use std::hash::Hash;

use crate::map::HashMap;
use crate::seq::LazySeq;

/// Persistent hash set, keyed by `K: Hash + Eq + Ord`.
#[derive(Clone)]
pub struct HashSet<K> {
    inner: HashMap<K, ()>,
}

impl<K> HashSet<K> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { inner: HashMap::new() }
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.inner.len()
    }

    /// `true` if the set has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: Hash + Eq + Ord> HashSet<K> {
    /// `true` if `key` is a member.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }
}

impl<K> HashSet<K> {
    /// Iterates over the members in an unspecified but deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().map(|(k, _)| k)
    }
}

impl<K: Hash + Eq + Ord + Clone> HashSet<K> {
    /// Inserts `key`. Returns `true` if it was newly inserted.
    pub fn insert(&mut self, key: K) -> bool {
        self.inner.insert(key, ()).is_none()
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.inner.remove(key).is_some()
    }

    /// `self ∪ other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self { inner: self.inner.union(&other.inner, |_, _, _| ()) }
    }

    /// `self ∩ other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self { inner: self.inner.intersection(&other.inner, |_, _, _| ()) }
    }

    /// `self \ other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self { inner: self.inner.difference(&other.inner) }
    }

    /// Elements present in exactly one of `self`/`other`.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.inner.symmetric_difference(&other.inner)
    }

    /// Keeps only elements matching `pred`.
    #[must_use]
    pub fn filter(&self, mut pred: impl FnMut(&K) -> bool) -> Self {
        Self { inner: self.inner.filter(|k, _| pred(k)) }
    }

    /// `true` if every element of `self` is in `other`.
    #[must_use]
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.inner.is_subset_of(&other.inner)
    }

    /// `true` if every element of `other` is in `self`.
    #[must_use]
    pub fn is_superset_of(&self, other: &Self) -> bool {
        self.inner.is_superset_of(&other.inner)
    }

    /// `true` if `self` and `other` share no elements.
    #[must_use]
    pub fn is_disjoint_from(&self, other: &Self) -> bool {
        self.inner.is_disjoint_from(&other.inner)
    }
}

impl<K: Clone + 'static> HashSet<K> {
    /// A lazy, single-use view over this set's members.
    #[must_use]
    pub fn to_lazy_seq(&self) -> LazySeq<K> {
        LazySeq::from_iter(self.iter().cloned().collect::<Vec<_>>())
    }
}

impl<K> Default for HashSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug + Hash + Eq> fmt::Debug for HashSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Ord + Clone> Extend<K> for HashSet<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for k in iter {
            self.insert(k);
        }
    }
}

impl<K: Hash + Eq + Ord + Clone> FromIterator<K> for HashSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<K: Hash + Eq + Ord> PartialEq for HashSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K: Hash + Eq + Ord> Eq for HashSet<K> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_contains_remove() {
        let mut s = HashSet::new();
        assert!(s.insert(1));
        assert!(!s.insert(1));
        assert!(s.contains(&1));
        assert!(s.remove(&1));
        assert!(!s.contains(&1));
    }

    #[test]
    fn set_algebra() {
        let a: HashSet<i32> = [1, 2, 3, 4].into_iter().collect();
        let b: HashSet<i32> = [3, 4, 5, 6].into_iter().collect();
        assert_eq!(a.union(&b).len(), 6);
        assert_eq!(a.intersection(&b).len(), 2);
        assert_eq!(a.difference(&b).len(), 2);
        assert_eq!(a.symmetric_difference(&b).len(), 4);
    }
}
