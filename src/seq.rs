//! `LazySeq` — a pull-based, single-use sequence.
//!
//! The idiomatic Rust expression of the "lazy sequence as coroutine" design
//! note: instead of a generator function, a boxed `FnMut() -> Option<T>`
//! plays the same role. Every combinator consumes `self` and wraps the
//! previous generator in a new one; every terminal drains the chain once.
//! Only a sequence built with [`LazySeq::of_iter`] carries the factory
//! needed to rebuild itself via [`LazySeq::restart`] — chaining a combinator
//! on top produces an ordinary single-use sequence, matching the contract
//! that combinators "must not capture shared mutable state" across restarts.

use std::cmp::Ordering;
use std::collections::HashMap as StdHashMap;
use std::hash::Hash;
use std::rc::Rc;

use crate::map::{HashMap, HashSet, OrderedMap, OrderedSet};

type Gen<T> = Box<dyn FnMut() -> Option<T>>;
type Factory<T> = Rc<dyn Fn() -> Gen<T>>;

/// A pull-based, single-use sequence of `T`.
pub struct LazySeq<T> {
    next: Gen<T>,
    factory: Option<Factory<T>>,
}

impl<T: 'static> LazySeq<T> {
    fn from_gen(next: Gen<T>) -> Self {
        Self { next, factory: None }
    }

    /// Builds a sequence from a plain iterator.
    #[must_use]
    pub fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T> + 'static,
    {
        let mut it = iter.into_iter();
        Self::from_gen(Box::new(move || it.next()))
    }

    /// Builds a restartable sequence: `factory` is called once now, and
    /// again on every [`restart`](Self::restart).
    #[must_use]
    pub fn of_iter<I, F>(factory: F) -> Self
    where
        I: IntoIterator<Item = T> + 'static,
        F: Fn() -> I + 'static,
    {
        let factory = Rc::new(move || -> Gen<T> {
            let mut it = factory().into_iter();
            Box::new(move || it.next())
        });
        Self { next: factory(), factory: Some(factory) }
    }

    /// An always-empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_gen(Box::new(|| None))
    }

    /// Rebuilds this sequence from its original factory. Returns `None` if
    /// this sequence was not built via [`of_iter`](Self::of_iter) (e.g. a
    /// combinator was applied on top, which discards restartability).
    #[must_use]
    pub fn restart(&self) -> Option<Self> {
        self.factory.as_ref().map(|f| Self { next: f(), factory: Some(f.clone()) })
    }

    fn pull(&mut self) -> Option<T> {
        (self.next)()
    }

    // -- combinators ---------------------------------------------------

    /// Transforms every element.
    #[must_use]
    pub fn map<U: 'static, F: FnMut(T) -> U + 'static>(mut self, mut f: F) -> LazySeq<U> {
        LazySeq::from_gen(Box::new(move || self.pull().map(&mut f)))
    }

    /// Keeps only elements matching `pred`.
    #[must_use]
    pub fn filter<F: FnMut(&T) -> bool + 'static>(mut self, mut pred: F) -> Self {
        Self::from_gen(Box::new(move || loop {
            match self.pull() {
                Some(v) if pred(&v) => return Some(v),
                Some(_) => continue,
                None => return None,
            }
        }))
    }

    /// Filter and map in one pass.
    #[must_use]
    pub fn collect<U: 'static, F: FnMut(T) -> Option<U> + 'static>(mut self, mut f: F) -> LazySeq<U> {
        LazySeq::from_gen(Box::new(move || loop {
            match self.pull() {
                Some(v) => {
                    if let Some(u) = f(v) {
                        return Some(u);
                    }
                }
                None => return None,
            }
        }))
    }

    /// Maps each element to an iterable and flattens the results.
    #[must_use]
    pub fn flat_map<U: 'static, I, F>(mut self, mut f: F) -> LazySeq<U>
    where
        I: IntoIterator<Item = U> + 'static,
        F: FnMut(T) -> I + 'static,
    {
        let mut current: Option<I::IntoIter> = None;
        LazySeq::from_gen(Box::new(move || loop {
            if let Some(it) = &mut current {
                if let Some(v) = it.next() {
                    return Some(v);
                }
                current = None;
            }
            match self.pull() {
                Some(v) => current = Some(f(v).into_iter()),
                None => return None,
            }
        }))
    }

    /// Stops after the first `n` elements.
    #[must_use]
    pub fn take(mut self, n: usize) -> Self {
        let mut remaining = n;
        Self::from_gen(Box::new(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            self.pull()
        }))
    }

    /// Skips the first `n` elements.
    #[must_use]
    pub fn drop(mut self, n: usize) -> Self {
        let mut to_skip = n;
        Self::from_gen(Box::new(move || {
            while to_skip > 0 {
                to_skip -= 1;
                self.pull()?;
            }
            self.pull()
        }))
    }

    /// Stops at the first element for which `pred` is false.
    #[must_use]
    pub fn take_while<F: FnMut(&T) -> bool + 'static>(mut self, mut pred: F) -> Self {
        let mut done = false;
        Self::from_gen(Box::new(move || {
            if done {
                return None;
            }
            match self.pull() {
                Some(v) if pred(&v) => Some(v),
                _ => {
                    done = true;
                    None
                }
            }
        }))
    }

    /// Skips elements while `pred` holds, then yields the rest unfiltered.
    #[must_use]
    pub fn drop_while<F: FnMut(&T) -> bool + 'static>(mut self, mut pred: F) -> Self {
        let mut dropping = true;
        Self::from_gen(Box::new(move || loop {
            match self.pull() {
                Some(v) => {
                    if dropping && pred(&v) {
                        continue;
                    }
                    dropping = false;
                    return Some(v);
                }
                None => return None,
            }
        }))
    }

    /// Groups elements into fixed-size `Vec<T>` chunks; the final chunk may
    /// be shorter.
    #[must_use]
    pub fn chunk(mut self, size: usize) -> LazySeq<Vec<T>> {
        assert!(size > 0, "chunk size must be nonzero");
        LazySeq::from_gen(Box::new(move || {
            let mut buf = Vec::with_capacity(size);
            for _ in 0..size {
                match self.pull() {
                    Some(v) => buf.push(v),
                    None => break,
                }
            }
            if buf.is_empty() { None } else { Some(buf) }
        }))
    }

    /// Concatenates `self` followed by `other`.
    #[must_use]
    pub fn concat(mut self, mut other: Self) -> Self {
        let mut first_done = false;
        Self::from_gen(Box::new(move || {
            if !first_done {
                if let Some(v) = self.pull() {
                    return Some(v);
                }
                first_done = true;
            }
            other.pull()
        }))
    }

    /// `self` followed by `other` (alias kept for naming symmetry with
    /// [`prepend`](Self::prepend)).
    #[must_use]
    pub fn append(self, other: Self) -> Self {
        self.concat(other)
    }

    /// `other` followed by `self`.
    #[must_use]
    pub fn prepend(self, other: Self) -> Self {
        other.concat(self)
    }

    /// Pairs up elements positionally; stops when either side is exhausted.
    #[must_use]
    pub fn zip<U: 'static>(mut self, mut other: LazySeq<U>) -> LazySeq<(T, U)> {
        LazySeq::from_gen(Box::new(move || Some((self.pull()?, other.pull()?))))
    }

    /// Drains the sequence into `Vec<T>`.
    #[must_use]
    pub fn to_vec(mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(v) = self.pull() {
            out.push(v);
        }
        out
    }

    /// Drains into a `Vec<T>` sorted via `cmp`.
    #[must_use]
    pub fn to_sorted_vec<F: FnMut(&T, &T) -> Ordering>(self, mut cmp: F) -> Vec<T> {
        let mut v = self.to_vec();
        v.sort_by(|a, b| cmp(a, b));
        v
    }

    /// Sorts by `cmp` (eager: a sort must see every element first).
    #[must_use]
    pub fn sort_by<F: FnMut(&T, &T) -> Ordering + 'static>(self, cmp: F) -> Self {
        Self::from_iter(self.to_sorted_vec(cmp))
    }

    /// Sorts by a derived key.
    #[must_use]
    pub fn sort_with<K: Ord, F: FnMut(&T) -> K + 'static>(self, mut key: F) -> Self {
        self.sort_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Accumulates state across the sequence, yielding one value per input
    /// element (a running fold).
    #[must_use]
    pub fn aggregate<S: Clone + 'static, F: FnMut(S, T) -> S + 'static>(mut self, init: S, mut f: F) -> LazySeq<S> {
        let mut state = Some(init);
        LazySeq::from_gen(Box::new(move || {
            let v = self.pull()?;
            let s = state.take()?;
            let next = f(s, v);
            state = Some(next.clone());
            Some(next)
        }))
    }

    // -- terminals -------------------------------------------------------

    /// Left fold over every element.
    pub fn fold_left<S, F: FnMut(S, T) -> S>(mut self, init: S, mut f: F) -> S {
        let mut acc = init;
        while let Some(v) = self.pull() {
            acc = f(acc, v);
        }
        acc
    }

    /// The first element, if any.
    pub fn head(mut self) -> Option<T> {
        self.pull()
    }

    /// The first element matching `pred`.
    pub fn find<F: FnMut(&T) -> bool>(mut self, mut pred: F) -> Option<T> {
        while let Some(v) = self.pull() {
            if pred(&v) {
                return Some(v);
            }
        }
        None
    }

    /// Total element count (drains the sequence).
    pub fn length(mut self) -> usize {
        let mut n = 0;
        while self.pull().is_some() {
            n += 1;
        }
        n
    }

    /// `true` iff every element matches `pred`.
    pub fn all_match<F: FnMut(&T) -> bool>(mut self, mut pred: F) -> bool {
        while let Some(v) = self.pull() {
            if !pred(&v) {
                return false;
            }
        }
        true
    }

    /// `true` iff some element matches `pred`.
    pub fn any_match<F: FnMut(&T) -> bool>(mut self, mut pred: F) -> bool {
        while let Some(v) = self.pull() {
            if pred(&v) {
                return true;
            }
        }
        false
    }

    /// The minimal element by `key`, if any.
    pub fn min_by<K: Ord, F: FnMut(&T) -> K>(self, mut key: F) -> Option<T> {
        self.to_vec().into_iter().min_by_key(|v| key(v))
    }

    /// The maximal element by `key`, if any.
    pub fn max_by<K: Ord, F: FnMut(&T) -> K>(self, mut key: F) -> Option<T> {
        self.to_vec().into_iter().max_by_key(|v| key(v))
    }

    /// Sums a projected numeric field.
    pub fn sum_by<F: FnMut(&T) -> i64>(mut self, mut f: F) -> i64 {
        let mut total = 0i64;
        while let Some(v) = self.pull() {
            total += f(&v);
        }
        total
    }

    /// Removes duplicates, keeping the first occurrence of each distinct
    /// element (`T: Eq + Hash`).
    #[must_use]
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.distinct_by(Clone::clone)
    }

    /// Removes duplicates by a derived key, keeping the first occurrence.
    #[must_use]
    pub fn distinct_by<K: Eq + Hash + 'static, F: FnMut(&T) -> K + 'static>(mut self, mut key: F) -> Self {
        let mut seen = StdHashMap::new();
        Self::from_gen(Box::new(move || loop {
            let v = self.pull()?;
            if seen.insert(key(&v), ()).is_none() {
                return Some(v);
            }
        }))
    }

    /// Groups elements by a derived hashable key, preserving each group's
    /// first-seen order of keys (backed by the crate's own [`HashMap`]).
    #[must_use]
    pub fn group_by<K, F>(mut self, mut key: F) -> HashMap<K, Vec<T>>
    where
        K: Hash + Eq + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        let mut map = HashMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            map.alter(&k, |existing| {
                let mut bucket = existing.cloned().unwrap_or_default();
                bucket.push(v.clone());
                Some(bucket)
            });
        }
        map
    }

    /// Groups elements by a derived ordered key (backed by [`OrderedMap`]).
    #[must_use]
    pub fn ordered_group_by<K, F>(mut self, mut key: F) -> OrderedMap<K, Vec<T>>
    where
        K: Ord + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        let mut map = OrderedMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            map.alter(&k, |existing| {
                let mut bucket = existing.cloned().unwrap_or_default();
                bucket.push(v.clone());
                Some(bucket)
            });
        }
        map
    }

    /// Alias of [`group_by`](Self::group_by) under the `toLookup` name from
    /// the distilled spec.
    #[must_use]
    pub fn to_lookup<K, F>(self, key: F) -> HashMap<K, Vec<T>>
    where
        K: Hash + Eq + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        self.group_by(key)
    }

    /// Alias of [`ordered_group_by`](Self::ordered_group_by).
    #[must_use]
    pub fn to_ordered_lookup<K, F>(self, key: F) -> OrderedMap<K, Vec<T>>
    where
        K: Ord + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        self.ordered_group_by(key)
    }

    /// Builds a [`HashMap`] keyed by `key`, keeping the last value seen per
    /// key (a one-to-one lookup, unlike [`group_by`](Self::group_by)).
    #[must_use]
    pub fn to_hash_map<K, F>(mut self, mut key: F) -> HashMap<K, T>
    where
        K: Hash + Eq + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        let mut map = HashMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            map.insert(k, v);
        }
        map
    }

    /// Builds an [`OrderedMap`] keyed by `key`.
    #[must_use]
    pub fn to_ordered_map<K, F>(mut self, mut key: F) -> OrderedMap<K, T>
    where
        K: Ord + Clone,
        T: Clone,
        F: FnMut(&T) -> K,
    {
        let mut map = OrderedMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            map.insert(k, v);
        }
        map
    }

    /// Builds a [`HashMap`] from explicit `(key, value)` extractors.
    #[must_use]
    pub fn build_hash_map<K, W, KF, VF>(self, mut key: KF, mut value: VF) -> HashMap<K, W>
    where
        K: Hash + Eq + Clone,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> W,
    {
        let mut map = HashMap::new();
        let mut seq = self;
        while let Some(v) = seq.pull() {
            let k = key(&v);
            map.insert(k, value(v));
        }
        map
    }

    /// Builds an [`OrderedMap`] from explicit `(key, value)` extractors.
    #[must_use]
    pub fn build_ordered_map<K, W, KF, VF>(self, mut key: KF, mut value: VF) -> OrderedMap<K, W>
    where
        K: Ord + Clone,
        KF: FnMut(&T) -> K,
        VF: FnMut(T) -> W,
    {
        let mut map = OrderedMap::new();
        let mut seq = self;
        while let Some(v) = seq.pull() {
            let k = key(&v);
            map.insert(k, value(v));
        }
        map
    }

    /// Drains into a [`HashSet`].
    #[must_use]
    pub fn to_hash_set(self) -> HashSet<T>
    where
        T: Hash + Eq + Clone,
    {
        HashSet::from_iter(self.to_vec())
    }

    /// Drains into an [`OrderedSet`].
    #[must_use]
    pub fn to_ordered_set(self) -> OrderedSet<T>
    where
        T: Ord + Clone,
    {
        OrderedSet::from_iter(self.to_vec())
    }

    /// Builds a `HashMap<K, Vec<V>>` from explicit key/value extractors,
    /// grouping values sharing a key (the named-field counterpart of
    /// [`to_lookup`](Self::to_lookup)).
    #[must_use]
    pub fn to_lookup_map<K, W, KF, VF>(mut self, mut key: KF, mut value: VF) -> HashMap<K, Vec<W>>
    where
        K: Hash + Eq + Clone,
        W: Clone,
        KF: FnMut(&T) -> K,
        VF: FnMut(&T) -> W,
    {
        let mut map = HashMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            let w = value(&v);
            map.alter(&k, |existing| {
                let mut bucket = existing.cloned().unwrap_or_default();
                bucket.push(w.clone());
                Some(bucket)
            });
        }
        map
    }

    /// The ordered-map counterpart of
    /// [`to_lookup_map`](Self::to_lookup_map).
    #[must_use]
    pub fn to_lookup_ordered_map<K, W, KF, VF>(mut self, mut key: KF, mut value: VF) -> OrderedMap<K, Vec<W>>
    where
        K: Ord + Clone,
        W: Clone,
        KF: FnMut(&T) -> K,
        VF: FnMut(&T) -> W,
    {
        let mut map = OrderedMap::new();
        while let Some(v) = self.pull() {
            let k = key(&v);
            let w = value(&v);
            map.alter(&k, |existing| {
                let mut bucket = existing.cloned().unwrap_or_default();
                bucket.push(w.clone());
                Some(bucket)
            });
        }
        map
    }

    /// `to_hash_map` specialized for `String` keys — the "plain object"
    /// shape from the distilled spec.
    #[must_use]
    pub fn to_object<F>(self, key: F) -> HashMap<String, T>
    where
        T: Clone,
        F: FnMut(&T) -> String,
    {
        self.to_hash_map(key)
    }

    /// Rebuilds the sequence through an arbitrary whole-sequence
    /// transformation, e.g. swapping in a differently-staged pipeline.
    #[must_use]
    pub fn transform<U: 'static, F: FnOnce(Self) -> LazySeq<U>>(self, f: F) -> LazySeq<U> {
        f(self)
    }
}

impl<T: 'static> Iterator for LazySeq<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.pull()
    }
}
