//! Min/max views — pop an end of the tree in `O(log n)`.

use std::rc::Rc;

use super::balance::{balance_l, balance_r};
use super::node::Node;

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Returns `(key, value)` of the minimum entry, or `None` if empty.
#[must_use]
pub fn lookup_min<K, V>(tree: &Link<K, V>) -> Option<(&K, &V)> {
    let mut node = tree.as_ref()?;
    loop {
        match &node.left {
            Some(l) => node = l,
            None => return Some((&node.key, &node.value)),
        }
    }
}

/// Returns `(key, value)` of the maximum entry, or `None` if empty.
#[must_use]
pub fn lookup_max<K, V>(tree: &Link<K, V>) -> Option<(&K, &V)> {
    let mut node = tree.as_ref()?;
    loop {
        match &node.right {
            Some(r) => node = r,
            None => return Some((&node.key, &node.value)),
        }
    }
}

/// Removes the minimum entry, returning `(key, value, rest)`.
///
/// # Panics
///
/// Panics if `tree` is empty — callers must check `lookup_min` first, or use
/// [`min_view`] which returns `None` instead.
#[must_use]
pub fn delete_find_min<K, V>(tree: &Rc<Node<K, V>>) -> (K, V, Link<K, V>)
where
    K: Clone,
    V: Clone,
{
    match &tree.left {
        None => (tree.key.clone(), tree.value.clone(), tree.right.clone()),
        Some(l) => {
            let (k, v, l2) = delete_find_min(l);
            (
                k,
                v,
                Some(balance_r(
                    tree.key.clone(),
                    tree.value.clone(),
                    l2,
                    tree.right.clone(),
                )),
            )
        }
    }
}

/// Removes the maximum entry, returning `(key, value, rest)`.
///
/// # Panics
///
/// Panics if `tree` is empty — see [`delete_find_min`].
#[must_use]
pub fn delete_find_max<K, V>(tree: &Rc<Node<K, V>>) -> (K, V, Link<K, V>)
where
    K: Clone,
    V: Clone,
{
    match &tree.right {
        None => (tree.key.clone(), tree.value.clone(), tree.left.clone()),
        Some(r) => {
            let (k, v, r2) = delete_find_max(r);
            (
                k,
                v,
                Some(balance_l(
                    tree.key.clone(),
                    tree.value.clone(),
                    tree.left.clone(),
                    r2,
                )),
            )
        }
    }
}

/// `{ key, value, rest }` view of the minimum entry — `None` if empty.
#[must_use]
pub fn min_view<K, V>(tree: &Link<K, V>) -> Option<(K, V, Link<K, V>)>
where
    K: Clone,
    V: Clone,
{
    tree.as_ref().map(delete_find_min)
}

/// `{ key, value, rest }` view of the maximum entry — `None` if empty.
#[must_use]
pub fn max_view<K, V>(tree: &Link<K, V>) -> Option<(K, V, Link<K, V>)>
where
    K: Clone,
    V: Clone,
{
    tree.as_ref().map(delete_find_max)
}

/// Removes the minimum entry, discarding it. No-op on an empty tree.
#[must_use]
pub fn delete_min<K, V>(tree: &Link<K, V>) -> Link<K, V>
where
    K: Clone,
    V: Clone,
{
    match tree {
        None => None,
        Some(n) => delete_find_min(n).2,
    }
}

/// Removes the maximum entry, discarding it. No-op on an empty tree.
#[must_use]
pub fn delete_max<K, V>(tree: &Link<K, V>) -> Link<K, V>
where
    K: Clone,
    V: Clone,
{
    match tree {
        None => None,
        Some(n) => delete_find_max(n).2,
    }
}
