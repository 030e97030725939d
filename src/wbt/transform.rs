//! Structural rebuilds that preserve key layout (`map_values`) or may drop
//! entries (`collect_values`), both reference-identity-preserving on a
//! no-change result.

use std::rc::Rc;

use super::balance::{link, link2};
use super::combine::same_link;
use super::node::{self, Node};

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Replaces every value via `f`, keeping the tree's key layout (and thus
/// its balance) unchanged. Returns `tree` unchanged when every produced
/// value equals the old one.
pub fn map_values<K, V, F>(tree: &Link<K, V>, f: &mut F) -> Link<K, V>
where
    K: Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> V,
{
    let Some(n) = tree else { return None };
    let new_left = map_values(&n.left, f);
    let new_value = f(&n.key, &n.value);
    let new_right = map_values(&n.right, f);
    if same_link(&new_left, &n.left) && new_value == n.value && same_link(&new_right, &n.right) {
        Some(n.clone())
    } else {
        Some(node::bin(n.key.clone(), new_value, new_left, new_right))
    }
}

/// Filter+map in one pass: `f` returns `None` to drop an entry or
/// `Some(new_value)` to keep it (possibly transformed). Returns `tree`
/// unchanged when nothing was dropped or transformed.
pub fn collect_values<K, V, F>(tree: &Link<K, V>, f: &mut F) -> Link<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> Option<V>,
{
    let Some(n) = tree else { return None };
    let new_left = collect_values(&n.left, f);
    let kept = f(&n.key, &n.value);
    let new_right = collect_values(&n.right, f);
    match kept {
        Some(new_value) => {
            if same_link(&new_left, &n.left) && same_link(&new_right, &n.right) && new_value == n.value
            {
                Some(n.clone())
            } else {
                Some(link(n.key.clone(), new_value, new_left, new_right))
            }
        }
        None => link2(new_left, new_right),
    }
}
