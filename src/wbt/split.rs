//! Split around a pivot key, and predicate-based partition.

use std::cmp::Ordering;
use std::rc::Rc;

use super::balance::{link, link2};
use super::iter::iterate_asc;
use super::node::Node;

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Splits `tree` around `key` in `O(log n)`: everything `< key` goes left,
/// everything `> key` goes right, and the value at `key` (if present) is
/// returned separately.
#[must_use]
pub fn split<K, V>(tree: &Link<K, V>, key: &K) -> (Link<K, V>, Option<V>, Link<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let Some(n) = tree else {
        return (None, None, None);
    };
    match key.cmp(&n.key) {
        Ordering::Less => {
            let (lt, found, gt) = split(&n.left, key);
            (lt, found, Some(link(n.key.clone(), n.value.clone(), gt, n.right.clone())))
        }
        Ordering::Greater => {
            let (lt, found, gt) = split(&n.right, key);
            (Some(link(n.key.clone(), n.value.clone(), n.left.clone(), lt)), found, gt)
        }
        Ordering::Equal => (n.left.clone(), Some(n.value.clone()), n.right.clone()),
    }
}

/// Splits `tree` into `(matching pred, not matching pred)` in `O(n)`.
///
/// When every entry falls on one side, the non-empty side is returned as
/// the exact same allocation as `tree` (no rebuild, no extra clones).
#[must_use]
pub fn partition<K, V>(tree: &Link<K, V>, mut pred: impl FnMut(&K, &V) -> bool) -> (Link<K, V>, Link<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let Some(_) = tree else {
        return (None, None);
    };
    if iterate_asc(tree).all(|(k, v)| pred(k, v)) {
        return (tree.clone(), None);
    }
    if iterate_asc(tree).all(|(k, v)| !pred(k, v)) {
        return (None, tree.clone());
    }
    partition_rebuild(tree, &mut pred)
}

fn partition_rebuild<K, V>(
    tree: &Link<K, V>,
    pred: &mut impl FnMut(&K, &V) -> bool,
) -> (Link<K, V>, Link<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let Some(n) = tree else {
        return (None, None);
    };
    let (l_true, l_false) = partition_rebuild(&n.left, pred);
    let (r_true, r_false) = partition_rebuild(&n.right, pred);
    if pred(&n.key, &n.value) {
        (
            Some(link(n.key.clone(), n.value.clone(), l_true, r_true)),
            link2(l_false, r_false),
        )
    } else {
        (
            link2(l_true, r_true),
            Some(link(n.key.clone(), n.value.clone(), l_false, r_false)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::alter::alter;
    use super::*;

    fn build(items: &[(i32, i32)]) -> Link<i32, i32> {
        let mut tree = None;
        for &(k, v) in items {
            tree = alter(tree, &k, |_| Some(v)).node;
        }
        tree
    }

    #[test]
    fn split_partitions_by_key() {
        let tree = build(&[(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]);
        let (below, present, above) = split(&tree, &3);
        assert_eq!(present, Some(3));
        assert_eq!(iterate_asc(&below).map(|(k, _)| *k).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(iterate_asc(&above).map(|(k, _)| *k).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn partition_all_true_reuses_allocation() {
        let tree = build(&[(1, 1), (2, 2)]);
        let (t, f) = partition(&tree, |_, _| true);
        assert!(f.is_none());
        assert!(Rc::ptr_eq(tree.as_ref().unwrap(), t.as_ref().unwrap()));
    }
}
