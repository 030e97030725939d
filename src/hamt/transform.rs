//! Structural rebuilds over the trie, mirroring `wbt::transform` but walking
//! `Branch` children and `Collision` buckets instead of a binary spine.

use std::rc::Rc;

use super::node::Node;
use crate::wbt;

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Replaces every value via `f`, keeping the trie's key layout unchanged.
/// Returns the input unchanged (by `Rc` identity) when every produced value
/// equals the old one.
pub fn map_values<K, V, F>(root: &Link<K, V>, f: &mut F) -> Link<K, V>
where
    K: Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> V,
{
    root.as_ref().map(|n| map_values_node(n, f))
}

fn map_values_node<K, V, F>(node: &Rc<Node<K, V>>, f: &mut F) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> V,
{
    match node.as_ref() {
        Node::Leaf { hash, key, value } => {
            let new_value = f(key, value);
            if new_value == *value {
                node.clone()
            } else {
                Rc::new(Node::Leaf { hash: *hash, key: key.clone(), value: new_value })
            }
        }
        Node::Branch { bitmap, children } => {
            let new_children: Vec<_> = children.iter().map(|c| map_values_node(c, f)).collect();
            if new_children.iter().zip(children).all(|(a, b)| Rc::ptr_eq(a, b)) {
                node.clone()
            } else {
                Rc::new(Node::Branch { bitmap: *bitmap, children: new_children })
            }
        }
        Node::Collision { hash, entries } => {
            let new_entries = map_bucket_values(entries, f);
            if Rc::ptr_eq(&new_entries, entries) {
                node.clone()
            } else {
                Rc::new(Node::Collision { hash: *hash, entries: new_entries })
            }
        }
    }
}

fn map_bucket_values<K, V, F>(node: &Rc<wbt::Node<K, V>>, f: &mut F) -> Rc<wbt::Node<K, V>>
where
    K: Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> V,
{
    let new_left = node.left.as_ref().map(|l| map_bucket_values(l, f));
    let new_value = f(&node.key, &node.value);
    let new_right = node.right.as_ref().map(|r| map_bucket_values(r, f));
    let left_same = match (&new_left, &node.left) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    let right_same = match (&new_right, &node.right) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    };
    if left_same && right_same && new_value == node.value {
        node.clone()
    } else {
        wbt::node::bin(node.key.clone(), new_value, new_left, new_right)
    }
}

/// Filter+map in one pass: `f` returns `None` to drop an entry. Returns the
/// input unchanged (by `Rc` identity) when nothing was dropped or changed.
pub fn collect_values<K, V, F>(root: &Link<K, V>, f: &mut F) -> Link<K, V>
where
    K: Eq + Ord + Clone + std::hash::Hash,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> Option<V>,
{
    let Some(n) = root else { return None };
    let (new_node, changed) = collect_values_node(n, f);
    if changed { new_node } else { Some(n.clone()) }
}

fn collect_values_node<K, V, F>(node: &Rc<Node<K, V>>, f: &mut F) -> (Link<K, V>, bool)
where
    K: Eq + Ord + Clone + std::hash::Hash,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> Option<V>,
{
    match node.as_ref() {
        Node::Leaf { hash, key, value } => match f(key, value) {
            Some(new_value) if new_value == *value => (Some(node.clone()), false),
            Some(new_value) => (Some(Rc::new(Node::Leaf { hash: *hash, key: key.clone(), value: new_value })), true),
            None => (None, true),
        },
        Node::Branch { bitmap, children } => {
            let mut new_bitmap = 0u32;
            let mut new_children = Vec::new();
            let mut any_changed = false;
            let mut bit_iter = (0..32u32).filter(|s| bitmap & (1 << s) != 0);
            for child in children {
                let slot = bit_iter.next().expect("bitmap has one slot per child");
                let (kept, child_changed) = collect_values_node(child, f);
                any_changed |= child_changed;
                if let Some(kept_child) = kept {
                    new_bitmap |= 1 << slot;
                    new_children.push(kept_child);
                }
            }
            match new_children.len() {
                0 => (None, true),
                1 => {
                    let only = new_children.into_iter().next().expect("checked len == 1");
                    if children.len() == 1 && !any_changed {
                        (Some(node.clone()), false)
                    } else {
                        (Some(only), true)
                    }
                }
                _ if any_changed || new_children.len() != children.len() => {
                    (Some(Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children })), true)
                }
                _ => (Some(node.clone()), false),
            }
        }
        Node::Collision { hash, entries } => {
            let new_entries = wbt::transform::collect_values(&Some(entries.clone()), f);
            match new_entries {
                None => (None, true),
                Some(bucket) if bucket.size == 1 => {
                    (Some(Rc::new(Node::Leaf { hash: *hash, key: bucket.key.clone(), value: bucket.value.clone() })), true)
                }
                Some(bucket) => {
                    let changed = !Rc::ptr_eq(&bucket, entries);
                    (Some(Rc::new(Node::Collision { hash: *hash, entries: bucket })), changed)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adhash::hash_one;
    use crate::hamt::alter::alter;
    use crate::hamt::iter::Iter;

    fn build(items: &[i32]) -> Link<i32, i32> {
        let mut root = None;
        for &k in items {
            root = alter(root, hash_one(&k), &k, |_| Some(k)).node;
        }
        root
    }

    fn keys(root: &Link<i32, i32>) -> Vec<i32> {
        let mut v: Vec<_> = Iter::new(root.as_ref()).map(|(k, _)| *k).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn map_values_doubles() {
        let root = build(&[1, 2, 3, 4]);
        let mapped = map_values(&root, &mut |_, v| v * 2);
        let mut vals: Vec<_> = Iter::new(mapped.as_ref()).map(|(_, v)| *v).collect();
        vals.sort_unstable();
        assert_eq!(vals, vec![2, 4, 6, 8]);
    }

    #[test]
    fn collect_values_filters_and_is_identity_when_nothing_changes() {
        let root = build(&[1, 2, 3, 4, 5]);
        let same = collect_values(&root, &mut |_, v| Some(*v));
        assert!(Rc::ptr_eq(root.as_ref().unwrap(), same.as_ref().unwrap()));

        let evens = collect_values(&root, &mut |_, v| if v % 2 == 0 { Some(*v) } else { None });
        assert_eq!(keys(&evens), vec![2, 4]);
    }
}
