//! Combined insert/modify/delete with reference-identity short-circuiting,
//! and the helper that splits two colliding entries into a fresh subtree.

use std::hash::Hash;
use std::rc::Rc;

use super::node::{self, BITS_PER_LEVEL, MAX_SHIFT, Node};
use crate::wbt;

/// Outcome of [`alter`].
pub struct AlterOutcome<K, V> {
    /// New root of the (sub)tree.
    pub node: Option<Rc<Node<K, V>>>,
    /// The value present before the call, if any.
    pub old_value: Option<V>,
    /// `+1` inserted, `-1` deleted, `0` updated or no-op.
    pub size_delta: i32,
    /// `true` when `node` is the same allocation as the input.
    pub unchanged: bool,
}

/// Applies `f` to the value (if any) stored under `key`, whose hash is
/// `hash`. See [`crate::wbt::alter::alter`] for the exact `f` contract —
/// identical here.
pub fn alter<K, V>(
    root: Option<Rc<Node<K, V>>>,
    hash: u64,
    key: &K,
    f: impl FnOnce(Option<&V>) -> Option<V>,
) -> AlterOutcome<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
{
    match root {
        None => match f(None) {
            None => AlterOutcome { node: None, old_value: None, size_delta: 0, unchanged: true },
            Some(v) => AlterOutcome {
                node: Some(Rc::new(Node::Leaf { hash, key: key.clone(), value: v })),
                old_value: None,
                size_delta: 1,
                unchanged: false,
            },
        },
        Some(n) => alter_node(&n, hash, key, 0, f),
    }
}

fn alter_node<K, V>(
    n: &Rc<Node<K, V>>,
    hash: u64,
    key: &K,
    shift: u32,
    f: impl FnOnce(Option<&V>) -> Option<V>,
) -> AlterOutcome<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
{
    match n.as_ref() {
        Node::Leaf { hash: lh, key: lk, value } => {
            if *lh == hash && lk == key {
                match f(Some(value)) {
                    Some(new_v) if new_v == *value => unchanged(n.clone(), Some(value.clone())),
                    Some(new_v) => changed(
                        Some(Rc::new(Node::Leaf { hash, key: key.clone(), value: new_v })),
                        0,
                        Some(value.clone()),
                    ),
                    None => changed(None, -1, Some(value.clone())),
                }
            } else {
                match f(None) {
                    None => unchanged(n.clone(), None),
                    Some(new_v) => {
                        let subtree = make_subtree(
                            (*lh, lk.clone(), value.clone()),
                            (hash, key.clone(), new_v),
                            shift + BITS_PER_LEVEL,
                        );
                        changed(Some(subtree), 1, None)
                    }
                }
            }
        }
        Node::Branch { bitmap, children } => {
            let frag = node::fragment(hash, shift);
            let bit = node::mask(frag);
            if bitmap & bit != 0 {
                let pos = node::index(*bitmap, bit);
                let child = alter_node(&children[pos], hash, key, shift + BITS_PER_LEVEL, f);
                if child.unchanged {
                    return unchanged(n.clone(), child.old_value);
                }
                match child.node {
                    Some(new_child) => {
                        let mut new_children = children.clone();
                        new_children[pos] = new_child;
                        changed(
                            Some(Rc::new(Node::Branch { bitmap: *bitmap, children: new_children })),
                            child.size_delta,
                            child.old_value,
                        )
                    }
                    None => {
                        let new_bitmap = bitmap & !bit;
                        if new_bitmap == 0 {
                            return changed(None, child.size_delta, child.old_value);
                        }
                        let mut new_children = children.clone();
                        new_children.remove(pos);
                        let new_node = if new_children.len() == 1 {
                            new_children.into_iter().next().expect("checked len == 1")
                        } else {
                            Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children })
                        };
                        changed(Some(new_node), child.size_delta, child.old_value)
                    }
                }
            } else {
                match f(None) {
                    None => unchanged(n.clone(), None),
                    Some(new_v) => {
                        let new_bitmap = bitmap | bit;
                        let pos = node::index(new_bitmap, bit);
                        let mut new_children = children.clone();
                        new_children.insert(pos, Rc::new(Node::Leaf { hash, key: key.clone(), value: new_v }));
                        changed(
                            Some(Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children })),
                            1,
                            None,
                        )
                    }
                }
            }
        }
        Node::Collision { hash: ch, entries } => {
            debug_assert_eq!(hash, *ch, "collision bucket reached with mismatched hash prefix");
            let outcome = wbt::alter::alter(Some(entries.clone()), key, f);
            if outcome.unchanged {
                return unchanged(n.clone(), outcome.old_value);
            }
            match outcome.node {
                Some(bucket) if bucket.size >= 2 => changed(
                    Some(Rc::new(Node::Collision { hash: *ch, entries: bucket })),
                    outcome.size_delta,
                    outcome.old_value,
                ),
                Some(bucket) => changed(
                    Some(Rc::new(Node::Leaf { hash: *ch, key: bucket.key.clone(), value: bucket.value.clone() })),
                    outcome.size_delta,
                    outcome.old_value,
                ),
                None => unreachable!("collision bucket invariant requires >= 2 entries"),
            }
        }
    }
}

fn unchanged<K, V>(node: Rc<Node<K, V>>, old_value: Option<V>) -> AlterOutcome<K, V> {
    AlterOutcome { node: Some(node), old_value, size_delta: 0, unchanged: true }
}

fn changed<K, V>(node: Option<Rc<Node<K, V>>>, size_delta: i32, old_value: Option<V>) -> AlterOutcome<K, V> {
    AlterOutcome { node, old_value, size_delta, unchanged: false }
}

/// Splits two entries that collide at the current depth into a fresh
/// subtree, recursing until their hash fragments diverge or the hash space
/// is exhausted (at which point a [`Node::Collision`] bucket takes over).
fn make_subtree<K, V>(e1: (u64, K, V), e2: (u64, K, V), shift: u32) -> Rc<Node<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    if shift > MAX_SHIFT {
        let (h1, k1, v1) = e1;
        let (_, k2, v2) = e2;
        let mut bucket = wbt::alter::alter(None, &k1, |_| Some(v1)).node;
        bucket = wbt::alter::alter(bucket, &k2, |_| Some(v2)).node;
        return Rc::new(Node::Collision { hash: h1, entries: bucket.expect("two inserts") });
    }

    let f1 = node::fragment(e1.0, shift);
    let f2 = node::fragment(e2.0, shift);

    if f1 == f2 {
        let child = make_subtree(e1, e2, shift + BITS_PER_LEVEL);
        Rc::new(Node::Branch { bitmap: node::mask(f1), children: vec![child] })
    } else {
        let leaf1 = Rc::new(Node::Leaf { hash: e1.0, key: e1.1, value: e1.2 });
        let leaf2 = Rc::new(Node::Leaf { hash: e2.0, key: e2.1, value: e2.2 });
        let bitmap = node::mask(f1) | node::mask(f2);
        let children = if f1 < f2 { vec![leaf1, leaf2] } else { vec![leaf2, leaf1] };
        Rc::new(Node::Branch { bitmap, children })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adhash::hash_one;

    fn ins(root: Option<Rc<Node<i32, i32>>>, k: i32, v: i32) -> Option<Rc<Node<i32, i32>>> {
        alter(root, hash_one(&k), &k, |_| Some(v)).node
    }

    #[test]
    fn insert_and_overwrite() {
        let mut root = ins(None, 1, 10);
        root = ins(root, 1, 20);
        let out = alter(root.clone(), hash_one(&1), &1, |v| v.copied());
        assert_eq!(out.old_value, Some(20));
    }

    #[test]
    fn idempotent_set_is_same_allocation() {
        let root = ins(None, 1, 10);
        let out = alter(root.clone(), hash_one(&1), &1, |_| Some(10));
        assert!(out.unchanged);
        assert!(Rc::ptr_eq(root.as_ref().unwrap(), out.node.as_ref().unwrap()));
    }

    #[test]
    fn delete_collapses_branch_to_sibling() {
        let mut root = ins(None, 1, 1);
        root = ins(root, 2, 2);
        let out = alter(root, hash_one(&1), &1, |_| None);
        assert_eq!(out.size_delta, -1);
        let remaining = out.node.unwrap();
        match remaining.as_ref() {
            Node::Leaf { key, .. } => assert_eq!(*key, 2),
            _ => {}
        }
    }

    /// Follows single-child `Branch` links down to the node at the bottom —
    /// identical hashes force every level to route through exactly one
    /// child, so this always bottoms out at the entries' shared `Leaf` or
    /// `Collision` node.
    fn innermost(node: &Rc<Node<i32, &'static str>>) -> &Node<i32, &'static str> {
        match node.as_ref() {
            Node::Branch { children, .. } if children.len() == 1 => innermost(&children[0]),
            other => other,
        }
    }

    /// Three keys forced to the exact same 64-bit hash form one `Collision`
    /// node (the full hash prefix matches at every depth, so the trie
    /// recurses to `MAX_SHIFT` before giving up and bucketing them); removing
    /// two collapses it back to a `Leaf`.
    #[test]
    fn colliding_keys_form_and_collapse_a_collision_node() {
        const SHARED_HASH: u64 = 0x1234_5;
        let mut root = alter(None, SHARED_HASH, &1, |_| Some("first")).node;
        root = alter(root, SHARED_HASH, &2, |_| Some("second")).node;
        root = alter(root, SHARED_HASH, &3, |_| Some("third")).node;
        assert!(matches!(innermost(root.as_ref().unwrap()), Node::Collision { .. }));

        root = alter(root, SHARED_HASH, &1, |_| None).node;
        root = alter(root, SHARED_HASH, &2, |_| None).node;
        match innermost(root.as_ref().unwrap()) {
            Node::Leaf { key, value, .. } => {
                assert_eq!(*key, 3);
                assert_eq!(*value, "third");
            }
            _ => panic!("expected a single Leaf after collapsing the collision bucket"),
        }
    }
}
