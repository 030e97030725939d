//! Two-tree set algebra: walks `Branch`×`Branch` pairs in lockstep,
//! splicing unmatched children straight into the result without visiting
//! them; everything else (a `Leaf` or `Collision` meeting any shape, on
//! either side) folds the smaller side's entries into the larger one via
//! [`crate::hamt::alter::alter`]. `union`/`intersection` additionally track
//! how many keys were present on both sides.

use std::hash::Hash;
use std::rc::Rc;

use super::alter::alter;
use super::get::get_recursive;
use super::iter::collect_entries;
use super::node::{BITS_PER_LEVEL, Node};

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// `A ∪ B`, applying `merge(key, a_value, b_value)` where both sides have
/// `key`. Increments `*intersection_count` once per such key.
pub fn union<K, V, F>(a: &Link<K, V>, b: &Link<K, V>, merge: &mut F, intersection_count: &mut usize) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    match (a, b) {
        (None, _) => b.clone(),
        (_, None) => a.clone(),
        (Some(an), Some(bn)) => Some(union_nodes(an, bn, 0, merge, intersection_count)),
    }
}

fn union_nodes<K, V, F>(
    a: &Rc<Node<K, V>>,
    b: &Rc<Node<K, V>>,
    shift: u32,
    merge: &mut F,
    count: &mut usize,
) -> Rc<Node<K, V>>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    if let (Node::Branch { bitmap: ba, children: ca }, Node::Branch { bitmap: bb, children: cb }) =
        (a.as_ref(), b.as_ref())
    {
        let new_bitmap = ba | bb;
        let mut new_children = Vec::with_capacity(new_bitmap.count_ones() as usize);
        let mut same_as_a = *ba == new_bitmap;
        let mut same_as_b = *bb == new_bitmap;
        let (mut ia, mut ib) = (0usize, 0usize);
        for slot in 0..32u32 {
            let bit = 1u32 << slot;
            if new_bitmap & bit == 0 {
                continue;
            }
            let in_a = ba & bit != 0;
            let in_b = bb & bit != 0;
            let child = if in_a && in_b {
                let ca_child = &ca[ia];
                let cb_child = &cb[ib];
                ia += 1;
                ib += 1;
                let merged = union_nodes(ca_child, cb_child, shift + BITS_PER_LEVEL, merge, count);
                if !Rc::ptr_eq(&merged, ca_child) {
                    same_as_a = false;
                }
                if !Rc::ptr_eq(&merged, cb_child) {
                    same_as_b = false;
                }
                merged
            } else if in_a {
                same_as_b = false;
                let c = ca[ia].clone();
                ia += 1;
                c
            } else {
                same_as_a = false;
                let c = cb[ib].clone();
                ib += 1;
                c
            };
            new_children.push(child);
        }
        if same_as_a {
            return a.clone();
        }
        if same_as_b {
            return b.clone();
        }
        return Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children });
    }
    union_fallback(a, b, merge, count)
}

fn union_fallback<K, V, F>(a: &Rc<Node<K, V>>, b: &Rc<Node<K, V>>, merge: &mut F, count: &mut usize) -> Rc<Node<K, V>>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    let mut root = Some(a.clone());
    for (hash, key, value) in collect_entries(b) {
        root = alter(root, hash, &key, |existing| match existing {
            Some(av) => {
                *count += 1;
                Some(merge(&key, av, &value))
            }
            None => Some(value.clone()),
        })
        .node;
    }
    root.expect("folding into a non-empty root never empties it")
}

/// `A ∩ B`, applying `merge(key, a_value, b_value)`. `*count` receives the
/// number of keys kept (equivalently, the result's size).
pub fn intersection<K, V, F>(a: &Link<K, V>, b: &Link<K, V>, merge: &mut F, count: &mut usize) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    let (Some(an), Some(bn)) = (a, b) else { return None };
    intersection_nodes(an, bn, 0, merge, count)
}

fn intersection_nodes<K, V, F>(
    a: &Rc<Node<K, V>>,
    b: &Rc<Node<K, V>>,
    shift: u32,
    merge: &mut F,
    count: &mut usize,
) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    if let (Node::Branch { bitmap: ba, children: ca }, Node::Branch { bitmap: bb, children: cb }) =
        (a.as_ref(), b.as_ref())
    {
        let common = ba & bb;
        if common == 0 {
            return None;
        }
        let mut new_bitmap = 0u32;
        let mut new_children = Vec::new();
        let (mut ia, mut ib) = (0usize, 0usize);
        for slot in 0..32u32 {
            let bit = 1u32 << slot;
            let in_a = ba & bit != 0;
            let in_b = bb & bit != 0;
            if in_a && in_b {
                let child = intersection_nodes(&ca[ia], &cb[ib], shift + BITS_PER_LEVEL, merge, count);
                if let Some(c) = child {
                    new_bitmap |= bit;
                    new_children.push(c);
                }
            }
            if in_a {
                ia += 1;
            }
            if in_b {
                ib += 1;
            }
        }
        return match new_children.len() {
            0 => None,
            1 => Some(new_children.into_iter().next().expect("checked len == 1")),
            _ => Some(Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children })),
        };
    }
    intersection_fallback(a, b, merge, count)
}

fn intersection_fallback<K, V, F>(a: &Rc<Node<K, V>>, b: &Rc<Node<K, V>>, merge: &mut F, count: &mut usize) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    let mut root = None;
    for (hash, key, b_value) in collect_entries(b) {
        if let Some(a_value) = get_recursive(a, hash, &key, 0) {
            *count += 1;
            let merged = merge(&key, a_value, &b_value);
            root = alter(root, hash, &key, |_| Some(merged)).node;
        }
    }
    root
}

/// `A \ B`: every key of `A` that is not present in `B`.
pub fn difference<K, V>(a: &Link<K, V>, b: &Link<K, V>) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone,
{
    match (a, b) {
        (None, _) => None,
        (_, None) => a.clone(),
        (Some(an), Some(bn)) => difference_nodes(an, bn, 0),
    }
}

fn difference_nodes<K, V>(a: &Rc<Node<K, V>>, b: &Rc<Node<K, V>>, shift: u32) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone,
{
    if let (Node::Branch { bitmap: ba, children: ca }, Node::Branch { bitmap: bb, children: cb }) =
        (a.as_ref(), b.as_ref())
    {
        if ba & bb == 0 {
            return Some(a.clone());
        }
        let mut new_bitmap = 0u32;
        let mut new_children = Vec::new();
        let (mut ia, mut ib) = (0usize, 0usize);
        for slot in 0..32u32 {
            let bit = 1u32 << slot;
            let in_a = ba & bit != 0;
            let in_b = bb & bit != 0;
            if in_a && in_b {
                if let Some(c) = difference_nodes(&ca[ia], &cb[ib], shift + BITS_PER_LEVEL) {
                    new_bitmap |= bit;
                    new_children.push(c);
                }
            } else if in_a {
                new_bitmap |= bit;
                new_children.push(ca[ia].clone());
            }
            if in_a {
                ia += 1;
            }
            if in_b {
                ib += 1;
            }
        }
        return match new_children.len() {
            0 => None,
            1 => Some(new_children.into_iter().next().expect("checked len == 1")),
            _ => Some(Rc::new(Node::Branch { bitmap: new_bitmap, children: new_children })),
        };
    }
    difference_fallback(a, b)
}

fn difference_fallback<K, V>(a: &Rc<Node<K, V>>, b: &Rc<Node<K, V>>) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone,
{
    let mut root = Some(a.clone());
    for (hash, key, _) in collect_entries(b) {
        root = alter(root, hash, &key, |_| None).node;
    }
    root
}

/// For every key in `helper`, applies `f(a's current value, helper's
/// value, key)` and installs or deletes per the result. Implemented as `m`
/// sequential [`alter`] calls (`O(m log n)`) rather than a single joint
/// pass — see `DESIGN.md`.
pub fn adjust<K, V, W, F>(a: &Link<K, V>, helper: &Link<K, W>, f: &mut F) -> Link<K, V>
where
    K: Hash + Eq + Ord + Clone,
    V: Clone + PartialEq,
    W: Clone,
    F: FnMut(Option<&V>, &W, &K) -> Option<V>,
{
    let Some(helper_root) = helper else { return a.clone() };
    let mut root = a.clone();
    for (hash, key, helper_value) in collect_entries(helper_root) {
        let existing = get_recursive_root(&root, hash, &key);
        let replacement = f(existing, &helper_value, &key);
        root = alter(root, hash, &key, |_| replacement).node;
    }
    root
}

fn get_recursive_root<'a, K, V>(root: &'a Link<K, V>, hash: u64, key: &K) -> Option<&'a V>
where
    K: Eq + Ord,
{
    get_recursive(root.as_ref()?, hash, key, 0)
}
