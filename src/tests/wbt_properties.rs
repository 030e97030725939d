//! Weight-balanced-tree quantified invariants (spec.md §8, items 1-16),
//! checked against the `OrderedMap`/`OrderedSet` façade and, for the shape
//! invariants, the `wbt` engine directly.

use std::collections::BTreeMap;
use std::rc::Rc;

use proptest::prelude::*;

use crate::wbt::{self, Node};
use crate::{OrderedMap, OrderedSet};

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

fn apply(map: &mut OrderedMap<i32, i32>, model: &mut BTreeMap<i32, i32>, op: &Op) {
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

type Link = Option<Rc<Node<i32, i32>>>;

fn check_balanced(tree: &Link) -> usize {
    let Some(n) = tree else { return 0 };
    let left_size = check_balanced(&n.left);
    let right_size = check_balanced(&n.right);
    assert!(wbt::node::is_balanced(n.left.as_ref(), n.right.as_ref()));
    assert_eq!(n.size, 1 + left_size + right_size);
    n.size
}

proptest! {
    /// Invariant 1: `empty.set(k, v).get(k) = v`, `size = 1`.
    #[test]
    fn set_on_empty_has_size_one(k: i32, v: i32) {
        let mut m = OrderedMap::new();
        m.insert(k, v);
        prop_assert_eq!(m.get(&k), Some(&v));
        prop_assert_eq!(m.len(), 1);
    }

    /// Invariants 2-4, 18: a random op sequence tracks a `BTreeMap` model
    /// exactly, including ordered iteration (invariant 14).
    #[test]
    fn matches_btreemap_model(ops in ops_strategy()) {
        let mut map = OrderedMap::new();
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut map, &mut model, op);
        }
        prop_assert_eq!(map.len(), model.len());
        let ascending: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(i32, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(ascending, expected);
    }

    /// Invariant 14: ascending iteration is strictly increasing;
    /// `iter_desc` is the exact reverse of `iter`.
    #[test]
    fn ordered_iteration_is_sorted_and_reversible(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..100)) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        let asc: Vec<i32> = m.iter().map(|(k, _)| *k).collect();
        for w in asc.windows(2) {
            prop_assert!(w[0] < w[1]);
        }
        let desc: Vec<i32> = m.iter_desc().map(|(k, _)| *k).collect();
        let mut reversed = asc.clone();
        reversed.reverse();
        prop_assert_eq!(desc, reversed);
    }

    /// Invariant 15: `split(k)` partitions a map into everything below,
    /// the value at `k` if present, and everything above, and reassembling
    /// the three pieces reproduces the original contents.
    #[test]
    fn split_partitions_and_reassembles(
        entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..100),
        pivot in -40_i32..40,
    ) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        let (below, found, above) = m.split(&pivot);
        prop_assert!(below.iter().all(|(k, _)| *k < pivot));
        prop_assert!(above.iter().all(|(k, _)| *k > pivot));
        prop_assert_eq!(found, m.get(&pivot).copied());

        let mut reassembled = below.union(&above, |_, a, _| *a);
        if let Some(v) = found {
            reassembled.insert(pivot, v);
        }
        prop_assert_eq!(reassembled, m);
    }

    /// Invariant 7: union with empty is the identity by contents.
    #[test]
    fn union_with_empty_is_identity(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        let u = m.union(&OrderedMap::new(), |_, _, b| *b);
        prop_assert_eq!(u, m);
    }

    /// Invariant 8: union with self is idempotent by contents.
    #[test]
    fn union_is_idempotent(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        let u = m.union(&m, |_, a, _| *a);
        prop_assert_eq!(u, m);
    }

    /// Invariant 9: intersection with empty is empty.
    #[test]
    fn intersection_with_empty_is_empty(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        let i = m.intersection(&OrderedMap::new(), |_, a, _| *a);
        prop_assert!(i.is_empty());
    }

    /// Invariant 10: difference with self is empty; difference with empty
    /// is unchanged by contents.
    #[test]
    fn difference_self_and_empty(entries in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50)) {
        let m: OrderedMap<i32, i32> = entries.into_iter().collect();
        prop_assert!(m.difference(&m).is_empty());
        prop_assert_eq!(m.difference(&OrderedMap::new()), m);
    }

    /// Invariant 11: `(A ∪ B) \ B.keySet() == A \ B.keySet()` by contents.
    #[test]
    fn de_morgan_like(
        a in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
        b in prop::collection::vec((-40_i32..40, any::<i32>()), 0..50),
    ) {
        let a: OrderedMap<i32, i32> = a.into_iter().collect();
        let b: OrderedMap<i32, i32> = b.into_iter().collect();
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
        let a: OrderedMap<i32, i32> = a.into_iter().collect();
        let b: OrderedMap<i32, i32> = b.into_iter().collect();
        let sym = a.symmetric_difference(&b);
        let expected = a.without_keys(&b.key_set()).key_set().union(&b.without_keys(&a.key_set()).key_set());
        prop_assert_eq!(sym, expected);
    }

    /// Invariant 5/6 at the engine level: setting an equal value, or
    /// deleting a missing key, leaves the exact same allocation in place.
    #[test]
    fn idempotent_set_and_missing_delete_are_identity(entries in prop::collection::vec((-40_i32..40, i32::MIN..i32::MAX), 1..50)) {
        let mut tree: Link = None;
        for &(k, v) in &entries {
            tree = wbt::alter::alter(tree, &k, |_| Some(v)).node;
        }
        let (k, v) = entries[0];
        let out = wbt::alter::alter(tree.clone(), &k, |_| Some(v));
        prop_assert!(out.unchanged);
        prop_assert!(Rc::ptr_eq(tree.as_ref().unwrap(), out.node.as_ref().unwrap()));

        let absent = entries.iter().map(|(k, _)| *k).max().unwrap() + 1000;
        let out = wbt::alter::alter(tree.clone(), &absent, |v| v.copied());
        prop_assert!(out.unchanged);
        prop_assert!(Rc::ptr_eq(tree.as_ref().unwrap(), out.node.as_ref().unwrap()));
    }

    /// Invariant 16: after every op, the weight-balance invariant holds at
    /// every node and cached sizes match actual subtree counts.
    #[test]
    fn balance_invariant_holds_after_random_ops(ops in ops_strategy()) {
        let mut tree: Link = None;
        let mut expected_len = 0usize;
        for op in &ops {
            match *op {
                Op::Set(k, v) => {
                    let out = wbt::alter::alter(tree, &k, |_| Some(v));
                    expected_len = (expected_len as i64 + i64::from(out.size_delta)) as usize;
                    tree = out.node;
                }
                Op::Delete(k) => {
                    let out = wbt::alter::alter(tree, &k, |_| None);
                    expected_len = (expected_len as i64 + i64::from(out.size_delta)) as usize;
                    tree = out.node;
                }
            }
        }
        prop_assert_eq!(check_balanced(&tree), expected_len);
    }
}

#[test]
fn ordered_set_mirrors_map_key_set_semantics() {
    let a: OrderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
    let b: OrderedSet<i32> = [3, 4, 5, 6].into_iter().collect();
    assert_eq!(a.union(&b).len(), 6);
    assert_eq!(a.intersection(&b).len(), 2);
}
