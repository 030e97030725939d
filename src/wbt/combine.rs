//! Hedge-union-style two-tree algorithms: split one side around the other's
//! pivot and recurse, `link`-ing or `link2`-ing the results back together.
//! `O(m log(n/m))` for `union`/`intersection`/`difference`, `O(n+m)` for
//! `adjust`.

use std::rc::Rc;

use super::balance::{link, link2};
use super::node::Node;
use super::split::split;

type Link<K, V> = Option<Rc<Node<K, V>>>;

pub(crate) fn same_link<K, V>(a: &Link<K, V>, b: &Link<K, V>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

/// Merges `a` and `b`, applying `merge(key, a_value, b_value)` for keys
/// present in both. Returns `a` unchanged (by `Rc` identity) when nothing
/// from `b` actually changed the result.
pub fn union<K, V, F>(a: &Link<K, V>, b: &Link<K, V>, merge: &mut F) -> Link<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    let (Some(an), Some(_)) = (a, b) else {
        return if a.is_none() { b.clone() } else { a.clone() };
    };
    let (below_b, present_b, above_b) = split(b, &an.key);
    let new_left = union(&an.left, &below_b, merge);
    let new_right = union(&an.right, &above_b, merge);
    let new_value = present_b.map_or_else(|| an.value.clone(), |bv| merge(&an.key, &an.value, &bv));

    if same_link(&new_left, &an.left) && same_link(&new_right, &an.right) && new_value == an.value {
        return a.clone();
    }
    Some(link(an.key.clone(), new_value, new_left, new_right))
}

/// Keeps only keys present in both trees, applying `merge` to combine
/// values. Returns `a` unchanged when every entry of `a` survives with an
/// unchanged value and both children were untouched.
pub fn intersection<K, V, F>(a: &Link<K, V>, b: &Link<K, V>, merge: &mut F) -> Link<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V, &V) -> V,
{
    let (Some(an), Some(_)) = (a, b) else {
        return None;
    };
    let (below_b, present_b, above_b) = split(b, &an.key);
    let new_left = intersection(&an.left, &below_b, merge);
    let new_right = intersection(&an.right, &above_b, merge);

    match present_b {
        Some(bv) => {
            let new_value = merge(&an.key, &an.value, &bv);
            if same_link(&new_left, &an.left)
                && same_link(&new_right, &an.right)
                && new_value == an.value
            {
                return a.clone();
            }
            Some(link(an.key.clone(), new_value, new_left, new_right))
        }
        None => link2(new_left, new_right),
    }
}

/// Removes every key of `a` that is also present in `b`.
///
/// `a.difference(&empty) === a` by `Rc` identity (checked as a base case);
/// deeper structural sharing is best-effort since the hedge split
/// necessarily rebuilds the path down to `b`'s pivots.
pub fn difference<K, V>(a: &Link<K, V>, b: &Link<K, V>) -> Link<K, V>
where
    K: Ord + Clone,
    V: Clone,
{
    let (Some(_), Some(bn)) = (a, b) else {
        return if b.is_none() { a.clone() } else { None };
    };
    let (below_a, _, above_a) = split(a, &bn.key);
    let new_left = difference(&below_a, &bn.left);
    let new_right = difference(&above_a, &bn.right);
    link2(new_left, new_right)
}

/// A single joint pass over `a` and `helper`: for every key in `helper`,
/// calls `f(a's current value at that key, helper's value, key)` and
/// installs or deletes per the result. `O(n+m)`.
pub fn adjust<K, V, W, F>(a: &Link<K, V>, helper: &Link<K, W>, f: &mut F) -> Link<K, V>
where
    K: Ord + Clone,
    V: Clone,
    W: Clone,
    F: FnMut(Option<&V>, &W, &K) -> Option<V>,
{
    let Some(hn) = helper else {
        return a.clone();
    };
    let (below_a, present_a, above_a) = split(a, &hn.key);
    let new_left = adjust(&below_a, &hn.left, f);
    let new_right = adjust(&above_a, &hn.right, f);
    match f(present_a.as_ref(), &hn.value, &hn.key) {
        Some(v) => Some(link(hn.key.clone(), v, new_left, new_right)),
        None => link2(new_left, new_right),
    }
}

#[cfg(test)]
mod tests {
    use super::super::alter::alter;
    use super::super::iter::iterate_asc;
    use super::*;

    fn build(items: &[i32]) -> Link<i32, i32> {
        let mut tree = None;
        for &k in items {
            tree = alter(tree, &k, |_| Some(k)).node;
        }
        tree
    }

    fn keys(tree: &Link<i32, i32>) -> Vec<i32> {
        iterate_asc(tree).map(|(k, _)| *k).collect()
    }

    #[test]
    fn union_merges_keys() {
        let a = build(&[1, 2, 3, 4]);
        let b = build(&[3, 4, 5, 6]);
        let u = union(&a, &b, &mut |_, x, _| *x);
        assert_eq!(keys(&u), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn intersection_keeps_common_keys() {
        let a = build(&[1, 2, 3, 4]);
        let b = build(&[3, 4, 5, 6]);
        let i = intersection(&a, &b, &mut |_, x, _| *x);
        assert_eq!(keys(&i), vec![3, 4]);
    }

    #[test]
    fn difference_removes_keys_in_b() {
        let a = build(&[1, 2, 3, 4]);
        let b = build(&[3, 4, 5, 6]);
        let d = difference(&a, &b);
        assert_eq!(keys(&d), vec![1, 2]);
    }

    #[test]
    fn difference_with_empty_is_identity() {
        let a = build(&[1, 2, 3]);
        let d = difference(&a, &None);
        assert!(Rc::ptr_eq(a.as_ref().unwrap(), d.as_ref().unwrap()));
    }

    #[test]
    fn union_with_empty_is_identity() {
        let a = build(&[1, 2, 3]);
        let u = union(&a, &None, &mut |_, x, _| *x);
        assert!(Rc::ptr_eq(a.as_ref().unwrap(), u.as_ref().unwrap()));
    }
}
