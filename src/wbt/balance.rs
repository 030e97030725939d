//! Smart constructors that restore the weight-balance invariant.
//!
//! `balance_l`/`balance_r` repair a node known to be off-balance on the
//! named side by at most one insert/delete. `link`/`link2` build a balanced
//! tree from two arbitrarily-unbalanced trees (the hedge-union workhorses).
//! Ported from the classic weight-balanced-tree algorithm (Adams; as used by
//! Haskell's `Data.Map`), with `δ = 3`, `γ = 2` per the invariant in §3.3.

use std::rc::Rc;

use super::node::{self, DELTA, GAMMA, Node};

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Rebuild assuming `left` may be one insert/delete taller than balanced.
#[must_use]
pub fn balance_l<K, V>(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    let rs = node::size(right.as_ref());
    match &right {
        None => match &left {
            None => node::leaf(key, value),
            Some(ln) if ln.left.is_none() && ln.right.is_none() => {
                node::bin(key, value, left, None)
            }
            Some(ln) if ln.left.is_none() => {
                let lrn = ln.right.as_ref().expect("checked above");
                node::bin(
                    lrn.key.clone(),
                    lrn.value.clone(),
                    Some(node::leaf(ln.key.clone(), ln.value.clone())),
                    Some(node::leaf(key, value)),
                )
            }
            Some(ln) if ln.right.is_none() => node::bin(
                ln.key.clone(),
                ln.value.clone(),
                ln.left.clone(),
                Some(node::leaf(key, value)),
            ),
            Some(ln) => {
                let lls = node::size(ln.left.as_ref());
                let lrn = ln.right.as_ref().expect("checked above");
                if lrn.size < GAMMA * lls {
                    node::bin(
                        ln.key.clone(),
                        ln.value.clone(),
                        ln.left.clone(),
                        Some(node::bin(key, value, Some(lrn.clone()), None)),
                    )
                } else {
                    node::bin(
                        lrn.key.clone(),
                        lrn.value.clone(),
                        Some(node::bin(
                            ln.key.clone(),
                            ln.value.clone(),
                            ln.left.clone(),
                            lrn.left.clone(),
                        )),
                        Some(node::bin(key, value, lrn.right.clone(), None)),
                    )
                }
            }
        },
        Some(_) => match &left {
            None => node::bin(key, value, None, right),
            Some(ln) if ln.size > DELTA * rs => {
                let lls = node::size(ln.left.as_ref());
                let lrs = node::size(ln.right.as_ref());
                if lrs < GAMMA * lls {
                    node::bin(
                        ln.key.clone(),
                        ln.value.clone(),
                        ln.left.clone(),
                        Some(node::bin(key, value, ln.right.clone(), right)),
                    )
                } else {
                    let lrn = ln.right.as_ref().expect("lrs >= gamma*lls > 0");
                    node::bin(
                        lrn.key.clone(),
                        lrn.value.clone(),
                        Some(node::bin(
                            ln.key.clone(),
                            ln.value.clone(),
                            ln.left.clone(),
                            lrn.left.clone(),
                        )),
                        Some(node::bin(key, value, lrn.right.clone(), right)),
                    )
                }
            }
            Some(_) => node::bin(key, value, left, right),
        },
    }
}

/// Rebuild assuming `right` may be one insert/delete taller than balanced.
#[must_use]
pub fn balance_r<K, V>(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    let ls = node::size(left.as_ref());
    match &left {
        None => match &right {
            None => node::leaf(key, value),
            Some(rn) if rn.left.is_none() && rn.right.is_none() => {
                node::bin(key, value, None, right)
            }
            Some(rn) if rn.left.is_none() => node::bin(
                rn.key.clone(),
                rn.value.clone(),
                Some(node::leaf(key, value)),
                rn.right.clone(),
            ),
            Some(rn) if rn.right.is_none() => {
                let rln = rn.left.as_ref().expect("checked above");
                node::bin(
                    rln.key.clone(),
                    rln.value.clone(),
                    Some(node::leaf(key, value)),
                    Some(node::leaf(rn.key.clone(), rn.value.clone())),
                )
            }
            Some(rn) => {
                let rrs = node::size(rn.right.as_ref());
                let rln = rn.left.as_ref().expect("checked above");
                if rln.size < GAMMA * rrs {
                    node::bin(
                        rn.key.clone(),
                        rn.value.clone(),
                        Some(node::bin(key, value, None, Some(rln.clone()))),
                        rn.right.clone(),
                    )
                } else {
                    node::bin(
                        rln.key.clone(),
                        rln.value.clone(),
                        Some(node::bin(key, value, None, rln.left.clone())),
                        Some(node::bin(
                            rn.key.clone(),
                            rn.value.clone(),
                            rln.right.clone(),
                            rn.right.clone(),
                        )),
                    )
                }
            }
        },
        Some(_) => match &right {
            None => node::bin(key, value, left, None),
            Some(rn) if rn.size > DELTA * ls => {
                let rls = node::size(rn.left.as_ref());
                let rrs = node::size(rn.right.as_ref());
                if rls < GAMMA * rrs {
                    node::bin(
                        rn.key.clone(),
                        rn.value.clone(),
                        Some(node::bin(key, value, left, rn.left.clone())),
                        rn.right.clone(),
                    )
                } else {
                    let rln = rn.left.as_ref().expect("rls >= gamma*rrs > 0");
                    node::bin(
                        rln.key.clone(),
                        rln.value.clone(),
                        Some(node::bin(key, value, left, rln.left.clone())),
                        Some(node::bin(
                            rn.key.clone(),
                            rn.value.clone(),
                            rln.right.clone(),
                            rn.right.clone(),
                        )),
                    )
                }
            }
            Some(_) => node::bin(key, value, left, right),
        },
    }
}

/// Builds a balanced tree from a pivot and two trees of arbitrary relative
/// size — the hedge-union workhorse. `O(log n)`.
#[must_use]
pub fn link<K, V>(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    match (&left, &right) {
        (None, _) => insert_min(key, value, right),
        (_, None) => insert_max(key, value, left),
        (Some(ln), Some(rn)) => {
            if DELTA * ln.size < rn.size {
                balance_l(
                    rn.key.clone(),
                    rn.value.clone(),
                    Some(link(key, value, left, rn.left.clone())),
                    rn.right.clone(),
                )
            } else if DELTA * rn.size < ln.size {
                balance_r(
                    ln.key.clone(),
                    ln.value.clone(),
                    ln.left.clone(),
                    Some(link(key, value, ln.right.clone(), right)),
                )
            } else {
                node::bin(key, value, left, right)
            }
        }
    }
}

fn insert_min<K, V>(key: K, value: V, tree: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    match tree {
        None => node::leaf(key, value),
        Some(n) => balance_l(
            n.key.clone(),
            n.value.clone(),
            Some(insert_min(key, value, n.left.clone())),
            n.right.clone(),
        ),
    }
}

fn insert_max<K, V>(key: K, value: V, tree: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    match tree {
        None => node::leaf(key, value),
        Some(n) => balance_r(
            n.key.clone(),
            n.value.clone(),
            n.left.clone(),
            Some(insert_max(key, value, n.right.clone())),
        ),
    }
}

/// Concatenates two trees known to be entirely separated by a missing
/// pivot, by lifting the min/max of the larger side. `O(log n)`.
#[must_use]
pub fn link2<K, V>(left: Link<K, V>, right: Link<K, V>) -> Link<K, V>
where
    K: Clone,
    V: Clone,
{
    match (&left, &right) {
        (None, _) => right,
        (_, None) => left,
        (Some(ln), Some(rn)) => {
            if DELTA * ln.size < rn.size {
                Some(balance_l(
                    rn.key.clone(),
                    rn.value.clone(),
                    link2(left, rn.left.clone()),
                    rn.right.clone(),
                ))
            } else if DELTA * rn.size < ln.size {
                Some(balance_r(
                    ln.key.clone(),
                    ln.value.clone(),
                    ln.left.clone(),
                    link2(ln.right.clone(), right),
                ))
            } else {
                Some(glue(left, right))
            }
        }
    }
}

/// Joins two trees of comparable size with no pivot, by pulling the
/// extremal element of the larger side up to the root.
fn glue<K, V>(left: Link<K, V>, right: Link<K, V>) -> Rc<Node<K, V>>
where
    K: Clone,
    V: Clone,
{
    match (left, right) {
        (None, Some(r)) => r,
        (Some(l), None) => l,
        (Some(l), Some(r)) => {
            if l.size > r.size {
                let (k, v, l2) = super::minmax::delete_find_max(&l);
                balance_r(k, v, l2, Some(r))
            } else {
                let (k, v, r2) = super::minmax::delete_find_min(&r);
                balance_l(k, v, Some(l), r2)
            }
        }
        (None, None) => unreachable!("glue called with both sides empty"),
    }
}
