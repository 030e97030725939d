//! Combined insert/modify/delete with reference-identity short-circuiting.

use std::cmp::Ordering;
use std::rc::Rc;

use super::balance::{balance_l, balance_r, link2};
use super::node::{self, Node};

type Link<K, V> = Option<Rc<Node<K, V>>>;

/// Outcome of [`alter`].
pub struct AlterOutcome<K, V> {
    /// New root of the (sub)tree.
    pub node: Link<K, V>,
    /// The value that was present before the call, if any.
    pub old_value: Option<V>,
    /// `+1` inserted, `-1` deleted, `0` updated or no-op.
    pub size_delta: i32,
    /// `true` when `node` is the exact same allocation as the input —
    /// callers should propagate this upward without rebuilding.
    pub unchanged: bool,
}

/// Applies `f` to the value (if any) stored under `key`.
///
/// `f(None)` may insert by returning `Some`; `f(Some(v))` may delete by
/// returning `None`, update by returning a different value, or leave the
/// tree untouched (by reference) by returning a value equal to `v`.
pub fn alter<K, V>(
    tree: Link<K, V>,
    key: &K,
    f: impl FnOnce(Option<&V>) -> Option<V>,
) -> AlterOutcome<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    match tree {
        None => match f(None) {
            None => AlterOutcome {
                node: None,
                old_value: None,
                size_delta: 0,
                unchanged: true,
            },
            Some(v) => AlterOutcome {
                node: Some(node::leaf(key.clone(), v)),
                old_value: None,
                size_delta: 1,
                unchanged: false,
            },
        },
        Some(n) => alter_node(&n, key, f),
    }
}

fn alter_node<K, V>(
    n: &Rc<Node<K, V>>,
    key: &K,
    f: impl FnOnce(Option<&V>) -> Option<V>,
) -> AlterOutcome<K, V>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    match key.cmp(&n.key) {
        Ordering::Equal => match f(Some(&n.value)) {
            Some(new_v) if new_v == n.value => AlterOutcome {
                node: Some(n.clone()),
                old_value: Some(n.value.clone()),
                size_delta: 0,
                unchanged: true,
            },
            Some(new_v) => AlterOutcome {
                node: Some(node::bin(
                    n.key.clone(),
                    new_v,
                    n.left.clone(),
                    n.right.clone(),
                )),
                old_value: Some(n.value.clone()),
                size_delta: 0,
                unchanged: false,
            },
            None => AlterOutcome {
                node: link2(n.left.clone(), n.right.clone()),
                old_value: Some(n.value.clone()),
                size_delta: -1,
                unchanged: false,
            },
        },
        Ordering::Less => {
            let child = alter(n.left.clone(), key, f);
            if child.unchanged {
                return AlterOutcome {
                    node: Some(n.clone()),
                    old_value: child.old_value,
                    size_delta: 0,
                    unchanged: true,
                };
            }
            AlterOutcome {
                node: Some(balance_l(n.key.clone(), n.value.clone(), child.node, n.right.clone())),
                old_value: child.old_value,
                size_delta: child.size_delta,
                unchanged: false,
            }
        }
        Ordering::Greater => {
            let child = alter(n.right.clone(), key, f);
            if child.unchanged {
                return AlterOutcome {
                    node: Some(n.clone()),
                    old_value: child.old_value,
                    size_delta: 0,
                    unchanged: true,
                };
            }
            AlterOutcome {
                node: Some(balance_r(n.key.clone(), n.value.clone(), n.left.clone(), child.node)),
                old_value: child.old_value,
                size_delta: child.size_delta,
                unchanged: false,
            }
        }
    }
}
