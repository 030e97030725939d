//! Weight-balanced binary search tree node.

use std::rc::Rc;

/// A node of a weight-balanced BST, persistent via `Rc` sharing.
///
/// `size` is the cached subtree size (including this node), maintained by
/// every smart constructor so callers get `O(1)` `len`.
pub struct Node<K, V> {
    /// Cached subtree size.
    pub size: usize,
    /// The key.
    pub key: K,
    /// The value.
    pub value: V,
    /// Left subtree (strictly smaller keys).
    pub left: Option<Rc<Node<K, V>>>,
    /// Right subtree (strictly larger keys).
    pub right: Option<Rc<Node<K, V>>>,
}

/// `δ` — controls when a child is "too heavy" relative to its sibling.
pub const DELTA: usize = 3;

/// `γ` — controls single vs. double rotation once a rotation is required.
pub const GAMMA: usize = 2;

/// Subtree size of a possibly-absent node, in `O(1)`.
#[inline]
#[must_use]
pub fn size<K, V>(node: Option<&Rc<Node<K, V>>>) -> usize {
    node.map_or(0, |n| n.size)
}

/// Constructs a leaf node (no children) in one allocation.
#[must_use]
pub fn leaf<K, V>(key: K, value: V) -> Rc<Node<K, V>> {
    Rc::new(Node {
        size: 1,
        key,
        value,
        left: None,
        right: None,
    })
}

/// Constructs a node from already-balanced children, recomputing `size`.
/// Does not rebalance — callers must already know `l`/`r` are in balance
/// relative to each other (used by call sites that just replaced a child
/// with one of the same approximate weight).
#[must_use]
pub fn bin<K, V>(
    key: K,
    value: V,
    left: Option<Rc<Node<K, V>>>,
    right: Option<Rc<Node<K, V>>>,
) -> Rc<Node<K, V>> {
    let total = 1 + size(left.as_ref()) + size(right.as_ref());
    Rc::new(Node {
        size: total,
        key,
        value,
        left,
        right,
    })
}

/// Checks the weight-balance invariant at a single node (test/debug helper).
#[must_use]
pub fn is_balanced<K, V>(left: Option<&Rc<Node<K, V>>>, right: Option<&Rc<Node<K, V>>>) -> bool {
    let sl = size(left);
    let sr = size(right);
    sl.max(sr) <= DELTA * sl.min(sr).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_has_size_one() {
        let n = leaf("k", 1);
        assert_eq!(n.size, 1);
    }

    #[test]
    fn bin_sums_child_sizes() {
        let l = leaf("a", 1);
        let r = leaf("c", 3);
        let n = bin("b", 2, Some(l), Some(r));
        assert_eq!(n.size, 3);
    }
}
