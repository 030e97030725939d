//! Lookup by key order.

use std::cmp::Ordering;
use std::rc::Rc;

use super::node::Node;

/// Returns a reference to the value stored under `key`, or `None`.
#[must_use]
pub fn lookup<'a, K, V>(tree: Option<&'a Rc<Node<K, V>>>, key: &K) -> Option<&'a V>
where
    K: Ord,
{
    let mut node = tree?;
    loop {
        match key.cmp(&node.key) {
            Ordering::Equal => return Some(&node.value),
            Ordering::Less => node = node.left.as_ref()?,
            Ordering::Greater => node = node.right.as_ref()?,
        }
    }
}
