//! Hash-array-mapped trie engine (CHAMP-style bitmap branching).
//!
//! Every operation is a pure function over `Option<Rc<Node<K, V>>>`. A key's
//! 64-bit hash is consumed 5 bits at a time ([`node::BITS_PER_LEVEL`]); keys
//! sharing a full 60-bit prefix fall through to a [`Node::Collision`] bucket
//! routed through the weight-balanced tree engine so even pathological
//! collisions stay `O(log n)`.

/// Insert/modify/remove/alter a single key.
pub mod alter;
/// Two-tree set algebra (`union`/`intersection`/`difference`/`adjust`).
pub mod combine;
/// Lookup by key.
pub mod get;
/// In-order (bitmap-order) traversal.
pub mod iter;
/// The `Leaf`/`Branch`/`Collision` node shape and its bitmap helpers.
pub mod node;
/// Whole-container `filter`/`map_values`/`collect_values`.
pub mod transform;

pub use node::Node;
