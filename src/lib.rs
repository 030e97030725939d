//! Persistent, immutable collections core.
//!
//! Two associative containers, each fully persistent via [`std::rc::Rc`]
//! structural sharing:
//!
//! - [`HashMap`]/[`HashSet`] — a hash-array-mapped trie (CHAMP-style bitmap
//!   branching), keyed by `K: Hash + Eq + Ord` (see [`hamt`] for why the
//!   `Ord` bound is load-bearing: collision buckets are themselves a small
//!   ordered tree).
//! - [`OrderedMap`]/[`OrderedSet`] — a weight-balanced binary search tree
//!   (Adams/GHC `Data.Map` style), keyed by `K: Ord`.
//!
//! Every update returns a new handle; existing handles stay valid and share
//! as much structure with the new one as the update allows. Bulk set algebra
//! (`union`/`intersection`/`difference`/`adjust`) walks both input trees at
//! once instead of folding one element at a time, and returns the original
//! `Rc` allocation unchanged (`Rc::ptr_eq`-detectable) whenever the result is
//! value-equal to an input.
//!
//! [`seq`] supplies a pull-based, single-use [`seq::LazySeq`] pipeline for
//! building the two map types out of an arbitrary element stream. [`key`]
//! supplies the [`key::Asc`]/[`key::Desc`]/[`key::compose`] toolkit for
//! composite orderings.
//!
//! Every public operation that can fail returns `Option` rather than
//! `Result`: absence is not an error, and the engines have no other failure
//! mode to report (internal invariants are checked with `debug_assert!`
//! instead of a recoverable error type — there is no caller who could act on
//! one differently than on the panic).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

mod adhash;
pub mod hamt;
pub mod key;
mod map;
pub mod seq;
#[cfg(test)]
mod tests;
pub mod wbt;

pub use map::{HashMap, HashSet, OrderedMap, OrderedSet};
pub use seq::LazySeq;
