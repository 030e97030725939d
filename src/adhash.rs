//! Incremental structural digest shared by both engines.
//!
//! Computes `φ(S) = Σ f(k, v)` over all entries using wrapping arithmetic, so
//! that insert/remove/union/etc. can maintain it by simple wrapping add/sub
//! instead of re-walking the whole container. Two mixing seeds prevent
//! degeneration when `hash(v) == 0`.
//!
//! Two containers with equal length and equal digest contain the same
//! entries with overwhelming probability (2⁻⁶⁴ collision chance) — this
//! backs the `PartialEq` fast-reject path on [`crate::HashMap`] and
//! [`crate::HashSet`].

use std::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

/// First mixing seed (golden ratio constant).
const SEED_1: u64 = 0x9E37_79B9_7F4A_7C15;

/// Second mixing seed (large prime).
const SEED_2: u64 = 0x517C_C1B7_2722_0A95;

/// Computes the 64-bit hash of a value using the standard hasher.
#[must_use]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Computes the digest contribution of a single entry.
///
/// `f(k, v) = key_hash · SEED₁ ⊕ value_hash · SEED₂`
#[must_use]
pub const fn entry_digest(key_hash: u64, value_hash: u64) -> u64 {
    key_hash.wrapping_mul(SEED_1) ^ value_hash.wrapping_mul(SEED_2)
}
