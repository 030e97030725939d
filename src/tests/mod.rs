//! Proptest-based structural invariants, split by engine. Concrete
//! literal-I/O scenarios live as ordinary `#[test]` functions alongside each
//! engine's own unit tests instead of here.

mod properties;
mod wbt_properties;
