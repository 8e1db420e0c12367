//! Conjunctive merge of two conditions on the same column.

use crate::{
    predicate::model::{PredicateKind, lower_admits, upper_admits},
    value::Value,
};
use std::{cmp::Ordering, ops::Bound};

impl PredicateKind {
    /// Intersect two conditions: the result admits a value iff both do.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        use PredicateKind as K;

        match (self, other) {
            (K::None, _) | (_, K::None) => K::None,

            (K::IsNull, K::IsNull) => K::IsNull,
            (K::IsNull, _) | (_, K::IsNull) => K::None,
            (K::IsNotNull, other) | (other, K::IsNotNull) => other,

            (K::Equality(a), K::Equality(b)) => {
                if a.compare(&b) == Some(Ordering::Equal) {
                    K::Equality(a)
                } else {
                    K::None
                }
            }
            (K::Equality(value), constraint @ (K::Range { .. } | K::InList(_)))
            | (constraint @ (K::Range { .. } | K::InList(_)), K::Equality(value)) => {
                if constraint.admits(&value) {
                    K::Equality(value)
                } else {
                    K::None
                }
            }

            (
                K::Range {
                    lower: lower_a,
                    upper: upper_a,
                },
                K::Range {
                    lower: lower_b,
                    upper: upper_b,
                },
            ) => K::range(
                tighter_lower(lower_a, lower_b),
                tighter_upper(upper_a, upper_b),
            ),

            (K::InList(values), K::Range { lower, upper })
            | (K::Range { lower, upper }, K::InList(values)) => K::in_list(
                values
                    .into_iter()
                    .filter(|value| lower_admits(&lower, value) && upper_admits(&upper, value))
                    .collect(),
            ),

            (K::InList(a), K::InList(b)) => {
                let other = K::InList(b);
                K::in_list(a.into_iter().filter(|value| other.admits(value)).collect())
            }
        }
    }
}

// Greater lower bound wins; on a tie the exclusive bound is tighter.
fn tighter_lower(a: Bound<Value>, b: Bound<Value>) -> Bound<Value> {
    match (&a, &b) {
        (Bound::Unbounded, _) => b,
        (_, Bound::Unbounded) => a,
        (
            Bound::Included(x) | Bound::Excluded(x),
            Bound::Included(y) | Bound::Excluded(y),
        ) => match x.compare(y) {
            Some(Ordering::Greater) => a,
            Some(Ordering::Less) => b,
            _ if matches!(a, Bound::Excluded(_)) => a,
            _ => b,
        },
    }
}

// Smaller upper bound wins; on a tie the exclusive bound is tighter.
fn tighter_upper(a: Bound<Value>, b: Bound<Value>) -> Bound<Value> {
    match (&a, &b) {
        (Bound::Unbounded, _) => b,
        (_, Bound::Unbounded) => a,
        (
            Bound::Included(x) | Bound::Excluded(x),
            Bound::Included(y) | Bound::Excluded(y),
        ) => match x.compare(y) {
            Some(Ordering::Less) => a,
            Some(Ordering::Greater) => b,
            _ if matches!(a, Bound::Excluded(_)) => a,
            _ => b,
        },
    }
}
