use crate::{
    model::Schema,
    predicate::{ColumnPredicate, PredicateKind},
    value::Value,
};
use derive_more::Deref;
use std::{cmp::Ordering, collections::BTreeMap, ops::Bound};
use tabula_primitives::DataType;

///
/// PredicateSet
///
/// At most one predicate per column, keyed by table column index.
/// Adding a second predicate for a column intersects it with the first.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct PredicateSet(BTreeMap<usize, ColumnPredicate>);

impl PredicateSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add a predicate already resolved to column `idx`.
    pub(crate) fn add(&mut self, idx: usize, predicate: ColumnPredicate) {
        match self.0.get_mut(&idx) {
            Some(existing) => {
                let merged = existing.kind().clone().intersect(predicate.into_kind());
                existing.set_kind(merged);
            }
            None => {
                self.0.insert(idx, predicate);
            }
        }
    }

    pub(crate) fn remove(&mut self, idx: usize) -> Option<ColumnPredicate> {
        self.0.remove(&idx)
    }

    /// Return whether some predicate admits no row at all.
    #[must_use]
    pub fn has_none(&self) -> bool {
        self.0
            .values()
            .any(|predicate| matches!(predicate.kind(), PredicateKind::None))
    }

    /// Rewrite predicates using knowledge of each column's type and
    /// nullability, returning the number of predicates dropped.
    ///
    /// Conditions covering a column's whole domain become `IsNotNull`;
    /// `IsNotNull` on a non-nullable column is dropped; `IsNull` on a
    /// non-nullable column becomes `None`.
    pub(crate) fn simplify(&mut self, schema: &Schema) -> usize {
        let before = self.0.len();

        self.0.retain(|&idx, predicate| {
            let Some(column) = schema.column(idx) else {
                return true;
            };

            if covers_domain(predicate.kind(), column.data_type()) {
                predicate.set_kind(PredicateKind::IsNotNull);
            }

            match predicate.kind() {
                PredicateKind::IsNotNull => column.is_nullable(),
                PredicateKind::IsNull if !column.is_nullable() => {
                    predicate.set_kind(PredicateKind::None);
                    true
                }
                _ => true,
            }
        });

        before - self.0.len()
    }
}

impl<'a> IntoIterator for &'a PredicateSet {
    type Item = (&'a usize, &'a ColumnPredicate);
    type IntoIter = std::collections::btree_map::Iter<'a, usize, ColumnPredicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Whether every non-null value of `data_type` satisfies `kind`.
fn covers_domain(kind: &PredicateKind, data_type: DataType) -> bool {
    match kind {
        PredicateKind::Range { lower, upper } => {
            let lower_covers = match lower {
                Bound::Unbounded => true,
                Bound::Included(value) => is_same(Value::type_min(data_type), value),
                Bound::Excluded(_) => false,
            };
            let upper_covers = match upper {
                Bound::Unbounded => true,
                Bound::Included(value) => is_same(Value::type_max(data_type), value),
                Bound::Excluded(_) => false,
            };

            lower_covers && upper_covers
        }
        PredicateKind::InList(values) => {
            domain_size(data_type) == u128::try_from(values.len()).ok()
        }
        _ => false,
    }
}

fn is_same(extreme: Option<Value>, value: &Value) -> bool {
    extreme.is_some_and(|extreme| extreme.compare(value) == Some(Ordering::Equal))
}

fn domain_size(data_type: DataType) -> Option<u128> {
    if data_type == DataType::Bool {
        return Some(2);
    }

    data_type
        .integer_domain()
        .map(|(min, max)| (i128::from(max) - i128::from(min)).unsigned_abs() + 1)
}
