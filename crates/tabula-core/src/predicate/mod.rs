//! Column predicates and their conjunctive merge.
//!
//! Every predicate constrains exactly one column. Predicates on the same
//! column are combined by intersecting their admissible value sets, so a scan
//! carries at most one predicate per column.

mod merge;
mod model;
mod set;
mod validate;

#[cfg(test)]
mod tests;

pub use model::{ColumnPredicate, CompareOp, PredicateKind};
pub use set::PredicateSet;
pub use validate::PredicateError;
