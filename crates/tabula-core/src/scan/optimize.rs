//! Module: scan::optimize
//! Responsibility: canonicalize a scan spec before it is shipped.
//! Does not own: predicate merge rules (see `predicate`) or key encoding.
//! Boundary: rewrites only the scan spec and its arena; never touches consistency settings.

use crate::{
    key::{BoundSide, KeyEncodeError, encode_key_values, prefix_successor},
    model::Schema,
    obs::BoundTarget,
    predicate::PredicateKind,
    scan::{arena::ByteArena, spec::ScanSpec},
    value::Value,
};
use std::ops::Bound;

///
/// OptimizeSummary
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct OptimizeSummary {
    pub(crate) promoted: usize,
    pub(crate) dropped: usize,
    pub(crate) lower_tightened: bool,
    pub(crate) upper_tightened: bool,
}

/// Rewrite `spec` in place:
///
/// 1. fold the longest equality prefix of the primary key, plus one trailing
///    range on the next key column, into the primary-key bounds;
/// 2. drop predicates every non-null value satisfies;
/// 3. mark the scan spec unsatisfiable when its bounds or predicates admit nothing.
///
/// Running it again on its own output changes nothing.
pub(crate) fn optimize(
    schema: &Schema,
    spec: &mut ScanSpec,
    arena: &mut ByteArena,
) -> Result<OptimizeSummary, KeyEncodeError> {
    let mut summary = promote_key_prefix(schema, spec, arena)?;
    summary.dropped = spec.predicates_mut().simplify(schema);

    if spec.predicates().has_none() || spec.has_empty_bounds(arena) {
        spec.mark_cant_be_satisfied();
    }

    Ok(summary)
}

fn promote_key_prefix(
    schema: &Schema,
    spec: &mut ScanSpec,
    arena: &mut ByteArena,
) -> Result<OptimizeSummary, KeyEncodeError> {
    let mut prefix = Vec::new();
    let mut trailing = None;

    for idx in 0..schema.num_key_columns() {
        match spec.predicates().get(&idx).map(|predicate| predicate.kind()) {
            Some(PredicateKind::Equality(value)) => prefix.push(value.clone()),
            Some(PredicateKind::Range { lower, upper }) => {
                trailing = Some((lower.clone(), upper.clone()));
                break;
            }
            _ => break,
        }
    }

    if prefix.is_empty() && trailing.is_none() {
        return Ok(OptimizeSummary::default());
    }

    let (lower, upper) = trailing
        .clone()
        .unwrap_or((Bound::Unbounded, Bound::Unbounded));

    let lower_key = match lower {
        Bound::Unbounded => Some(encode_key_values(schema, &prefix)?),
        Bound::Included(value) => Some(encode_with(schema, &prefix, value)?),
        Bound::Excluded(value) => prefix_successor(&encode_with(schema, &prefix, value)?),
    };
    let upper_key = match upper {
        Bound::Unbounded => prefix_successor(&encode_key_values(schema, &prefix)?),
        Bound::Included(value) => prefix_successor(&encode_with(schema, &prefix, value)?),
        Bound::Excluded(value) => Some(encode_with(schema, &prefix, value)?),
    };

    let mut summary = OptimizeSummary::default();
    match lower_key {
        Some(key) => {
            summary.lower_tightened =
                spec.merge_bound(arena, BoundTarget::PrimaryKey, BoundSide::Lower, &key);
        }
        // Constructors never leave an exclusive integer lower bound, but a
        // hand-built `PredicateKind::Range` can; past the largest key it
        // admits nothing.
        None => spec.mark_cant_be_satisfied(),
    }
    if let Some(key) = upper_key {
        summary.upper_tightened =
            spec.merge_bound(arena, BoundTarget::PrimaryKey, BoundSide::Upper, &key);
    }

    let folded = prefix.len() + usize::from(trailing.is_some());
    for idx in 0..folded {
        spec.predicates_mut().remove(idx);
    }
    summary.promoted = folded;

    Ok(summary)
}

fn encode_with(
    schema: &Schema,
    prefix: &[Value],
    last: Value,
) -> Result<Vec<u8>, KeyEncodeError> {
    let mut values = prefix.to_vec();
    values.push(last);

    encode_key_values(schema, &values)
}
