use crate::{
    model::Schema,
    predicate::{ColumnPredicate, CompareOp, PredicateError, PredicateKind, PredicateSet},
    value::Value,
};
use proptest::prelude::*;
use std::ops::Bound;
use tabula_primitives::DataType;

fn schema() -> Schema {
    Schema::builder()
        .key_column("a", DataType::Int32)
        .key_column("b", DataType::Int32)
        .column("tiny", DataType::Int8)
        .nullable_column("flag", DataType::Bool)
        .column("score", DataType::Double)
        .build()
        .expect("schema should build")
}

fn range(lower: i32, upper: i32) -> PredicateKind {
    PredicateKind::range(
        Bound::Included(Value::Int32(lower)),
        Bound::Excluded(Value::Int32(upper)),
    )
}

#[test]
fn integer_comparisons_use_inclusive_lower_exclusive_upper() {
    let lte = ColumnPredicate::comparison("b", CompareOp::Lte, 19);
    let gt = ColumnPredicate::comparison("b", CompareOp::Gt, 9);

    assert_eq!(
        lte.kind(),
        &PredicateKind::Range {
            lower: Bound::Unbounded,
            upper: Bound::Excluded(Value::Int32(20)),
        }
    );
    assert_eq!(
        gt.kind(),
        &PredicateKind::Range {
            lower: Bound::Included(Value::Int32(10)),
            upper: Bound::Unbounded,
        }
    );
}

#[test]
fn single_value_ranges_collapse_to_equality() {
    let closed = PredicateKind::range(
        Bound::Included(Value::Int32(5)),
        Bound::Included(Value::Int32(5)),
    );
    assert_eq!(closed, PredicateKind::Equality(Value::Int32(5)));
    assert_eq!(range(5, 6), PredicateKind::Equality(Value::Int32(5)));
}

#[test]
fn unsatisfiable_ranges_collapse_to_none() {
    let above_max = ColumnPredicate::comparison("tiny", CompareOp::Gt, i8::MAX);
    assert_eq!(above_max.kind(), &PredicateKind::None);
    assert_eq!(range(10, 5), PredicateKind::None);

    let open = PredicateKind::range(
        Bound::Excluded(Value::Double(1.5)),
        Bound::Excluded(Value::Double(1.5)),
    );
    assert_eq!(open, PredicateKind::None);
}

#[test]
fn exclusive_upper_at_the_type_minimum_admits_nothing() {
    let below = |value: Value| PredicateKind::range(Bound::Unbounded, Bound::Excluded(value));

    assert_eq!(below(Value::Int8(i8::MIN)), PredicateKind::None);
    assert_eq!(below(Value::Int32(i32::MIN)), PredicateKind::None);
    assert_eq!(below(Value::from("")), PredicateKind::None);
    assert_eq!(below(Value::Bool(false)), PredicateKind::None);

    // lower bounds do not rescue an empty upper
    assert_eq!(
        PredicateKind::range(
            Bound::Included(Value::Int8(i8::MIN)),
            Bound::Excluded(Value::Int8(i8::MIN)),
        ),
        PredicateKind::None
    );
    assert_eq!(
        ColumnPredicate::comparison("tiny", CompareOp::Lt, i8::MIN).into_kind(),
        PredicateKind::None
    );

    // one above the minimum still admits the minimum
    let above = below(Value::Int8(i8::MIN + 1));
    assert!(above.admits(&Value::Int8(i8::MIN)));
    assert!(!above.admits(&Value::Int8(i8::MIN + 1)));
    assert!(below(Value::from("\0")).admits(&Value::from("")));
}

#[test]
fn in_lists_are_sorted_and_deduplicated() {
    let list = PredicateKind::in_list(vec![Value::Int32(3), Value::Int32(1), Value::Int32(3)]);
    assert_eq!(list, PredicateKind::InList(vec![Value::Int32(1), Value::Int32(3)]));

    assert_eq!(PredicateKind::in_list(Vec::new()), PredicateKind::None);
    assert_eq!(
        PredicateKind::in_list(vec![Value::Int32(7)]),
        PredicateKind::Equality(Value::Int32(7))
    );
}

#[test]
fn equality_merges_with_ranges_and_lists() {
    let eq = PredicateKind::Equality(Value::Int32(15));
    assert_eq!(eq.clone().intersect(range(10, 20)), eq);
    assert_eq!(
        PredicateKind::Equality(Value::Int32(25)).intersect(range(10, 20)),
        PredicateKind::None
    );

    let list = PredicateKind::in_list(vec![Value::Int32(15), Value::Int32(16)]);
    assert_eq!(list.intersect(eq.clone()), eq);
    assert_eq!(
        eq.intersect(PredicateKind::Equality(Value::Int32(16))),
        PredicateKind::None
    );
}

#[test]
fn ranges_intersect_to_the_tightest_bounds() {
    assert_eq!(range(10, 20).intersect(range(15, 30)), range(15, 20));
    assert_eq!(range(10, 20).intersect(range(20, 30)), PredicateKind::None);
}

#[test]
fn in_lists_are_filtered_by_ranges_and_other_lists() {
    let list = PredicateKind::in_list(vec![Value::Int32(1), Value::Int32(5), Value::Int32(9)]);

    assert_eq!(
        list.clone().intersect(range(4, 10)),
        PredicateKind::InList(vec![Value::Int32(5), Value::Int32(9)])
    );
    assert_eq!(
        list.clone().intersect(range(4, 6)),
        PredicateKind::Equality(Value::Int32(5))
    );
    assert_eq!(
        list.intersect(PredicateKind::in_list(vec![Value::Int32(2), Value::Int32(4)])),
        PredicateKind::None
    );
}

#[test]
fn null_conditions_merge() {
    assert_eq!(
        PredicateKind::IsNull.intersect(PredicateKind::IsNotNull),
        PredicateKind::None
    );
    assert_eq!(
        PredicateKind::IsNull.intersect(PredicateKind::IsNull),
        PredicateKind::IsNull
    );
    assert_eq!(
        PredicateKind::IsNotNull.intersect(range(1, 3)),
        range(1, 3)
    );
    assert_eq!(
        range(1, 3).intersect(PredicateKind::None),
        PredicateKind::None
    );
}

#[test]
fn validation_resolves_columns_and_checks_literal_types() {
    let schema = schema();

    assert_eq!(ColumnPredicate::equal("b", 4).validate(&schema), Ok(1));
    assert_eq!(
        ColumnPredicate::equal("zz", 4).validate(&schema),
        Err(PredicateError::UnknownColumn {
            column: "zz".to_string()
        })
    );
    assert_eq!(
        ColumnPredicate::equal("b", 4i64).validate(&schema),
        Err(PredicateError::TypeMismatch {
            column: "b".to_string(),
            expected: DataType::Int32,
            found: DataType::Int64,
        })
    );
}

#[test]
fn validation_rejects_virtual_columns() {
    let schema = schema()
        .with_appended_column(crate::model::ColumnSchema::new_virtual(
            "is_deleted",
            DataType::Bool,
        ))
        .unwrap();

    let err = ColumnPredicate::equal("is_deleted", true)
        .validate(&schema)
        .unwrap_err();
    assert!(matches!(err, PredicateError::VirtualColumn { .. }));
}

#[test]
fn predicate_set_merges_per_column() {
    let mut set = PredicateSet::new();
    set.add(1, ColumnPredicate::comparison("b", CompareOp::Gte, 10));
    set.add(1, ColumnPredicate::comparison("b", CompareOp::Lt, 20));

    assert_eq!(set.len(), 1);
    assert_eq!(set[&1].kind(), &range(10, 20));
    assert_eq!(set[&1].to_string(), "`b` >= 10 AND `b` < 20");
    assert!(!set.has_none());

    set.add(1, ColumnPredicate::equal("b", 30));
    assert!(set.has_none());
}

#[test]
fn simplify_drops_trivially_true_predicates() {
    let schema = schema();
    let mut set = PredicateSet::new();
    set.add(2, ColumnPredicate::comparison("tiny", CompareOp::Gte, i8::MIN));
    set.add(
        3,
        ColumnPredicate::in_list("flag", vec![Value::Bool(true), Value::Bool(false)]),
    );
    set.add(4, ColumnPredicate::is_not_null("score"));

    let dropped = set.simplify(&schema);

    assert_eq!(dropped, 2);
    assert_eq!(set.len(), 1);
    assert_eq!(set[&3].kind(), &PredicateKind::IsNotNull);
}

#[test]
fn simplify_marks_is_null_on_non_nullable_columns_empty() {
    let mut set = PredicateSet::new();
    set.add(0, ColumnPredicate::is_null("a"));

    assert_eq!(set.simplify(&schema()), 0);
    assert!(set.has_none());
}

fn int_kind() -> impl Strategy<Value = PredicateKind> {
    let bound = prop::option::of(-5i32..5);
    prop_oneof![
        Just(PredicateKind::IsNotNull),
        Just(PredicateKind::IsNull),
        (-5i32..5).prop_map(|v| PredicateKind::Equality(Value::Int32(v))),
        (bound.clone(), any::<bool>(), bound, any::<bool>()).prop_map(
            |(lower, lower_inclusive, upper, upper_inclusive)| {
                let lower = lower.map_or(Bound::Unbounded, |v| {
                    if lower_inclusive {
                        Bound::Included(Value::Int32(v))
                    } else {
                        Bound::Excluded(Value::Int32(v))
                    }
                });
                let upper = upper.map_or(Bound::Unbounded, |v| {
                    if upper_inclusive {
                        Bound::Included(Value::Int32(v))
                    } else {
                        Bound::Excluded(Value::Int32(v))
                    }
                });
                PredicateKind::range(lower, upper)
            }
        ),
        prop::collection::vec(-5i32..5, 0..5).prop_map(|values| {
            PredicateKind::in_list(values.into_iter().map(Value::Int32).collect())
        }),
    ]
}

proptest! {
    #[test]
    fn intersection_admits_exactly_what_both_admit(a in int_kind(), b in int_kind()) {
        let merged = a.clone().intersect(b.clone());

        for v in -7i32..7 {
            let value = Value::Int32(v);
            prop_assert_eq!(merged.admits(&value), a.admits(&value) && b.admits(&value));
        }
    }

    #[test]
    fn intersection_is_commutative(a in int_kind(), b in int_kind()) {
        let left = a.clone().intersect(b.clone());
        let right = b.intersect(a);

        for v in -7i32..7 {
            let value = Value::Int32(v);
            prop_assert_eq!(left.admits(&value), right.admits(&value));
        }
    }
}
