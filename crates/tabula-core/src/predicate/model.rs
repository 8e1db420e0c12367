use crate::value::Value;
use std::{cmp::Ordering, fmt, ops::Bound};

///
/// CompareOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        };
        f.write_str(label)
    }
}

///
/// PredicateKind
///
/// Admissible value set of one column.
///
/// Constructors canonicalize: discrete types use inclusive lower and exclusive
/// upper bounds, single-value ranges and lists collapse to `Equality`, and
/// unsatisfiable conditions collapse to `None`.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PredicateKind {
    /// No value (not even null) satisfies the predicate.
    None,
    Equality(Value),
    Range {
        lower: Bound<Value>,
        upper: Bound<Value>,
    },
    /// Sorted, de-duplicated literal list with at least two entries.
    InList(Vec<Value>),
    IsNull,
    IsNotNull,
}

impl PredicateKind {
    /// Build a canonical range condition.
    #[must_use]
    pub fn range(lower: Bound<Value>, upper: Bound<Value>) -> Self {
        let lower = match lower {
            Bound::Excluded(value) => match successor(&value) {
                Successor::Next(next) => Bound::Included(next),
                Successor::AtMax => return Self::None,
                Successor::NotDiscrete => Bound::Excluded(value),
            },
            other => other,
        };
        let upper = match upper {
            Bound::Included(value) => match successor(&value) {
                Successor::Next(next) => Bound::Excluded(next),
                Successor::AtMax => Bound::Unbounded,
                Successor::NotDiscrete => Bound::Included(value),
            },
            other => other,
        };

        // nothing sorts below the smallest value of a type
        if let Bound::Excluded(value) = &upper
            && is_type_min(value)
        {
            return Self::None;
        }

        match (&lower, &upper) {
            (Bound::Unbounded, Bound::Unbounded) => Self::IsNotNull,
            (Bound::Included(l), Bound::Included(u)) => match l.compare(u) {
                Some(Ordering::Equal) => Self::Equality(l.clone()),
                Some(Ordering::Greater) => Self::None,
                _ => Self::Range { lower, upper },
            },
            (Bound::Included(l), Bound::Excluded(u)) => match l.compare(u) {
                Some(Ordering::Greater | Ordering::Equal) => Self::None,
                _ if successor(l) == Successor::Next(u.clone()) => Self::Equality(l.clone()),
                _ => Self::Range { lower, upper },
            },
            (Bound::Excluded(l), Bound::Excluded(u) | Bound::Included(u)) => {
                match l.compare(u) {
                    Some(Ordering::Greater | Ordering::Equal) => Self::None,
                    _ => Self::Range { lower, upper },
                }
            }
            _ => Self::Range { lower, upper },
        }
    }

    /// Build a canonical IN-list condition.
    #[must_use]
    pub fn in_list(mut values: Vec<Value>) -> Self {
        values.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
        values.dedup_by(|a, b| a.compare(b) == Some(Ordering::Equal));

        match values.len() {
            0 => Self::None,
            1 => Self::Equality(values.remove(0)),
            _ => Self::InList(values),
        }
    }

    /// Return whether `value` is admitted by this condition.
    #[must_use]
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            Self::None | Self::IsNull => false,
            Self::IsNotNull => true,
            Self::Equality(expected) => expected.compare(value) == Some(Ordering::Equal),
            Self::Range { lower, upper } => {
                lower_admits(lower, value) && upper_admits(upper, value)
            }
            Self::InList(values) => values
                .iter()
                .any(|candidate| candidate.compare(value) == Some(Ordering::Equal)),
        }
    }

    /// Every literal carried by this condition.
    pub(crate) fn literals(&self) -> Vec<&Value> {
        match self {
            Self::None | Self::IsNull | Self::IsNotNull => Vec::new(),
            Self::Equality(value) => vec![value],
            Self::Range { lower, upper } => [lower, upper]
                .into_iter()
                .filter_map(|bound| match bound {
                    Bound::Included(value) | Bound::Excluded(value) => Some(value),
                    Bound::Unbounded => None,
                })
                .collect(),
            Self::InList(values) => values.iter().collect(),
        }
    }
}

pub(super) fn lower_admits(lower: &Bound<Value>, value: &Value) -> bool {
    match lower {
        Bound::Unbounded => true,
        Bound::Included(l) => matches!(value.compare(l), Some(Ordering::Greater | Ordering::Equal)),
        Bound::Excluded(l) => value.compare(l) == Some(Ordering::Greater),
    }
}

pub(super) fn upper_admits(upper: &Bound<Value>, value: &Value) -> bool {
    match upper {
        Bound::Unbounded => true,
        Bound::Included(u) => matches!(value.compare(u), Some(Ordering::Less | Ordering::Equal)),
        Bound::Excluded(u) => value.compare(u) == Some(Ordering::Less),
    }
}

fn is_type_min(value: &Value) -> bool {
    Value::type_min(value.data_type())
        .is_some_and(|min| min.compare(value) == Some(Ordering::Equal))
}

///
/// Successor
///
/// Next value of a discrete domain.
///

#[derive(Debug, PartialEq)]
enum Successor {
    Next(Value),
    AtMax,
    NotDiscrete,
}

fn successor(value: &Value) -> Successor {
    if let Value::Bool(v) = value {
        return if *v {
            Successor::AtMax
        } else {
            Successor::Next(Value::Bool(true))
        };
    }

    let Some(raw) = value.as_i64() else {
        return Successor::NotDiscrete;
    };

    raw.checked_add(1)
        .and_then(|next| Value::from_i64(value.data_type(), next))
        .map_or(Successor::AtMax, Successor::Next)
}

///
/// ColumnPredicate
///
/// A condition restricting the admissible values of one named column.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnPredicate {
    column: String,
    kind: PredicateKind,
}

impl ColumnPredicate {
    #[must_use]
    pub fn new(column: impl Into<String>, kind: PredicateKind) -> Self {
        Self {
            column: column.into(),
            kind,
        }
    }

    #[must_use]
    pub fn comparison(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = match op {
            CompareOp::Eq => PredicateKind::Equality(value),
            CompareOp::Lt => PredicateKind::range(Bound::Unbounded, Bound::Excluded(value)),
            CompareOp::Lte => PredicateKind::range(Bound::Unbounded, Bound::Included(value)),
            CompareOp::Gt => PredicateKind::range(Bound::Excluded(value), Bound::Unbounded),
            CompareOp::Gte => PredicateKind::range(Bound::Included(value), Bound::Unbounded),
        };

        Self::new(column, kind)
    }

    #[must_use]
    pub fn equal(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::comparison(column, CompareOp::Eq, value)
    }

    /// `lower <= column < upper`; either side may be `None` for unbounded.
    #[must_use]
    pub fn range(
        column: impl Into<String>,
        lower: Option<Value>,
        upper: Option<Value>,
    ) -> Self {
        Self::new(
            column,
            PredicateKind::range(
                lower.map_or(Bound::Unbounded, Bound::Included),
                upper.map_or(Bound::Unbounded, Bound::Excluded),
            ),
        )
    }

    #[must_use]
    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self::new(column, PredicateKind::in_list(values))
    }

    #[must_use]
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::new(column, PredicateKind::IsNull)
    }

    #[must_use]
    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::new(column, PredicateKind::IsNotNull)
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    #[must_use]
    pub const fn kind(&self) -> &PredicateKind {
        &self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: PredicateKind) {
        self.kind = kind;
    }

    #[must_use]
    pub fn into_kind(self) -> PredicateKind {
        self.kind
    }
}

impl fmt::Display for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = &self.column;
        match &self.kind {
            PredicateKind::None => write!(f, "`{column}` NONE"),
            PredicateKind::Equality(value) => write!(f, "`{column}` = {value}"),
            PredicateKind::Range { lower, upper } => {
                match lower {
                    Bound::Included(value) => write!(f, "`{column}` >= {value}")?,
                    Bound::Excluded(value) => write!(f, "`{column}` > {value}")?,
                    Bound::Unbounded => {}
                }
                if !matches!(lower, Bound::Unbounded) && !matches!(upper, Bound::Unbounded) {
                    f.write_str(" AND ")?;
                }
                match upper {
                    Bound::Included(value) => write!(f, "`{column}` <= {value}"),
                    Bound::Excluded(value) => write!(f, "`{column}` < {value}"),
                    Bound::Unbounded => Ok(()),
                }
            }
            PredicateKind::InList(values) => {
                write!(f, "`{column}` IN (")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str(")")
            }
            PredicateKind::IsNull => write!(f, "`{column}` IS NULL"),
            PredicateKind::IsNotNull => write!(f, "`{column}` IS NOT NULL"),
        }
    }
}
