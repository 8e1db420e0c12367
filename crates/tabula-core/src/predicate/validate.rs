use crate::{
    error::ErrorClass,
    model::Schema,
    predicate::{ColumnPredicate, PredicateKind},
};
use tabula_primitives::DataType;
use thiserror::Error as ThisError;

///
/// PredicateError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PredicateError {
    #[error("predicate references unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("predicate on virtual column '{column}' is not supported")]
    VirtualColumn { column: String },

    #[error("predicate literal for column '{column}' has type {found}, expected {expected}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("range predicate on column '{column}' of unordered type {data_type}")]
    UnorderedType { column: String, data_type: DataType },
}

impl PredicateError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownColumn { .. } => ErrorClass::NotFound,
            Self::VirtualColumn { .. } | Self::UnorderedType { .. } => ErrorClass::Unsupported,
            Self::TypeMismatch { .. } => ErrorClass::InvalidArgument,
        }
    }
}

impl ColumnPredicate {
    /// Resolve this predicate against `schema`, returning its column index.
    pub fn validate(&self, schema: &Schema) -> Result<usize, PredicateError> {
        let idx = schema
            .column_index(self.column())
            .map_err(|_| PredicateError::UnknownColumn {
                column: self.column().to_string(),
            })?;
        let column = &schema.columns()[idx];

        if column.is_virtual() {
            return Err(PredicateError::VirtualColumn {
                column: self.column().to_string(),
            });
        }

        let data_type = column.data_type();
        for literal in self.kind().literals() {
            if !literal.is_compatible_with(data_type) {
                return Err(PredicateError::TypeMismatch {
                    column: self.column().to_string(),
                    expected: data_type,
                    found: literal.data_type(),
                });
            }
        }

        let needs_order = matches!(
            self.kind(),
            PredicateKind::Range { .. } | PredicateKind::InList(_)
        );
        if needs_order && !data_type.supports_ordering() {
            return Err(PredicateError::UnorderedType {
                column: self.column().to_string(),
                data_type,
            });
        }

        Ok(idx)
    }
}
