use crate::{error::ErrorClass, model::SchemaError};
use tabula_primitives::DataType;
use thiserror::Error as ThisError;

///
/// RowError
///
/// Rejections raised while staging a row. Every failed call leaves the row
/// unchanged.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RowError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("column '{column}' has type {expected}, cannot assign {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("column '{column}' is not nullable")]
    NullNotAllowed { column: String },

    #[error("value for column '{column}' is {len} bytes, above the u32 length limit")]
    ValueTooLarge { column: String, len: usize },

    #[error("row operation is sealed; its encoded size has already been taken")]
    Sealed,
}

impl RowError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(err) => err.class(),
            Self::TypeMismatch { .. }
            | Self::NullNotAllowed { .. }
            | Self::ValueTooLarge { .. } => ErrorClass::InvalidArgument,
            Self::Sealed => ErrorClass::IllegalState,
        }
    }
}

///
/// RowDecodeError
///
/// Malformed encoded row operation.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RowDecodeError {
    #[error("unknown write opcode {opcode}")]
    UnknownOpcode { opcode: u8 },

    #[error("encoded row truncated in {section}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        section: String,
        needed: usize,
        remaining: usize,
    },

    #[error("column '{column}' is marked null but not set")]
    NullWithoutIsset { column: String },

    #[error("column '{column}' has an invalid {data_type} cell")]
    InvalidCell { column: String, data_type: DataType },

    #[error("string column '{column}' holds invalid UTF-8")]
    InvalidUtf8 { column: String },

    #[error("encoded row has {len} trailing bytes")]
    TrailingBytes { len: usize },
}
