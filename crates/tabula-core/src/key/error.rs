use crate::error::ErrorClass;
use tabula_primitives::DataType;
use thiserror::Error as ThisError;

///
/// KeyEncodeError
///
/// Primary-key encoding and decoding failures.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum KeyEncodeError {
    #[error("data type {data_type} is not order-encodable")]
    UnsupportedKeyType { data_type: DataType },

    #[error("key column '{column}' expects {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        found: DataType,
    },

    #[error("key has {found} components but the schema has {max} key columns")]
    TooManyComponents { found: usize, max: usize },

    #[error("key column '{column}' is not set")]
    MissingKeyColumn { column: String },

    #[error("encoded key truncated inside column '{column}'")]
    Truncated { column: String },

    #[error("encoded key has an invalid escape sequence in column '{column}'")]
    InvalidEscape { column: String },

    #[error("encoded key has invalid UTF-8 in string column '{column}'")]
    InvalidUtf8 { column: String },

    #[error("encoded key has {len} trailing bytes after the last key column")]
    TrailingBytes { len: usize },
}

impl KeyEncodeError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedKeyType { .. } => ErrorClass::Unsupported,
            Self::TypeMismatch { .. }
            | Self::TooManyComponents { .. }
            | Self::MissingKeyColumn { .. } => ErrorClass::InvalidArgument,
            Self::Truncated { .. }
            | Self::InvalidEscape { .. }
            | Self::InvalidUtf8 { .. }
            | Self::TrailingBytes { .. } => ErrorClass::Corruption,
        }
    }
}
