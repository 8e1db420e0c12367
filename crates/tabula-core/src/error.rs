use crate::{
    key::KeyEncodeError,
    model::SchemaError,
    predicate::PredicateError,
    row::{RowDecodeError, RowError},
    scan::ScanConfigError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error wrapping every module error.
/// Callers that only need routing information should use [`Error::class`]
/// and [`Error::origin`] rather than matching on module variants.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    KeyEncode(#[from] KeyEncodeError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    RowDecode(#[from] RowDecodeError),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    ScanConfig(#[from] ScanConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::KeyEncode(err) => err.class(),
            Self::Predicate(err) => err.class(),
            Self::RowDecode(_) => ErrorClass::Corruption,
            Self::Row(err) => err.class(),
            Self::ScanConfig(err) => err.class(),
            Self::Schema(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::KeyEncode(_) => ErrorOrigin::Key,
            Self::Predicate(_) => ErrorOrigin::Predicate,
            Self::RowDecode(_) | Self::Row(_) => ErrorOrigin::Row,
            Self::ScanConfig(_) => ErrorOrigin::Scan,
            Self::Schema(_) => ErrorOrigin::Schema,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    InvalidArgument,
    NotFound,
    IllegalState,
    Unsupported,
    Corruption,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::IllegalState => "illegal_state",
            Self::Unsupported => "unsupported",
            Self::Corruption => "corruption",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Schema,
    Key,
    Predicate,
    Scan,
    Row,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Schema => "schema",
            Self::Key => "key",
            Self::Predicate => "predicate",
            Self::Scan => "scan",
            Self::Row => "row",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_errors_classify_as_scan_origin() {
        let err: Error = ScanConfigError::NonPositiveLimit { limit: 0 }.into();

        assert_eq!(err.origin(), ErrorOrigin::Scan);
        assert_eq!(err.class(), ErrorClass::InvalidArgument);
        assert!(err.display_with_class().starts_with("scan:invalid_argument: "));
    }

    #[test]
    fn schema_lookup_failures_classify_as_not_found() {
        let err: Error = SchemaError::UnknownColumn {
            name: "missing".to_string(),
        }
        .into();

        assert_eq!(err.class(), ErrorClass::NotFound);
        assert_eq!(err.to_string(), "unknown column 'missing'");
    }
}
