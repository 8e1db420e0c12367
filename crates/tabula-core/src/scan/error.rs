use crate::{
    error::ErrorClass,
    key::KeyEncodeError,
    model::SchemaError,
    predicate::PredicateError,
    scan::{HybridTime, ReadMode},
};
use thiserror::Error as ThisError;

///
/// ScanConfigError
///
/// Rejections raised while configuring a scan. A rejected call leaves the
/// configuration exactly as it was.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ScanConfigError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Predicate(#[from] PredicateError),

    #[error(transparent)]
    KeyEncode(#[from] KeyEncodeError),

    #[error("bound row was built for a different schema than the scanned table")]
    BoundSchemaMismatch,

    #[error("limit must be positive, got {limit}")]
    NonPositiveLimit { limit: i64 },

    #[error("batch size must be positive")]
    ZeroBatchSize,

    #[error("snapshot micros {micros} overflow the hybrid clock")]
    SnapshotMicrosOverflow { micros: u64 },

    #[error("fault-tolerant scans require snapshot read mode, got {mode}")]
    FaultTolerantReadMode { mode: ReadMode },

    #[error("diff scans require snapshot read mode, got {mode}")]
    DiffScanReadMode { mode: ReadMode },

    #[error("diff scans cannot be fault tolerant")]
    FaultTolerantDiffScan,

    #[error("diff scan start {start} must precede end {end}")]
    InvalidDiffScanRange { start: HybridTime, end: HybridTime },

    #[error("is-deleted column requires a diff scan")]
    IsDeletedWithoutDiffScan,

    #[error("is-deleted column is already projected")]
    IsDeletedAlreadyProjected,

    #[error("snapshot timestamp set under read mode {mode}")]
    SnapshotWithoutSnapshotMode { mode: ReadMode },

    #[error("snapshot timestamp {snapshot} precedes propagation lower bound {propagation}")]
    SnapshotBeforePropagation {
        snapshot: HybridTime,
        propagation: HybridTime,
    },

    #[error("scan configuration was already consumed")]
    Consumed,
}

impl ScanConfigError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Schema(err) => err.class(),
            Self::Predicate(err) => err.class(),
            Self::KeyEncode(err) => err.class(),
            Self::BoundSchemaMismatch
            | Self::NonPositiveLimit { .. }
            | Self::ZeroBatchSize
            | Self::SnapshotMicrosOverflow { .. }
            | Self::FaultTolerantReadMode { .. }
            | Self::DiffScanReadMode { .. }
            | Self::FaultTolerantDiffScan
            | Self::InvalidDiffScanRange { .. }
            | Self::SnapshotWithoutSnapshotMode { .. }
            | Self::SnapshotBeforePropagation { .. } => ErrorClass::InvalidArgument,
            Self::IsDeletedWithoutDiffScan
            | Self::IsDeletedAlreadyProjected
            | Self::Consumed => ErrorClass::IllegalState,
        }
    }
}
