//! Client core for Tabula: scan-spec assembly and optimization, and the
//! binary encoding of row mutations handed to the batching layer.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod error;
pub mod key;
pub mod model;
pub mod obs;
pub mod partition;
pub mod predicate;
pub mod row;
pub mod scan;
pub mod value;

pub use error::Error;
pub use tabula_primitives::DataType;

///
/// CONSTANTS
///

/// Name given to the virtual is-deleted column when the table does not
/// already use it.
pub const DEFAULT_IS_DELETED_COLUMN: &str = "is_deleted";

/// Number of low bits of a hybrid timestamp reserved for the logical counter.
pub const HYBRID_TIME_LOGICAL_BITS: u32 = 12;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or arena internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{ColumnSchema, Schema, SchemaBuilder, Table},
        partition::{Partition, PartitionKey},
        predicate::{ColumnPredicate, CompareOp},
        row::{PartialRow, WriteKind, WriteOperation},
        scan::{HybridTime, ReadMode, ReplicaSelection, ScanConfiguration, ScanOptions, ScanSpec},
        value::Value,
    };
    pub use tabula_primitives::DataType;
}
