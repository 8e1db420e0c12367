//! Scan-spec assembly: projection, predicates, key bounds and consistency
//! settings, canonicalized before the scan spec is handed to the RPC layer.

mod arena;
mod config;
mod error;
mod optimize;
mod options;
mod spec;
mod timestamp;


pub use arena::{ArenaSlice, ByteArena, Slab, SlabId};
pub use config::{ScanConfiguration, ScanRequest, ScanState};
pub use error::ScanConfigError;
pub use options::{DEFAULT_SCAN_TIMEOUT_MILLIS, ReadMode, ReplicaSelection, ScanOptions};
pub use spec::ScanSpec;
pub use timestamp::HybridTime;
