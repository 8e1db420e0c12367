use serde::{Deserialize, Serialize};
use std::fmt;

/// Default RPC timeout forwarded with every scan.
pub const DEFAULT_SCAN_TIMEOUT_MILLIS: u64 = 30_000;

///
/// ReadMode
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
    /// Read whatever each replica has applied.
    #[default]
    Latest,
    /// Read at one snapshot timestamp.
    Snapshot,
    /// Read at a timestamp no earlier than the client's own writes.
    ReadYourWrites,
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Latest => "latest",
            Self::Snapshot => "snapshot",
            Self::ReadYourWrites => "read_your_writes",
        };
        f.write_str(label)
    }
}

///
/// ReplicaSelection
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaSelection {
    LeaderOnly,
    #[default]
    ClosestReplica,
    FirstReplica,
}

///
/// ScanOptions
///
/// Declarative scan settings, typically deserialized from configuration.
/// Applied through `ScanConfiguration::apply_options`, which runs the same
/// validation as the individual setters.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ScanOptions {
    pub cache_blocks: bool,
    pub batch_size_bytes: Option<u32>,
    pub selection: ReplicaSelection,
    /// `None` keeps the configuration's current read mode.
    pub read_mode: Option<ReadMode>,
    pub fault_tolerant: bool,
    pub timeout_millis: u64,
    pub row_format_flags: u64,
    pub limit: Option<i64>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            cache_blocks: true,
            batch_size_bytes: None,
            selection: ReplicaSelection::default(),
            read_mode: None,
            fault_tolerant: false,
            timeout_millis: DEFAULT_SCAN_TIMEOUT_MILLIS,
            row_format_flags: 0,
            limit: None,
        }
    }
}
