//! Module: scan::config
//! Responsibility: accumulate, validate and optimize one scan's configuration.
//! Does not own: predicate merge rules, key encoding, or the RPC that ships the scan spec.
//! Boundary: the only mutable entry point to a `ScanSpec`.

use crate::{
    DEFAULT_IS_DELETED_COLUMN, DataType,
    key::{BoundSide, encode_key_values},
    model::{ColumnSchema, Schema, Table},
    obs::{BoundTarget, MetricsEvent, sink::record},
    partition::PartitionKey,
    predicate::ColumnPredicate,
    row::PartialRow,
    scan::{
        DEFAULT_SCAN_TIMEOUT_MILLIS, HybridTime, ReadMode, ReplicaSelection, ScanConfigError,
        ScanOptions,
        arena::{ArenaSlice, ByteArena, Slab, SlabId},
        optimize::optimize,
        spec::ScanSpec,
    },
};
use std::{ops::Deref, sync::Arc};
use tracing::debug;

///
/// ScanState
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ScanState {
    #[default]
    Configuring,
    Optimized,
    Consumed,
}

///
/// ScanConfiguration
///
/// Builder for one logical scan. Owns the projection schemas and the bytes
/// of every bound it has merged; the `ScanSpec` refers into that storage by
/// handle, so a spec is only meaningful next to the configuration that
/// produced it.
///
/// Every rejected call leaves the configuration unchanged.
///

#[derive(Clone, Debug)]
pub struct ScanConfiguration {
    table: Table,
    schemas: Slab<Schema>,
    projection: SlabId<Schema>,
    is_deleted_column: Option<String>,
    spec: ScanSpec,
    arena: ByteArena,

    batch_size_bytes: Option<u32>,
    selection: ReplicaSelection,
    read_mode: ReadMode,
    fault_tolerant: bool,
    timeout_millis: u64,
    row_format_flags: u64,

    snapshot_timestamp: Option<HybridTime>,
    lower_bound_propagation_timestamp: Option<HybridTime>,
    diff_scan_start: Option<HybridTime>,

    state: ScanState,
}

impl ScanConfiguration {
    /// Configuration scanning every column of `table`.
    #[must_use]
    pub fn new(table: Table) -> Self {
        let mut schemas = Slab::new();
        let projection = schemas.insert(Schema::clone(table.schema()));

        Self {
            table,
            schemas,
            projection,
            is_deleted_column: None,
            spec: ScanSpec::new(),
            arena: ByteArena::new(),
            batch_size_bytes: None,
            selection: ReplicaSelection::default(),
            read_mode: ReadMode::default(),
            fault_tolerant: false,
            timeout_millis: DEFAULT_SCAN_TIMEOUT_MILLIS,
            row_format_flags: 0,
            snapshot_timestamp: None,
            lower_bound_propagation_timestamp: None,
            diff_scan_start: None,
            state: ScanState::Configuring,
        }
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    /// Project exactly the named columns, in the given order.
    ///
    /// Replaces any previous projection, including an is-deleted column.
    pub fn set_projected_column_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let projection = self.table.schema().project_by_names(names)?;
        self.replace_projection(projection);

        Ok(())
    }

    /// Project exactly the indexed table columns, in the given order.
    pub fn set_projected_column_indexes(
        &mut self,
        indexes: &[usize],
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let projection = self.table.schema().project_by_indexes(indexes)?;
        self.replace_projection(projection);

        Ok(())
    }

    fn replace_projection(&mut self, projection: Schema) {
        self.projection = self.schemas.insert(projection);
        self.is_deleted_column = None;
        self.spec.set_include_is_deleted(false);
        self.touch();
    }

    // ------------------------------------------------------------------
    // Predicates
    // ------------------------------------------------------------------

    /// AND a predicate into the scan after validating it against the table.
    pub fn add_conjunct_predicate(
        &mut self,
        predicate: ColumnPredicate,
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        predicate.validate(self.table.schema())?;

        self.add_validated_predicate(predicate)
    }

    /// AND a predicate that was already validated against this table,
    /// e.g. one rehydrated from a serialized spec.
    pub(crate) fn add_validated_predicate(
        &mut self,
        predicate: ColumnPredicate,
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let idx = self.table.schema().column_index(predicate.column())?;

        debug!(predicate = %predicate, "adding scan predicate");
        self.spec.predicates_mut().add(idx, predicate);
        self.touch();

        Ok(())
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// Narrow the inclusive primary-key lower bound to the key in `row`.
    pub fn add_lower_bound(&mut self, row: &PartialRow) -> Result<(), ScanConfigError> {
        let key = self.encode_bound_row(row)?;
        self.merge_bound(BoundTarget::PrimaryKey, BoundSide::Lower, &key)
    }

    /// Narrow the exclusive primary-key upper bound to the key in `row`.
    pub fn add_upper_bound(&mut self, row: &PartialRow) -> Result<(), ScanConfigError> {
        let key = self.encode_bound_row(row)?;
        self.merge_bound(BoundTarget::PrimaryKey, BoundSide::Upper, &key)
    }

    /// Narrow the primary-key lower bound to pre-encoded key bytes.
    ///
    /// An empty slice is unbounded and leaves the bound as it is.
    pub fn add_lower_bound_raw(&mut self, key: &[u8]) -> Result<(), ScanConfigError> {
        self.merge_bound(BoundTarget::PrimaryKey, BoundSide::Lower, key)
    }

    pub fn add_upper_bound_raw(&mut self, key: &[u8]) -> Result<(), ScanConfigError> {
        self.merge_bound(BoundTarget::PrimaryKey, BoundSide::Upper, key)
    }

    /// Narrow the partition-key lower bound used for partition pruning.
    pub fn add_lower_bound_partition_key_raw(
        &mut self,
        key: &PartitionKey,
    ) -> Result<(), ScanConfigError> {
        self.merge_bound(BoundTarget::PartitionKey, BoundSide::Lower, &key.encoded())
    }

    pub fn add_upper_bound_partition_key_raw(
        &mut self,
        key: &PartitionKey,
    ) -> Result<(), ScanConfigError> {
        self.merge_bound(BoundTarget::PartitionKey, BoundSide::Upper, &key.encoded())
    }

    fn encode_bound_row(&self, row: &PartialRow) -> Result<Vec<u8>, ScanConfigError> {
        self.ensure_open()?;
        let schema = self.table.schema();
        if !Arc::ptr_eq(row.schema(), schema) && row.schema().as_ref() != schema.as_ref() {
            return Err(ScanConfigError::BoundSchemaMismatch);
        }

        let values = row.key_values()?;

        Ok(encode_key_values(schema, &values)?)
    }

    // Merges that leave lower >= upper are accepted; optimization marks the
    // spec as unsatisfiable instead.
    fn merge_bound(
        &mut self,
        target: BoundTarget,
        side: BoundSide,
        key: &[u8],
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let tightened = self.spec.merge_bound(&mut self.arena, target, side, key);

        record(MetricsEvent::BoundMerged {
            target,
            side,
            tightened,
        });
        debug!(?target, %side, tightened, len = key.len(), "merged scan bound");
        self.touch();

        Ok(())
    }

    // ------------------------------------------------------------------
    // Scalar options
    // ------------------------------------------------------------------

    pub fn set_cache_blocks(&mut self, cache_blocks: bool) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.spec.set_cache_blocks(cache_blocks);
        self.touch();

        Ok(())
    }

    pub fn set_batch_size_bytes(&mut self, batch_size_bytes: u32) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if batch_size_bytes == 0 {
            return Err(ScanConfigError::ZeroBatchSize);
        }
        self.batch_size_bytes = Some(batch_size_bytes);
        self.touch();

        Ok(())
    }

    pub fn set_selection(&mut self, selection: ReplicaSelection) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.selection = selection;
        self.touch();

        Ok(())
    }

    /// Set the read mode.
    ///
    /// Fault-tolerant and diff scans only run in snapshot mode.
    pub fn set_read_mode(&mut self, mode: ReadMode) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if mode != ReadMode::Snapshot {
            if self.fault_tolerant {
                return Err(ScanConfigError::FaultTolerantReadMode { mode });
            }
            if self.is_diff_scan() {
                return Err(ScanConfigError::DiffScanReadMode { mode });
            }
        }
        self.read_mode = mode;
        self.touch();

        Ok(())
    }

    /// Enable or disable resumable scanning.
    ///
    /// Enabling switches a `Latest` scan to snapshot mode; read-your-writes
    /// scans and diff scans cannot be made fault tolerant.
    pub fn set_fault_tolerant(&mut self, fault_tolerant: bool) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if fault_tolerant {
            if self.is_diff_scan() {
                return Err(ScanConfigError::FaultTolerantDiffScan);
            }
            if self.read_mode == ReadMode::ReadYourWrites {
                return Err(ScanConfigError::FaultTolerantReadMode {
                    mode: self.read_mode,
                });
            }
            self.read_mode = ReadMode::Snapshot;
        }
        self.fault_tolerant = fault_tolerant;
        self.touch();

        Ok(())
    }

    pub fn set_timeout_millis(&mut self, timeout_millis: u64) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.timeout_millis = timeout_millis;
        self.touch();

        Ok(())
    }

    /// Opaque flags forwarded untouched to the row serialization layer.
    pub fn set_row_format_flags(&mut self, flags: u64) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.row_format_flags = flags;
        self.touch();

        Ok(())
    }

    pub fn set_limit(&mut self, limit: i64) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if limit <= 0 {
            return Err(ScanConfigError::NonPositiveLimit { limit });
        }
        self.spec.set_limit(limit);
        self.touch();

        Ok(())
    }

    /// Apply declarative options through the individual setters.
    ///
    /// All-or-nothing: if any option is rejected nothing is applied. Options
    /// without a read mode keep the current one.
    pub fn apply_options(&mut self, options: &ScanOptions) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let mut next = self.clone();

        next.set_cache_blocks(options.cache_blocks)?;
        if let Some(batch_size_bytes) = options.batch_size_bytes {
            next.set_batch_size_bytes(batch_size_bytes)?;
        }
        next.set_selection(options.selection)?;
        next.set_fault_tolerant(false)?;
        if let Some(mode) = options.read_mode {
            next.set_read_mode(mode)?;
        }
        next.set_fault_tolerant(options.fault_tolerant)?;
        next.set_timeout_millis(options.timeout_millis)?;
        next.set_row_format_flags(options.row_format_flags)?;
        if let Some(limit) = options.limit {
            next.set_limit(limit)?;
        }

        *self = next;

        Ok(())
    }

    // ------------------------------------------------------------------
    // Timestamps
    // ------------------------------------------------------------------

    /// Read at `timestamp`. Checked against the read mode at `consume`.
    pub fn set_snapshot_raw(&mut self, timestamp: HybridTime) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.snapshot_timestamp = Some(timestamp);
        self.touch();

        Ok(())
    }

    /// Read at the start of physical microsecond `micros`.
    pub fn set_snapshot_micros(&mut self, micros: u64) -> Result<(), ScanConfigError> {
        let timestamp = HybridTime::from_micros(micros)
            .ok_or(ScanConfigError::SnapshotMicrosOverflow { micros })?;

        self.set_snapshot_raw(timestamp)
    }

    /// Require the scan to observe everything committed before `timestamp`.
    pub fn set_scan_lower_bound_timestamp_raw(
        &mut self,
        timestamp: HybridTime,
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        self.lower_bound_propagation_timestamp = Some(timestamp);
        self.touch();

        Ok(())
    }

    /// Return only rows changed in `(start, end]`.
    ///
    /// Switches the scan to snapshot mode at `end`.
    pub fn set_diff_scan(
        &mut self,
        start: HybridTime,
        end: HybridTime,
    ) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if start >= end {
            return Err(ScanConfigError::InvalidDiffScanRange { start, end });
        }
        if self.fault_tolerant {
            return Err(ScanConfigError::FaultTolerantDiffScan);
        }

        self.read_mode = ReadMode::Snapshot;
        self.diff_scan_start = Some(start);
        self.snapshot_timestamp = Some(end);
        self.touch();

        Ok(())
    }

    /// Append the virtual is-deleted column to the projection.
    ///
    /// The column is named `is_deleted`, with underscores appended while that
    /// name is taken by the table or the projection.
    pub fn add_is_deleted_column(&mut self) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        if !self.is_diff_scan() {
            return Err(ScanConfigError::IsDeletedWithoutDiffScan);
        }
        if self.is_deleted_column.is_some() {
            return Err(ScanConfigError::IsDeletedAlreadyProjected);
        }

        let mut name = DEFAULT_IS_DELETED_COLUMN.to_string();
        while self.table.schema().find_column(&name).is_some()
            || self.projection().find_column(&name).is_some()
        {
            name.push('_');
        }

        let projection = self
            .projection()
            .with_appended_column(ColumnSchema::new_virtual(&name, DataType::Bool))?;
        self.projection = self.schemas.insert(projection);
        self.is_deleted_column = Some(name);
        self.spec.set_include_is_deleted(true);
        self.touch();

        Ok(())
    }

    // ------------------------------------------------------------------
    // Optimization and hand-off
    // ------------------------------------------------------------------

    /// Canonicalize the accumulated predicates and bounds.
    ///
    /// Safe to call repeatedly; a second call on an unchanged configuration
    /// leaves the scan spec as it is.
    pub fn optimize_scan_spec(&mut self) -> Result<(), ScanConfigError> {
        self.ensure_open()?;
        let mut spec = self.spec.clone();
        let summary = optimize(self.table.schema(), &mut spec, &mut self.arena)?;
        self.spec = spec;

        let provably_empty = self.spec.cant_be_satisfied();
        record(MetricsEvent::ScanOptimized {
            promoted: summary.promoted as u64,
            dropped: summary.dropped as u64,
            provably_empty,
        });
        debug!(
            table = self.table.name(),
            promoted = summary.promoted,
            dropped = summary.dropped,
            lower_tightened = summary.lower_tightened,
            upper_tightened = summary.upper_tightened,
            provably_empty,
            "optimized scan spec"
        );
        self.state = ScanState::Optimized;

        Ok(())
    }

    /// Run the deferred consistency checks, optimize if needed, and hand the
    /// finished scan to the caller. Later mutations fail with `Consumed`.
    pub fn consume(&mut self) -> Result<ScanRequest<'_>, ScanConfigError> {
        self.ensure_open()?;
        self.check_consistency()?;
        if self.state == ScanState::Configuring {
            self.optimize_scan_spec()?;
        }

        self.state = ScanState::Consumed;
        record(MetricsEvent::ScanConsumed);
        debug!(
            table = self.table.name(),
            read_mode = %self.read_mode,
            provably_empty = self.spec.cant_be_satisfied(),
            "consumed scan configuration"
        );

        Ok(ScanRequest { config: self })
    }

    fn check_consistency(&self) -> Result<(), ScanConfigError> {
        let Some(snapshot) = self.snapshot_timestamp else {
            return Ok(());
        };

        if self.read_mode != ReadMode::Snapshot {
            return Err(ScanConfigError::SnapshotWithoutSnapshotMode {
                mode: self.read_mode,
            });
        }
        if let Some(propagation) = self.lower_bound_propagation_timestamp
            && snapshot < propagation
        {
            return Err(ScanConfigError::SnapshotBeforePropagation {
                snapshot,
                propagation,
            });
        }
        if let Some(start) = self.diff_scan_start
            && start >= snapshot
        {
            return Err(ScanConfigError::InvalidDiffScanRange {
                start,
                end: snapshot,
            });
        }

        Ok(())
    }

    const fn ensure_open(&self) -> Result<(), ScanConfigError> {
        if matches!(self.state, ScanState::Consumed) {
            return Err(ScanConfigError::Consumed);
        }

        Ok(())
    }

    const fn touch(&mut self) {
        self.state = ScanState::Configuring;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    /// Active projection.
    #[must_use]
    pub fn projection(&self) -> &Schema {
        self.schemas.get(self.projection)
    }

    /// Handle of the active projection. Handles of replaced projections stay
    /// valid for the configuration's lifetime.
    #[must_use]
    pub const fn projection_id(&self) -> SlabId<Schema> {
        self.projection
    }

    #[must_use]
    pub fn schema(&self, id: SlabId<Schema>) -> &Schema {
        self.schemas.get(id)
    }

    #[must_use]
    pub fn is_deleted_column(&self) -> Option<&str> {
        self.is_deleted_column.as_deref()
    }

    #[must_use]
    pub const fn spec(&self) -> &ScanSpec {
        &self.spec
    }

    #[must_use]
    pub const fn arena(&self) -> &ByteArena {
        &self.arena
    }

    /// Bytes behind a bound handle of this configuration's spec.
    #[must_use]
    pub fn bound_bytes(&self, slice: ArenaSlice) -> &[u8] {
        self.arena.get(slice)
    }

    #[must_use]
    pub fn lower_bound_key(&self) -> Option<&[u8]> {
        self.spec.lower_bound_key().map(|s| self.arena.get(s))
    }

    #[must_use]
    pub fn exclusive_upper_bound_key(&self) -> Option<&[u8]> {
        self.spec.exclusive_upper_bound_key().map(|s| self.arena.get(s))
    }

    #[must_use]
    pub fn lower_bound_partition_key(&self) -> Option<&[u8]> {
        self.spec.lower_bound_partition_key().map(|s| self.arena.get(s))
    }

    #[must_use]
    pub fn exclusive_upper_bound_partition_key(&self) -> Option<&[u8]> {
        self.spec
            .exclusive_upper_bound_partition_key()
            .map(|s| self.arena.get(s))
    }

    #[must_use]
    pub const fn batch_size_bytes(&self) -> Option<u32> {
        self.batch_size_bytes
    }

    #[must_use]
    pub const fn selection(&self) -> ReplicaSelection {
        self.selection
    }

    #[must_use]
    pub const fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    #[must_use]
    pub const fn is_fault_tolerant(&self) -> bool {
        self.fault_tolerant
    }

    #[must_use]
    pub const fn timeout_millis(&self) -> u64 {
        self.timeout_millis
    }

    #[must_use]
    pub const fn row_format_flags(&self) -> u64 {
        self.row_format_flags
    }

    #[must_use]
    pub const fn snapshot_timestamp(&self) -> Option<HybridTime> {
        self.snapshot_timestamp
    }

    #[must_use]
    pub const fn lower_bound_propagation_timestamp(&self) -> Option<HybridTime> {
        self.lower_bound_propagation_timestamp
    }

    #[must_use]
    pub const fn diff_scan_start(&self) -> Option<HybridTime> {
        self.diff_scan_start
    }

    /// End of the diff-scan range, which is the snapshot it reads at.
    #[must_use]
    pub const fn diff_scan_end(&self) -> Option<HybridTime> {
        match self.diff_scan_start {
            Some(_) => self.snapshot_timestamp,
            None => None,
        }
    }

    #[must_use]
    pub const fn is_diff_scan(&self) -> bool {
        self.diff_scan_start.is_some()
    }

    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }
}

///
/// ScanRequest
///
/// Read-only view of a consumed configuration, handed to the RPC layer.
///

#[derive(Clone, Copy, Debug)]
pub struct ScanRequest<'a> {
    config: &'a ScanConfiguration,
}

impl ScanRequest<'_> {
    /// Return whether the server can be skipped entirely.
    #[must_use]
    pub const fn is_provably_empty(&self) -> bool {
        self.config.spec.cant_be_satisfied()
    }
}

impl Deref for ScanRequest<'_> {
    type Target = ScanConfiguration;

    fn deref(&self) -> &Self::Target {
        self.config
    }
}
