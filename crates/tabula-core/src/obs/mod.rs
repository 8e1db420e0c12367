//! Observability: in-process counters and the sink they are recorded through.
//!
//! Scan and row code never touch counter state directly; every
//! instrumentation point emits a `MetricsEvent` via `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventState, RowCounters, ScanCounters};
pub use sink::{
    BoundTarget, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink,
};
