//! Metrics sink boundary.
//!
//! Scan and row logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{key::BoundSide, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// BoundTarget
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundTarget {
    PrimaryKey,
    PartitionKey,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    BoundMerged {
        target: BoundTarget,
        side: BoundSide,
        tightened: bool,
    },
    ScanOptimized {
        promoted: u64,
        dropped: u64,
        provably_empty: bool,
    },
    ScanConsumed,
    RowSealed {
        size: u64,
    },
    RowEncoded {
        bytes: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::BoundMerged {
                target, tightened, ..
            } => {
                metrics::with_state_mut(|m| {
                    match target {
                        BoundTarget::PrimaryKey => {
                            m.scan.key_bounds_merged = m.scan.key_bounds_merged.saturating_add(1);
                        }
                        BoundTarget::PartitionKey => {
                            m.scan.partition_bounds_merged =
                                m.scan.partition_bounds_merged.saturating_add(1);
                        }
                    }
                    if tightened {
                        m.scan.bounds_tightened = m.scan.bounds_tightened.saturating_add(1);
                    }
                });
            }

            MetricsEvent::ScanOptimized {
                promoted,
                dropped,
                provably_empty,
            } => {
                metrics::with_state_mut(|m| {
                    m.scan.optimized = m.scan.optimized.saturating_add(1);
                    m.scan.predicates_promoted =
                        m.scan.predicates_promoted.saturating_add(promoted);
                    m.scan.predicates_dropped = m.scan.predicates_dropped.saturating_add(dropped);
                    if provably_empty {
                        m.scan.provably_empty = m.scan.provably_empty.saturating_add(1);
                    }
                });
            }

            MetricsEvent::ScanConsumed => {
                metrics::with_state_mut(|m| {
                    m.scan.consumed = m.scan.consumed.saturating_add(1);
                });
            }

            MetricsEvent::RowSealed { .. } => {
                metrics::with_state_mut(|m| {
                    m.rows.sealed = m.rows.sealed.saturating_add(1);
                });
            }

            MetricsEvent::RowEncoded { bytes } => {
                metrics::with_state_mut(|m| {
                    m.rows.encoded = m.rows.encoded.saturating_add(1);
                    m.rows.encoded_bytes = m.rows.encoded_bytes.saturating_add(bytes);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        // - Only a shared reference is materialized, matching the borrow given to
        //   `with_metrics_sink`.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's counters.
#[must_use]
pub fn metrics_report() -> metrics::EventState {
    metrics::report()
}

/// Reset the current thread's counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events recorded by `f` on this thread go to `sink` instead of the
/// thread-local counters. Overrides nest; the previous sink is restored on
/// return and on unwind.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on all exits.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink<'a> {
        calls: &'a AtomicUsize,
    }

    impl MetricsSink for CountingSink<'_> {
        fn record(&self, _: MetricsEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn with_metrics_sink_routes_and_restores_nested_overrides() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let outer_calls = AtomicUsize::new(0);
        let inner_calls = AtomicUsize::new(0);
        let outer = CountingSink {
            calls: &outer_calls,
        };
        let inner = CountingSink {
            calls: &inner_calls,
        };

        record(MetricsEvent::ScanConsumed);
        assert_eq!(outer_calls.load(Ordering::SeqCst), 0);

        with_metrics_sink(&outer, || {
            record(MetricsEvent::ScanConsumed);
            assert_eq!(outer_calls.load(Ordering::SeqCst), 1);

            with_metrics_sink(&inner, || {
                record(MetricsEvent::RowEncoded { bytes: 4 });
            });

            record(MetricsEvent::RowSealed { size: 4 });
        });

        assert_eq!(outer_calls.load(Ordering::SeqCst), 2);
        assert_eq!(inner_calls.load(Ordering::SeqCst), 1);
        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn with_metrics_sink_restores_override_on_panic() {
        SINK_OVERRIDE.with(|cell| {
            *cell.borrow_mut() = None;
        });

        let calls = AtomicUsize::new(0);
        let sink = CountingSink { calls: &calls };

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            with_metrics_sink(&sink, || {
                record(MetricsEvent::ScanConsumed);
                panic!("intentional panic for guard test");
            });
        }))
        .is_err();
        assert!(panicked);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        SINK_OVERRIDE.with(|cell| {
            assert!(cell.borrow().is_none());
        });
    }

    #[test]
    fn global_sink_accumulates_counters() {
        metrics_reset_all();

        record(MetricsEvent::ScanOptimized {
            promoted: 2,
            dropped: 1,
            provably_empty: true,
        });
        record(MetricsEvent::BoundMerged {
            target: BoundTarget::PartitionKey,
            side: BoundSide::Upper,
            tightened: true,
        });
        record(MetricsEvent::RowEncoded { bytes: 12 });
        record(MetricsEvent::RowEncoded { bytes: 8 });

        let report = metrics_report();
        assert_eq!(report.scan.optimized, 1);
        assert_eq!(report.scan.predicates_promoted, 2);
        assert_eq!(report.scan.predicates_dropped, 1);
        assert_eq!(report.scan.provably_empty, 1);
        assert_eq!(report.scan.partition_bounds_merged, 1);
        assert_eq!(report.scan.bounds_tightened, 1);
        assert_eq!(report.rows.encoded, 2);
        assert_eq!(report.rows.encoded_bytes, 20);

        metrics_reset_all();
        assert_eq!(metrics_report(), metrics::EventState::default());
    }
}
