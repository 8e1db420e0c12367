use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// EventState
/// Ephemeral, in-memory counters for scan planning and row encoding.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventState {
    pub scan: ScanCounters,
    pub rows: RowCounters,
}

///
/// ScanCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScanCounters {
    // Optimizer
    pub optimized: u64,
    pub predicates_promoted: u64,
    pub predicates_dropped: u64,
    pub provably_empty: u64,

    // Bounds
    pub key_bounds_merged: u64,
    pub partition_bounds_merged: u64,
    pub bounds_tightened: u64,

    pub consumed: u64,
}

///
/// RowCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RowCounters {
    pub sealed: u64,
    pub encoded: u64,
    pub encoded_bytes: u64,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot of the current counters.
pub(crate) fn report() -> EventState {
    with_state(Clone::clone)
}
