use crate::HYBRID_TIME_LOGICAL_BITS;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// HybridTime
///
/// Hybrid logical clock value: physical microseconds in the high bits, a
/// logical counter in the low `HYBRID_TIME_LOGICAL_BITS` bits. Raw values
/// order the same way the clock does.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct HybridTime(u64);

impl HybridTime {
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Hybrid time at the start of physical microsecond `micros`.
    ///
    /// Returns `None` when `micros` does not fit beside the logical bits.
    #[must_use]
    pub const fn from_micros(micros: u64) -> Option<Self> {
        if micros > (u64::MAX >> HYBRID_TIME_LOGICAL_BITS) {
            return None;
        }

        Some(Self(micros << HYBRID_TIME_LOGICAL_BITS))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn physical_micros(self) -> u64 {
        self.0 >> HYBRID_TIME_LOGICAL_BITS
    }

    #[must_use]
    pub const fn logical(self) -> u64 {
        self.0 & ((1 << HYBRID_TIME_LOGICAL_BITS) - 1)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_shift_past_the_logical_bits() {
        let ts = HybridTime::from_micros(5).unwrap();

        assert_eq!(ts.raw(), 5 << 12);
        assert_eq!(ts.physical_micros(), 5);
        assert_eq!(ts.logical(), 0);
        assert_eq!(HybridTime::from_raw((5 << 12) | 3).logical(), 3);
    }

    #[test]
    fn oversized_micros_are_rejected() {
        assert!(HybridTime::from_micros(u64::MAX >> 12).is_some());
        assert_eq!(HybridTime::from_micros((u64::MAX >> 12) + 1), None);
    }

    #[test]
    fn display_shows_the_raw_value() {
        assert_eq!(HybridTime::from_raw(4096).to_string(), "4096");
    }
}
