use std::fmt;

///
/// BoundSide
///
/// Which end of a key range a bound constrains. Lower bounds are inclusive,
/// upper bounds exclusive; an empty byte string means "unbounded".
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundSide {
    Lower,
    Upper,
}

impl BoundSide {
    /// Return whether `candidate` narrows the range more than `current`.
    ///
    /// Lower bounds keep the maximum, upper bounds keep the minimum.
    #[must_use]
    pub fn is_tighter(self, current: &[u8], candidate: &[u8]) -> bool {
        if candidate.is_empty() {
            return false;
        }
        if current.is_empty() {
            return true;
        }

        match self {
            Self::Lower => candidate > current,
            Self::Upper => candidate < current,
        }
    }
}

impl fmt::Display for BoundSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lower => f.write_str("lower"),
            Self::Upper => f.write_str("upper"),
        }
    }
}

/// Return whether `[lower, upper)` admits no key.
#[must_use]
pub fn is_empty_range(lower: &[u8], upper: &[u8]) -> bool {
    !upper.is_empty() && lower >= upper
}

/// Smallest byte string greater than every string that starts with `prefix`.
///
/// Returns `None` when no such string exists (empty or all-`0xFF` prefix).
#[must_use]
pub fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let last = prefix.iter().rposition(|&byte| byte != 0xFF)?;

    let mut out = prefix[..=last].to_vec();
    out[last] += 1;

    Some(out)
}
