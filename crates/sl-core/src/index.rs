//! Shared time index for one line's wind event.
//!
//! Time is represented as ordered Unix-second timestamps; all towers of one
//! line must share the same index for one event — the draw matrix and every
//! aggregated table are positional over it.  Integer seconds keep comparisons
//! exact (no datetime library, no floating-point drift).

use std::fmt;

/// Ordered timestamps (Unix seconds) shared by all towers of a line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeIndex(Vec<i64>);

impl TimeIndex {
    /// Wrap a timestamp list.  Callers are expected to pass ordered data;
    /// `is_ordered` exists for loaders that want to verify.
    pub fn new(timestamps: Vec<i64>) -> Self {
        Self(timestamps)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `true` if timestamps are strictly increasing.
    pub fn is_ordered(&self) -> bool {
        self.0.windows(2).all(|w| w[0] < w[1])
    }

    /// Timestamp at position `t`.
    #[inline]
    pub fn at(&self, t: usize) -> i64 {
        self.0[t]
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    /// `true` if `other` covers the same instants in the same order —
    /// the cross-tower alignment invariant for one line and one event.
    pub fn aligned_with(&self, other: &TimeIndex) -> bool {
        self.0 == other.0
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0.first(), self.0.last()) {
            (Some(a), Some(b)) => write!(f, "[{a}..{b}] ({} steps)", self.0.len()),
            _ => write!(f, "[] (0 steps)"),
        }
    }
}
