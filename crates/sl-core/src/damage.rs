//! Damage-state model.
//!
//! A damage state is a severity-ranked outcome label ("minor", "collapse", …).
//! Ranks start at 1 and are contiguous; rank 0 is reserved for "undamaged"
//! and never appears in the scale itself.  The highest rank is always the
//! collapse state — the only state that triggers adjacency propagation.
//!
//! Fragility curves, simulated rank matrices, and aggregated probability
//! tables all index damage states by `rank - 1`.

use crate::{CoreError, CoreResult};

/// One severity-ranked damage state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageState {
    /// Label used in fragility tables and output columns (e.g. "minor").
    pub name: String,
    /// Severity rank, 1-based.  Larger = more severe.
    pub rank: u8,
}

/// The ordered set of damage states used throughout a study.
///
/// Construction validates the ordering invariant once so every downstream
/// consumer can index by rank without re-checking.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageScale {
    states: Vec<DamageState>,
}

impl DamageScale {
    /// Build a scale from `(name, rank)` pairs.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidScale`] if the list is empty, ranks are not
    /// contiguous from 1, or the pairs are not in ascending severity order.
    pub fn new<S: Into<String>>(pairs: Vec<(S, u8)>) -> CoreResult<Self> {
        if pairs.is_empty() {
            return Err(CoreError::InvalidScale("no damage states defined".into()));
        }
        let states: Vec<DamageState> = pairs
            .into_iter()
            .map(|(name, rank)| DamageState { name: name.into(), rank })
            .collect();
        for (i, s) in states.iter().enumerate() {
            if s.rank as usize != i + 1 {
                return Err(CoreError::InvalidScale(format!(
                    "state '{}' has rank {}, expected {}",
                    s.name,
                    s.rank,
                    i + 1
                )));
            }
        }
        Ok(Self { states })
    }

    /// The conventional two-state scale: minor (1), collapse (2).
    pub fn minor_collapse() -> Self {
        Self::new(vec![("minor", 1), ("collapse", 2)])
            .expect("static scale is valid")
    }

    /// Number of damage states (excluding the implicit "undamaged" rank 0).
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Rank of the collapse state — always the highest rank in the scale.
    #[inline]
    pub fn collapse_rank(&self) -> u8 {
        self.states.len() as u8
    }

    /// Look up a state's rank by label.  Returns `None` for unknown labels.
    pub fn rank_of(&self, name: &str) -> Option<u8> {
        self.states.iter().find(|s| s.name == name).map(|s| s.rank)
    }

    /// State at `rank` (1-based).
    #[inline]
    pub fn state(&self, rank: u8) -> &DamageState {
        &self.states[rank as usize - 1]
    }

    /// Iterate states in ascending severity order.
    pub fn iter(&self) -> impl Iterator<Item = &DamageState> {
        self.states.iter()
    }
}
