//! Dense matrices used by the damage pipeline.
//!
//! All three types are flat row-major `Vec`s with explicit dimensions — the
//! whole pipeline is data-parallel over these arrays, so storage stays
//! cache-friendly and trivially shareable (`&ProbTable` across workers).
//!
//! | Type         | Shape           | Element | Meaning                        |
//! |--------------|-----------------|---------|--------------------------------|
//! | `ProbTable`  | ntime × nstates | `f64`   | P(state reached or exceeded)   |
//! | `DrawMatrix` | nsims × ntime   | `f64`   | uniform draw in `[0, 1)`       |
//! | `RankMatrix` | nsims × ntime   | `u8`    | assigned damage rank (0 = none)|

use crate::rng::LineRng;
use crate::{CoreError, CoreResult};

// ── ProbTable ─────────────────────────────────────────────────────────────────

/// Time × damage-state matrix of cumulative exceedance probabilities
/// (`pc_wind`).  Built once per tower per event, then read-only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProbTable {
    ntime: usize,
    nstates: usize,
    data: Vec<f64>,
}

impl ProbTable {
    /// Zero-filled table.
    pub fn zeros(ntime: usize, nstates: usize) -> Self {
        Self { ntime, nstates, data: vec![0.0; ntime * nstates] }
    }

    /// Build from a flat row-major buffer (row = timestep).
    pub fn from_rows(ntime: usize, nstates: usize, data: Vec<f64>) -> CoreResult<Self> {
        if data.len() != ntime * nstates {
            return Err(CoreError::ShapeMismatch {
                expected: ntime * nstates,
                got: data.len(),
                what: "probability table",
            });
        }
        Ok(Self { ntime, nstates, data })
    }

    #[inline]
    pub fn ntime(&self) -> usize {
        self.ntime
    }

    #[inline]
    pub fn nstates(&self) -> usize {
        self.nstates
    }

    /// Probability at `(timestep, rank)` where `rank` is 1-based.
    #[inline]
    pub fn at(&self, t: usize, rank: u8) -> f64 {
        self.data[t * self.nstates + (rank as usize - 1)]
    }

    /// Mutable access for the evaluator.
    #[inline]
    pub fn at_mut(&mut self, t: usize, rank: u8) -> &mut f64 {
        &mut self.data[t * self.nstates + (rank as usize - 1)]
    }

    /// Column for one damage state as an owned series.
    pub fn column(&self, rank: u8) -> Vec<f64> {
        (0..self.ntime).map(|t| self.at(t, rank)).collect()
    }
}

// ── DrawMatrix ────────────────────────────────────────────────────────────────

/// `nsims × ntime` matrix of independent uniform draws, shared by every tower
/// of one line for one event (perfect correlation within a line).
#[derive(Clone, Debug, PartialEq)]
pub struct DrawMatrix {
    nsims: usize,
    ntime: usize,
    data: Vec<f64>,
}

impl DrawMatrix {
    /// Generate from a line-scoped RNG.
    pub fn uniform(rng: &mut LineRng, nsims: usize, ntime: usize) -> Self {
        Self { nsims, ntime, data: rng.uniform_vec(nsims * ntime) }
    }

    /// Wrap an existing buffer (tests, externally supplied draws).
    pub fn from_raw(nsims: usize, ntime: usize, data: Vec<f64>) -> CoreResult<Self> {
        if data.len() != nsims * ntime {
            return Err(CoreError::ShapeMismatch {
                expected: nsims * ntime,
                got: data.len(),
                what: "draw matrix",
            });
        }
        Ok(Self { nsims, ntime, data })
    }

    #[inline]
    pub fn nsims(&self) -> usize {
        self.nsims
    }

    #[inline]
    pub fn ntime(&self) -> usize {
        self.ntime
    }

    #[inline]
    pub fn at(&self, sim: usize, t: usize) -> f64 {
        self.data[sim * self.ntime + t]
    }
}

// ── RankMatrix ────────────────────────────────────────────────────────────────

/// `nsims × ntime` matrix of assigned damage-state ranks (0 = undamaged).
#[derive(Clone, Debug, PartialEq)]
pub struct RankMatrix {
    nsims: usize,
    ntime: usize,
    data: Vec<u8>,
}

impl RankMatrix {
    pub fn zeros(nsims: usize, ntime: usize) -> Self {
        Self { nsims, ntime, data: vec![0; nsims * ntime] }
    }

    #[inline]
    pub fn nsims(&self) -> usize {
        self.nsims
    }

    #[inline]
    pub fn ntime(&self) -> usize {
        self.ntime
    }

    #[inline]
    pub fn at(&self, sim: usize, t: usize) -> u8 {
        self.data[sim * self.ntime + t]
    }

    #[inline]
    pub fn set(&mut self, sim: usize, t: usize, rank: u8) {
        self.data[sim * self.ntime + t] = rank;
    }

    /// Raise the rank at `(sim, t)` to `rank` if it is more severe than the
    /// current value.  Used by cascade and interaction overlays so the most
    /// severe state always wins.
    #[inline]
    pub fn raise(&mut self, sim: usize, t: usize, rank: u8) {
        let cell = &mut self.data[sim * self.ntime + t];
        if rank > *cell {
            *cell = rank;
        }
    }

    /// Simulation indices assigned exactly `rank` at timestep `t`.
    pub fn sims_at(&self, t: usize, rank: u8) -> Vec<u32> {
        (0..self.nsims)
            .filter(|&sim| self.at(sim, t) == rank)
            .map(|sim| sim as u32)
            .collect()
    }
}
