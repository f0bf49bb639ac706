//! Deterministic per-line and per-tower RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each (event, line) pair owns one `LineRng`, seeded from the study's seed
//! table.  The shared uniform-draw matrix for a line comes from that
//! generator, giving perfect correlation of wind-damage draws across the
//! line's towers.
//!
//! Each tower additionally gets its own independent `TowerRng` seeded by:
//!
//!   seed = line_seed XOR (tower_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive tower IDs uniformly across the seed space.
//! This means:
//!
//! - Towers never share propagation-sampling RNG state, so the per-tower
//!   fan-out can run on any number of threads in any order and still produce
//!   bit-identical cascade outcomes.
//! - Adding towers to a line does not disturb the seeds of existing towers.
//!
//! An unseeded mode exists for studies that explicitly opt out of
//! reproducibility; there is deliberately no process-global generator.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::TowerId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── LineRng ───────────────────────────────────────────────────────────────────

/// Per-(event, line) deterministic RNG.
///
/// Source of the shared uniform-draw matrix.  The type is `!Sync` to prevent
/// accidental sharing across threads — the draw matrix is generated once,
/// sequentially, before the per-tower fan-out.
pub struct LineRng(SmallRng);

impl LineRng {
    /// Seed deterministically from the study's (event, line) seed.
    pub fn new(seed: u64) -> Self {
        LineRng(SmallRng::seed_from_u64(seed))
    }

    /// Entropy-seeded generator for non-reproducible runs.
    pub fn unseeded() -> Self {
        LineRng(SmallRng::from_entropy())
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// One uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Fill a freshly allocated buffer with `n` uniform draws in `[0, 1)`.
    pub fn uniform_vec(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.0.r#gen::<f64>()).collect()
    }
}

// ── TowerRng ──────────────────────────────────────────────────────────────────

/// Per-tower deterministic RNG for adjacency-propagation sampling.
///
/// Create one per tower from the line seed at fan-out time; each Rayon worker
/// holds its own instance, so no synchronisation is needed.
pub struct TowerRng(SmallRng);

impl TowerRng {
    /// Seed deterministically from the line seed and a tower ID.
    pub fn new(line_seed: u64, tower: TowerId) -> Self {
        let seed = line_seed ^ (tower.0 as u64).wrapping_mul(MIXING_CONSTANT);
        TowerRng(SmallRng::seed_from_u64(seed))
    }

    /// Entropy-seeded variant for non-reproducible runs.
    pub fn unseeded() -> Self {
        TowerRng(SmallRng::from_entropy())
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// One uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// `n` uniform draws in `[0, 1)`.
    pub fn uniform_vec(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.0.r#gen::<f64>()).collect()
    }
}
