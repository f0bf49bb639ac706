//! Monte Carlo simulation of one tower's damage and cascade propagation.
//!
//! # Batched sampling
//!
//! Damage-state assignment is a whole-matrix comparison against the shared
//! draw matrix.  Propagation sampling then groups collapsed cells by
//! timestep: one pass over unique timesteps, one fresh uniform draw per
//! collapsed simulation — never one iteration per (simulation × timestep)
//! pair.
//!
//! # Determinism
//!
//! All fresh draws come from the tower's own [`TowerRng`], derived from the
//! (event, line) seed and the tower ID, so per-tower work can be fanned out
//! across threads in any order and still reproduce bit-identically.

use std::collections::BTreeMap;

use sl_core::{DamageScale, DrawMatrix, ProbTable, RankMatrix, TowerId, TowerRng};

use crate::model::CondAdjacency;
use crate::tower::Tower;

// ── CascadeMap ────────────────────────────────────────────────────────────────

/// Propagated-collapse record: timestep → absolute neighbor → simulation
/// indices whose collapse of the source tower pulls that neighbor down.
///
/// `BTreeMap` keys give a deterministic drain order for the aggregator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CascadeMap {
    inner: BTreeMap<usize, BTreeMap<TowerId, Vec<u32>>>,
}

impl CascadeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append simulation indices propagating to `neighbor` at `t`.
    pub fn record(&mut self, t: usize, neighbor: TowerId, sims: &[u32]) {
        self.inner
            .entry(t)
            .or_default()
            .entry(neighbor)
            .or_default()
            .extend_from_slice(sims);
    }

    /// Iterate `(timestep, neighbor, simulation indices)` in ascending
    /// (timestep, neighbor) order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, TowerId, &[u32])> {
        self.inner.iter().flat_map(|(&t, by_neighbor)| {
            by_neighbor
                .iter()
                .map(move |(&neighbor, sims)| (t, neighbor, sims.as_slice()))
        })
    }

    /// Neighbors propagated to at `t`, if any.
    pub fn neighbors_at(&self, t: usize) -> Option<&BTreeMap<TowerId, Vec<u32>>> {
        self.inner.get(&t)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of distinct timesteps with propagation.
    pub fn timestep_count(&self) -> usize {
        self.inner.len()
    }
}

// ── Rank assignment ───────────────────────────────────────────────────────────

/// Assign a damage-state rank to every `(simulation, timestep)` cell.
///
/// For each state in ascending severity order, the cell's shared draw
/// satisfies the state when `draw < pc_wind[t, state]`; the assigned rank is
/// the count of satisfied states (0 = undamaged).  The count form keeps the
/// rank well-defined even if a table's thresholds are not monotonic across
/// states — a modeling assumption this engine does not enforce.
pub fn assign_ranks(pc_wind: &ProbTable, draws: &DrawMatrix, scale: &DamageScale) -> RankMatrix {
    let nsims = draws.nsims();
    let ntime = draws.ntime();
    let mut ranks = RankMatrix::zeros(nsims, ntime);

    for sim in 0..nsims {
        for t in 0..ntime {
            let draw = draws.at(sim, t);
            let mut rank = 0u8;
            for state in scale.iter() {
                if draw < pc_wind.at(t, state.rank) {
                    rank += 1;
                }
            }
            ranks.set(sim, t, rank);
        }
    }
    ranks
}

// ── Tower simulation ──────────────────────────────────────────────────────────

/// One tower's simulated outcome: wind-induced ranks plus the cascade record.
#[derive(Clone, Debug)]
pub struct TowerOutcome {
    pub tower: TowerId,
    pub ranks: RankMatrix,
    pub cascade: CascadeMap,
}

/// Run the Monte Carlo engine for one tower.
///
/// `draws` is the line-shared uniform matrix (perfect correlation across the
/// line's towers); `rng` is the tower's own propagation-sampling generator.
pub fn simulate_tower(
    tower: &Tower,
    model: &CondAdjacency,
    pc_wind: &ProbTable,
    draws: &DrawMatrix,
    scale: &DamageScale,
    rng: &mut TowerRng,
) -> TowerOutcome {
    let ranks = assign_ranks(pc_wind, draws, scale);
    let collapse = scale.collapse_rank();
    let mut cascade = CascadeMap::new();

    if !model.is_trivial() {
        for t in 0..draws.ntime() {
            let collapsed = ranks.sims_at(t, collapse);
            if collapsed.is_empty() {
                continue;
            }

            // One fresh draw per collapsed simulation, classified against the
            // cumulative thresholds; group the selections per pattern before
            // converting offsets to absolute IDs.
            let fresh = rng.uniform_vec(collapsed.len());
            let mut by_pattern: BTreeMap<usize, Vec<u32>> = BTreeMap::new();
            for (&sim, &draw) in collapsed.iter().zip(&fresh) {
                let idx = model
                    .patterns()
                    .iter()
                    .filter(|p| draw >= p.cumulative)
                    .count();
                if idx < model.patterns().len() {
                    by_pattern.entry(idx).or_default().push(sim);
                }
            }

            for (idx, sims) in by_pattern {
                let pattern = &model.patterns()[idx];
                for neighbor in model.absolute_neighbors(tower, pattern) {
                    cascade.record(t, neighbor, &sims);
                }
            }
        }
    }

    TowerOutcome { tower: tower.id, ranks, cascade }
}
