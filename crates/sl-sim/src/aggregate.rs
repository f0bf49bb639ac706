//! Fan-in: reduce per-tower simulation outcomes into line-level results.
//!
//! Order of operations per line:
//!
//! 1. Overlay cascade collapses — every source tower's cascade record raises
//!    the target (tower, sim, time) cell to the collapse rank.
//! 2. Overlay externally supplied line-interaction damage.  Both overlays go
//!    through [`RankMatrix::raise`], so the most severe state always wins and
//!    the application order of individual entries is irrelevant.
//! 3. Compute per-tower probability tables and line-level count statistics
//!    from the final rank matrices.
//!
//! The wind-only (non-cascading) variant of the same tables is produced from
//! the pre-overlay ranks unless the study skips it.

use std::collections::BTreeMap;

use sl_cascade::{CascadeMap, Line};
use sl_core::{DamageScale, LineId, ProbTable, RankMatrix, TowerId};

use crate::config::StudyConfig;
use crate::runner::TowerRun;

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

// ── Result types ──────────────────────────────────────────────────────────────

/// Externally supplied damage overlay entry: a triggering event on a
/// different, interacting line damages a tower of this line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InteractionOverlay {
    pub tower: TowerId,
    pub sim:   u32,
    pub time:  usize,
    pub rank:  u8,
}

/// Aggregated results for one tower.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TowerDamage {
    pub tower: TowerId,
    /// Time × state exceedance probabilities from the fragility evaluator.
    pub pc_wind: ProbTable,
    /// Time × state fraction of simulations in exactly that state, with
    /// cascade and interaction overlays applied.
    pub prob: ProbTable,
    /// Same table from wind-only ranks; `None` when the study skips it.
    pub prob_non_cascading: Option<ProbTable>,
    /// Analytical pull-through collapse series per neighbor.
    pub pull: BTreeMap<TowerId, Vec<f64>>,
}

/// Mean and population standard deviation of the per-state damaged-tower
/// count over time, indexed `[rank − 1][timestep]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStats {
    pub mean: Vec<Vec<f64>>,
    pub std:  Vec<Vec<f64>>,
}

/// Everything the pipeline produces for one (event, line) pair.
#[derive(Clone, Debug)]
pub struct LineDamage {
    pub line: LineId,
    pub name: String,
    pub towers: Vec<TowerDamage>,
    pub stats: LineStats,
    pub stats_non_cascading: Option<LineStats>,
    /// Raw per-simulation propagated-collapse mapping per source tower —
    /// the input for interaction-overlay logic on other lines.
    pub cascades: BTreeMap<TowerId, CascadeMap>,
    /// Analytical pull-through series per target tower, contributions from
    /// all source towers combined by complement-of-product.
    pub pull_combined: BTreeMap<TowerId, Vec<f64>>,
}

// ── Aggregation ───────────────────────────────────────────────────────────────

pub(crate) fn aggregate_line(
    line: &Line,
    runs: Vec<TowerRun>,
    overlay: &[InteractionOverlay],
    config: &StudyConfig,
    scale: &DamageScale,
) -> LineDamage {
    let nsims = config.nsims;
    let ntime = runs.first().map_or(0, |r| r.pc_wind.ntime());
    let collapse = scale.collapse_rank();

    let slot: Map<TowerId, usize> =
        line.tower_ids().enumerate().map(|(i, id)| (id, i)).collect();

    let mut final_ranks: Vec<RankMatrix> =
        runs.iter().map(|r| r.outcome.ranks.clone()).collect();

    // ── Cascade overlay ───────────────────────────────────────────────────
    for run in &runs {
        for (t, neighbor, sims) in run.outcome.cascade.iter() {
            if let Some(&i) = slot.get(&neighbor) {
                for &sim in sims {
                    final_ranks[i].raise(sim as usize, t, collapse);
                }
            }
        }
    }

    // ── Interaction overlay (validated upstream) ──────────────────────────
    for o in overlay {
        if let Some(&i) = slot.get(&o.tower) {
            final_ranks[i].raise(o.sim as usize, o.time, o.rank);
        }
    }

    // ── Line-level tables ─────────────────────────────────────────────────
    let final_refs: Vec<&RankMatrix> = final_ranks.iter().collect();
    let stats = line_stats(&final_refs, nsims, ntime, scale);
    let stats_non_cascading = if config.skip_non_cascading {
        None
    } else {
        let wind_ranks: Vec<&RankMatrix> =
            runs.iter().map(|r| &r.outcome.ranks).collect();
        Some(line_stats(&wind_ranks, nsims, ntime, scale))
    };

    let pull_combined = combine_pull(runs.iter().map(|r| &r.pull), ntime);
    let cascades = runs
        .iter()
        .map(|r| (r.outcome.tower, r.outcome.cascade.clone()))
        .collect();

    // ── Per-tower tables ──────────────────────────────────────────────────
    let towers = runs
        .into_iter()
        .zip(final_ranks)
        .map(|(run, ranks)| {
            let prob_non_cascading = if config.skip_non_cascading {
                None
            } else {
                Some(state_prob_table(&run.outcome.ranks, nsims, scale))
            };
            TowerDamage {
                tower: run.outcome.tower,
                pc_wind: run.pc_wind,
                prob: state_prob_table(&ranks, nsims, scale),
                prob_non_cascading,
                pull: run.pull,
            }
        })
        .collect();

    LineDamage {
        line: line.id,
        name: line.name.clone(),
        towers,
        stats,
        stats_non_cascading,
        cascades,
        pull_combined,
    }
}

/// Fraction of simulations in exactly each state per timestep.
fn state_prob_table(ranks: &RankMatrix, nsims: usize, scale: &DamageScale) -> ProbTable {
    let ntime = ranks.ntime();
    let mut out = ProbTable::zeros(ntime, scale.len());
    for state in scale.iter() {
        for t in 0..ntime {
            let count = ranks.sims_at(t, state.rank).len();
            *out.at_mut(t, state.rank) = count as f64 / nsims as f64;
        }
    }
    out
}

/// Mean/std over simulations of the count of towers in exactly each state.
fn line_stats(
    ranks: &[&RankMatrix],
    nsims: usize,
    ntime: usize,
    scale: &DamageScale,
) -> LineStats {
    let mut mean = vec![vec![0.0; ntime]; scale.len()];
    let mut std = vec![vec![0.0; ntime]; scale.len()];

    for state in scale.iter() {
        let rank = state.rank;
        let row = (rank - 1) as usize;
        for t in 0..ntime {
            let mut sum = 0.0;
            let mut sumsq = 0.0;
            for sim in 0..nsims {
                let count =
                    ranks.iter().filter(|m| m.at(sim, t) == rank).count() as f64;
                sum += count;
                sumsq += count * count;
            }
            let m = sum / nsims as f64;
            mean[row][t] = m;
            // Population variance; clamp against negative rounding residue.
            std[row][t] = (sumsq / nsims as f64 - m * m).max(0.0).sqrt();
        }
    }

    LineStats { mean, std }
}

/// Combine per-source pull-through series onto each target tower:
/// `1 − Π (1 − p_source)` per timestep.
pub fn combine_pull<'a>(
    pulls: impl Iterator<Item = &'a BTreeMap<TowerId, Vec<f64>>>,
    ntime: usize,
) -> BTreeMap<TowerId, Vec<f64>> {
    let mut survival: BTreeMap<TowerId, Vec<f64>> = BTreeMap::new();
    for pull in pulls {
        for (&target, series) in pull {
            let s = survival.entry(target).or_insert_with(|| vec![1.0; ntime]);
            for (t, &p) in series.iter().enumerate() {
                s[t] *= 1.0 - p;
            }
        }
    }
    survival
        .into_iter()
        .map(|(id, s)| (id, s.into_iter().map(|x| 1.0 - x).collect()))
        .collect()
}
