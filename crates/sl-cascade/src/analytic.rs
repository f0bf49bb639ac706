//! Analytical (expected-value) propagation.
//!
//! For neighbor `j` of tower `i`, the collapse probability contributed by
//! `i`'s pull at each timestep is
//!
//!   Pc(j, i)[t] = P(j | i collapses) · Pc(i)[t]
//!
//! with `P(j | i)` the marginal adjacency probability and `Pc(i)` the
//! collapse column of `pc_wind`.  Combining contributions from several
//! originating towers onto one neighbor is the aggregator's job.

use std::collections::BTreeMap;

use sl_core::{ProbTable, TowerId};

use crate::model::CondAdjacency;
use crate::tower::Tower;

/// Per-neighbor pull-through collapse probability series.
///
/// Only offsets with nonzero marginal probability appear.  Deterministic
/// (no sampling); independent of `nsims`.
pub fn pull_probability(
    tower: &Tower,
    model: &CondAdjacency,
    pc_wind: &ProbTable,
    collapse_rank: u8,
) -> BTreeMap<TowerId, Vec<f64>> {
    let collapse = pc_wind.column(collapse_rank);

    let mut out = BTreeMap::new();
    for (&offset, &marginal) in model.marginal() {
        if marginal == 0.0 {
            continue;
        }
        // Trimming guarantees the offset maps to a real neighbor.
        if let Some(neighbor) = tower.neighbor(offset) {
            let series: Vec<f64> = collapse.iter().map(|&p| p * marginal).collect();
            out.insert(neighbor, series);
        }
    }
    out
}
