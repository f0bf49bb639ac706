//! The conditional adjacency model.
//!
//! Raw conditional-collapse tables are written for an unbounded window; a
//! tower near a line boundary has fewer real neighbors, so patterns are first
//! trimmed to the tower's valid window and merged.  Two derived structures
//! come out:
//!
//! - a **marginal map** — for each relative offset, the probability that the
//!   neighbor at that offset is pulled down by *some* collapse mode of this
//!   tower (the analytical engine's input);
//! - a **sampling distribution** — patterns sorted ascending by merged
//!   probability with running cumulative thresholds, mapping a uniform draw
//!   to one propagation outcome (the Monte Carlo engine's input).  Mass left
//!   above the final threshold means "no propagation".
//!
//! Both are static per tower/line topology: build once, reuse across events.
//!
//! Merging is a fold over a `BTreeMap` keyed by the sorted trimmed offsets,
//! so the merge result is independent of raw table ordering; ties in the
//! final probability sort break on the offsets themselves for the same
//! reason.

use std::collections::BTreeMap;

use sl_core::TowerId;

use crate::tower::Tower;
use crate::{CascadeError, CascadeResult};

/// Tolerance for the "total mass ≤ 1" check — covers accumulated rounding in
/// tables authored with three-figure probabilities.
const MASS_EPS: f64 = 1e-9;

/// One trimmed, merged collapse pattern with its cumulative threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    /// Sorted relative offsets (offset 0 — the tower itself — is stripped).
    pub offsets: Vec<i32>,
    /// Merged probability of this pattern.
    pub probability: f64,
    /// Running cumulative probability up to and including this pattern.
    pub cumulative: f64,
}

/// Per-tower conditional adjacency structures.
#[derive(Clone, Debug)]
pub struct CondAdjacency {
    marginal: BTreeMap<i32, f64>,
    patterns: Vec<Pattern>,
}

impl CondAdjacency {
    /// Build the model for one tower from its raw conditional table.
    ///
    /// Validates the sampling invariants (non-negative probabilities,
    /// offsets inside ±window, total mass ≤ 1) and rejects the tower before
    /// any simulation can consume a wrong distribution.
    pub fn build(tower: &Tower) -> CascadeResult<Self> {
        tower.validate()?;
        let window = tower.window as i32;

        // ── Trimmed valid window: contiguous non-sentinel run around 0 ────
        let mut neg_bound = 0;
        while neg_bound > -window && tower.neighbor(neg_bound - 1).is_some() {
            neg_bound -= 1;
        }
        let mut pos_bound = 0;
        while pos_bound < window && tower.neighbor(pos_bound + 1).is_some() {
            pos_bound += 1;
        }

        // ── Trim, strip offset 0, merge equal patterns ────────────────────
        let mut merged: BTreeMap<Vec<i32>, f64> = BTreeMap::new();
        for (offsets, prob) in &tower.cond_table {
            if *prob < 0.0 {
                return Err(CascadeError::NegativeProbability(*prob));
            }
            let mut trimmed: Vec<i32> = Vec::with_capacity(offsets.len());
            for &off in offsets {
                if off < -window || off > window {
                    return Err(CascadeError::OffsetOutOfWindow {
                        offset: off,
                        window: tower.window,
                    });
                }
                if off != 0 && off >= neg_bound && off <= pos_bound {
                    trimmed.push(off);
                }
            }
            trimmed.sort_unstable();
            trimmed.dedup();
            *merged.entry(trimmed).or_insert(0.0) += prob;
        }

        // Patterns that reduced to nothing carry no propagation mass.
        merged.remove(&Vec::new());

        // ── Marginal map ──────────────────────────────────────────────────
        let mut marginal: BTreeMap<i32, f64> = BTreeMap::new();
        for (offsets, prob) in &merged {
            for &off in offsets {
                *marginal.entry(off).or_insert(0.0) += prob;
            }
        }

        // ── Sampling distribution ─────────────────────────────────────────
        let mut ordered: Vec<(Vec<i32>, f64)> = merged.into_iter().collect();
        ordered.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let mut patterns = Vec::with_capacity(ordered.len());
        let mut cumulative = 0.0;
        for (offsets, probability) in ordered {
            cumulative += probability;
            patterns.push(Pattern { offsets, probability, cumulative });
        }
        if cumulative > 1.0 + MASS_EPS {
            return Err(CascadeError::MassExceedsOne(cumulative));
        }

        Ok(Self { marginal, patterns })
    }

    /// Marginal probability per relative offset.
    pub fn marginal(&self) -> &BTreeMap<i32, f64> {
        &self.marginal
    }

    /// Patterns in ascending probability order with cumulative thresholds.
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// `true` when the tower has no propagation modes at all (every pattern
    /// trimmed away) — the Monte Carlo engine skips sampling entirely.
    pub fn is_trivial(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Total propagation mass; the remainder up to 1 is "no propagation".
    pub fn total_mass(&self) -> f64 {
        self.patterns.last().map_or(0.0, |p| p.cumulative)
    }

    /// Map a uniform draw in `[0, 1)` to a propagation outcome.
    ///
    /// The selected index is the count of cumulative thresholds the draw
    /// reaches; an index equal to the pattern count means "no propagation"
    /// (`None`).
    pub fn classify(&self, draw: f64) -> Option<&Pattern> {
        let idx = self.patterns.iter().filter(|p| draw >= p.cumulative).count();
        self.patterns.get(idx)
    }

    /// Convert a pattern's relative offsets to absolute neighbor IDs through
    /// the tower's adjacency list.
    ///
    /// Trimming guarantees every surviving offset maps to a real neighbor;
    /// a sentinel here would mean the model was built for a different tower.
    pub fn absolute_neighbors(&self, tower: &Tower, pattern: &Pattern) -> Vec<TowerId> {
        pattern
            .offsets
            .iter()
            .filter_map(|&off| tower.neighbor(off))
            .collect()
    }
}
