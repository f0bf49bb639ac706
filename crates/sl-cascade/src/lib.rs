//! `sl-cascade` — tower topology and cascading-collapse propagation.
//!
//! When a tower collapses under wind load it can pull neighboring towers
//! down with it.  The raw input is a conditional-collapse table per tower: a
//! set of *patterns* (relative neighbor offsets that fall together) with
//! probabilities.  This crate turns that table into reusable per-tower
//! structures and drives both propagation modes:
//!
//! ```text
//!             ┌── CondAdjacency (built once per topology) ──┐
//! raw table ──┤  marginal map: offset → P(offset affected)  │
//!             └  sampling distribution (cumulative)         ┘
//!                      │                      │
//!             analytic::pull_probability   mc::simulate_tower
//!             (expected value)             (per-simulation outcomes)
//! ```
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`tower`]  | `Tower`, `Line`, collapse capacity, topo adjustment     |
//! | [`model`]  | `CondAdjacency` — marginal map + sampling distribution  |
//! | [`analytic`]| expected-value pull-through propagation                |
//! | [`mc`]     | Monte Carlo rank assignment + cascade sampling          |
//! | [`error`]  | `CascadeError`, `CascadeResult`                         |

pub mod analytic;
pub mod error;
pub mod mc;
pub mod model;
pub mod tower;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use analytic::pull_probability;
pub use error::{CascadeError, CascadeResult};
pub use mc::{CascadeMap, TowerOutcome, assign_ranks, simulate_tower};
pub use model::{CondAdjacency, Pattern};
pub use tower::{CircuitKind, Line, TopoAdjustment, Tower, collapse_capacity};
