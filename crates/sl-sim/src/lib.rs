//! `sl-sim` — study orchestrator for the stormline framework.
//!
//! # Fan-out / fan-in per (event, line)
//!
//! ```text
//! seed table ──▶ LineRng ──▶ shared DrawMatrix (one per event × line)
//!                                  │
//!                 ┌────────────────┼────────────────┐
//!                 ▼                ▼                ▼
//!              tower 0          tower 1     …    tower N      (parallel)
//!          resolve → pc_wind → simulate + pull  (own TowerRng each)
//!                 └────────────────┼────────────────┘
//!                                  ▼
//!                             Aggregator
//!            cascade overlay → interaction overlay → tables
//! ```
//!
//! Lines within an event and events across a batch are independent; all
//! shared state is read-only static tables ([`Study`]).
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`config`]    | `StudyConfig` — nsims, seed table, flags              |
//! | [`runner`]    | `LineRunner`, `run_event`, the per-tower pipeline     |
//! | [`aggregate`] | overlays, probability tables, line statistics         |
//! | [`observer`]  | `RunObserver` progress callbacks                      |
//! | [`error`]     | `SimError`, `SimResult`                               |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs the per-tower fan-out on Rayon's thread pool.       |
//! | `fx-hash`  | FxHash for the aggregator's tower-slot lookups.          |
//! | `serde`    | Serde derives on result tables.                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sl_sim::{LineJob, NoopObserver, Study, StudyConfig, run_event};
//!
//! let config = StudyConfig::new(10_000).with_seed("storm-2014", "LineA", 42);
//! let study = Study { config: &config, terrain: &terrain, fragility: &frag, scale: &scale };
//! let report = run_event(study, "storm-2014", &jobs, &mut NoopObserver);
//! for (line, err) in report.failures() {
//!     eprintln!("{line} failed: {err}");
//! }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod observer;
pub mod runner;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use aggregate::{InteractionOverlay, LineDamage, LineStats, TowerDamage, combine_pull};
pub use config::StudyConfig;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RunObserver};
pub use runner::{EventReport, LineJob, LineRunner, Study, run_event};
