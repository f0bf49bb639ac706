//! `sl-wind` — from raw storm wind records to a conductor-relative,
//! height-corrected design-speed series.
//!
//! # Pipeline position
//!
//! ```text
//! CSV wind records ──► WindSeries ──► dir_speed × height_correction ──► resolved series
//!                                            │
//!                               (consumed by sl-fragility)
//! ```
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`terrain`]  | `TerrainTable` multiplier grid + height correction    |
//! | [`resolver`] | `dir_speed`, `resolve` — conductor-relative loading   |
//! | [`series`]   | `WindSeries` (timestamp, speed, bearing)              |
//! | [`loader`]   | CSV loader for storm-track exports                    |
//! | [`error`]    | `WindError`, `WindResult`                             |

pub mod error;
pub mod loader;
pub mod resolver;
pub mod series;
pub mod terrain;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{WindError, WindResult};
pub use loader::{load_wind_csv, load_wind_reader};
pub use resolver::{dir_speed, resolve};
pub use series::WindSeries;
pub use terrain::TerrainTable;
