//! `sl-core` — foundational types for the `stormline` wind-damage framework.
//!
//! This crate is a dependency of every other `sl-*` crate.  It intentionally
//! has no `sl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `TowerId`, `LineId`                                    |
//! | [`damage`] | `DamageState`, ordered `DamageScale`                   |
//! | [`rng`]    | `LineRng` (per event/line), `TowerRng` (per tower)     |
//! | [`table`]  | `ProbTable`, `DrawMatrix`, `RankMatrix`                |
//! | [`index`]  | `TimeIndex` shared per-line timestamps                 |
//! | [`error`]  | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.       |

pub mod damage;
pub mod error;
pub mod ids;
pub mod index;
pub mod rng;
pub mod table;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use damage::{DamageScale, DamageState};
pub use error::{CoreError, CoreResult};
pub use ids::{LineId, TowerId};
pub use index::TimeIndex;
pub use rng::{LineRng, TowerRng};
pub use table::{DrawMatrix, ProbTable, RankMatrix};
