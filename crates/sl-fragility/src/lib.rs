//! `sl-fragility` — fragility curves and the per-tower exceedance evaluator.
//!
//! A fragility curve gives the probability that a tower reaches or exceeds a
//! damage state as a function of its load ratio (resolved wind speed over
//! collapse-capacity speed).  Parameters are bracketed by the tower's
//! deviation angle and keyed by structural type and function.
//!
//! | Module      | Contents                                               |
//! |-------------|--------------------------------------------------------|
//! | [`lognorm`] | erf, standard-normal CDF, log-normal CDF               |
//! | [`table`]   | `FragilityTable` with deviation-angle brackets         |
//! | [`loader`]  | CSV loader for fragility parameter rows                |
//! | [`evaluator`]| `pc_wind` — time × state exceedance table             |
//! | [`error`]   | `FragilityError`, `FragilityResult`                    |

pub mod error;
pub mod evaluator;
pub mod loader;
pub mod lognorm;
pub mod table;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{FragilityError, FragilityResult};
pub use evaluator::pc_wind;
pub use loader::{load_fragility_csv, load_fragility_reader};
pub use lognorm::{lognorm_cdf, norm_cdf};
pub use table::{Bracket, CurveParams, DistFamily, FragilityTable};
