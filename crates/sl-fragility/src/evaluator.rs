//! The `pc_wind` evaluator: resolved wind series → time × state exceedance
//! probability table.

use sl_core::{DamageScale, ProbTable};

use crate::lognorm::lognorm_cdf;
use crate::table::{DistFamily, FragilityTable};
use crate::FragilityResult;

/// Build one tower's `pc_wind` table.
///
/// For each timestep the load ratio is `resolved_speed[t] / collapse_capacity`
/// and each damage state's column holds the fragility curve's CDF at that
/// ratio — the probability the state is reached or exceeded.
///
/// # Errors
///
/// Propagates bracket selection failures ([`FragilityError::MissingEntry`],
/// [`FragilityError::NoBracket`]); both abort this tower's processing.
///
/// [`FragilityError::MissingEntry`]: crate::FragilityError::MissingEntry
/// [`FragilityError::NoBracket`]: crate::FragilityError::NoBracket
pub fn pc_wind(
    table: &FragilityTable,
    ttype: &str,
    funct: &str,
    dev_angle: f64,
    collapse_capacity: f64,
    resolved_speed: &[f64],
    scale: &DamageScale,
) -> FragilityResult<ProbTable> {
    let bracket = table.select(ttype, funct, dev_angle)?;

    let ntime = resolved_speed.len();
    let mut out = ProbTable::zeros(ntime, scale.len());

    for state in scale.iter() {
        let params = bracket.curve(state.rank);
        match params.family {
            DistFamily::Lognormal => {
                for (t, &speed) in resolved_speed.iter().enumerate() {
                    let ratio = speed / collapse_capacity;
                    *out.at_mut(t, state.rank) = lognorm_cdf(ratio, params.median, params.shape);
                }
            }
        }
    }

    Ok(out)
}
