//! Directional wind resolver.
//!
//! A conductor span is most heavily loaded when the wind blows perpendicular
//! to it.  With `phi` the angle between the wind bearing and the conductor
//! axis (strong axis − 90°), the span presents its full cross-section when
//! `phi` is within 45° of 0° or 180°; inside that band the effective speed is
//!
//!   speed · max(|cos(45° − phi)|, |sin(45° − phi)|)
//!
//! and outside it the speed passes through unchanged.  The max(|cos|, |sin|)
//! form exploits the 90° symmetry of the span geometry, which also makes the
//! result invariant under `bearing → bearing + π` (wind reversal).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::WindSeries;

/// Conductor-relative effective wind speed for one sample.
///
/// `conductor_axis` is in radians relative to North (strong axis − 90°);
/// `bearing` is the wind bearing in radians.
pub fn dir_speed(speed: f64, bearing: f64, conductor_axis: f64) -> f64 {
    let phi = (bearing - conductor_axis).abs();

    // Full-load band: within 45° of 0° or 180°, including the wrap past 315°.
    let loaded = phi <= FRAC_PI_4
        || phi > 7.0 * FRAC_PI_4
        || (phi > 3.0 * FRAC_PI_4 && phi <= 5.0 * FRAC_PI_4);

    if loaded {
        let cos_ = (FRAC_PI_4 - phi).cos().abs();
        let sin_ = (FRAC_PI_4 - phi).sin().abs();
        speed * cos_.max(sin_)
    } else {
        speed
    }
}

/// Resolve a raw wind series into a height- and direction-corrected
/// design-speed series for one tower.
///
/// `strong_axis_deg` is the azimuth of the tower's strong axis relative to
/// North; `height_correction` comes from
/// [`TerrainTable::height_correction`][crate::TerrainTable::height_correction].
pub fn resolve(series: &WindSeries, strong_axis_deg: f64, height_correction: f64) -> Vec<f64> {
    let conductor_axis = strong_axis_deg.to_radians() - FRAC_PI_2;
    series
        .speed()
        .iter()
        .zip(series.bearing_rad())
        .map(|(&speed, &bearing)| height_correction * dir_speed(speed, bearing, conductor_axis))
        .collect()
}
