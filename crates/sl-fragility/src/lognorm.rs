//! Log-normal cumulative distribution.
//!
//! The error function uses the Abramowitz–Stegun 7.1.26 rational
//! approximation (max absolute error 1.5e-7) — comfortably tighter than the
//! fragility parameters themselves, which carry two to three significant
//! figures.  No statistics crate is pulled in for a single CDF.

use std::f64::consts::SQRT_2;

/// Error function via the A&S 7.1.26 rational approximation.
pub fn erf(x: f64) -> f64 {
    // erf is odd; evaluate on |x| and restore the sign.
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let t = 1.0 / (1.0 + P * x);
    let poly = ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard-normal CDF Φ(z).
#[inline]
pub fn norm_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// CDF of a log-normal distribution parameterised by its median and shape
/// (σ of the underlying normal): Φ(ln(x/median)/shape) for x > 0, else 0.
pub fn lognorm_cdf(x: f64, median: f64, shape: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    norm_cdf((x / median).ln() / shape)
}
