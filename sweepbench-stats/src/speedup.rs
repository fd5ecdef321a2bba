//! Speedup against a serial baseline

use crate::StatsError;

/// Speedup of a configuration relative to the baseline: `baseline_mean / mean`.
///
/// Both means must be strictly positive. A zero, negative or NaN mean is an
/// error rather than an infinite or NaN ratio. Equal means yield exactly 1.0.
pub fn compute_speedup(baseline_mean: f64, mean: f64) -> Result<f64, StatsError> {
    // `!(x > 0.0)` also catches NaN
    if !(baseline_mean > 0.0) {
        return Err(StatsError::InvalidBaseline(baseline_mean));
    }
    if !(mean > 0.0) {
        return Err(StatsError::NonPositiveMean(mean));
    }
    Ok(baseline_mean / mean)
}
