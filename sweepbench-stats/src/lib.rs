#![warn(missing_docs)]
//! Sweepbench Statistical Engine
//!
//! Aggregates timing samples collected from repeated trials:
//! - Arithmetic mean over a fixed trial count
//! - Summary statistics (median, spread, extremes) for reporting
//! - Speedup ratios against a serial baseline
//!
//! No outlier rejection or significance testing happens here. Every sample
//! a trial produced contributes to the mean.

mod percentiles;
mod speedup;
mod summary;

pub use percentiles::compute_percentile;
pub use speedup::compute_speedup;
pub use summary::{SummaryStatistics, compute_mean, compute_summary};

use thiserror::Error;

/// Errors raised while aggregating samples
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No samples were supplied
    #[error("Cannot aggregate an empty sample set")]
    EmptySamples,

    /// The baseline mean is zero, negative or NaN
    #[error("Baseline mean must be positive, got {0}")]
    InvalidBaseline(f64),

    /// The candidate mean is zero, negative or NaN
    #[error("Mean elapsed time must be positive to compute a speedup, got {0}")]
    NonPositiveMean(f64),
}
