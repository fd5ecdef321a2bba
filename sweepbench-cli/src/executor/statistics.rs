//! Statistics Computation
//!
//! Folds the samples of one configuration into its aggregate. Each
//! configuration is reduced independently once all of its trials completed.

use sweepbench_core::Configuration;
use sweepbench_report::{BaselineResult, ConfigurationResult};
use sweepbench_stats::{StatsError, compute_speedup, compute_summary};

/// Aggregate the serial baseline samples
pub fn aggregate_baseline(
    configuration: &Configuration,
    samples: &[f64],
) -> Result<BaselineResult, StatsError> {
    Ok(BaselineResult {
        mode: configuration.mode.clone(),
        stats: compute_summary(samples)?,
    })
}

/// Aggregate one parallel configuration and compute its speedup
pub fn aggregate_configuration(
    configuration: &Configuration,
    samples: &[f64],
    baseline_mean: f64,
) -> Result<ConfigurationResult, StatsError> {
    let stats = compute_summary(samples)?;
    let speedup = compute_speedup(baseline_mean, stats.mean)?;

    Ok(ConfigurationResult {
        mode: configuration.mode.clone(),
        // The planner only emits parallel configurations into the grid
        threads: configuration.threads.unwrap_or_default(),
        mean: stats.mean,
        speedup,
        stats,
    })
}
