//! Summary Statistics
//!
//! The mean is the plain arithmetic mean of every sample: sum divided by the
//! trial count. Median, spread and extremes are reported alongside it but are
//! never used to derive speedups.

use crate::StatsError;
use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Summary statistics over one configuration's samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Arithmetic mean (sum / count)
    pub mean: f64,
    /// Median (linear interpolation)
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Number of samples aggregated
    pub sample_count: usize,
}

/// Arithmetic mean of a sample set.
///
/// NaN and infinite samples are not filtered; they propagate into the result.
pub fn compute_mean(samples: &[f64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySamples);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Compute summary statistics for a sample set
pub fn compute_summary(samples: &[f64]) -> Result<SummaryStatistics, StatsError> {
    let mean = compute_mean(samples)?;

    let std_dev = if samples.len() < 2 {
        0.0
    } else {
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(SummaryStatistics {
        mean,
        median: compute_percentile(samples, 50.0),
        std_dev,
        min,
        max,
        sample_count: samples.len(),
    })
}

impl SummaryStatistics {
    /// Coefficient of variation in percent (relative stddev)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.std_dev / self.mean) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_is_sum_over_count() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 10.0];
        assert!((compute_mean(&samples).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_keeps_every_sample() {
        // A large sample is not treated as an outlier
        let samples = vec![1.0, 1.0, 1.0, 1.0, 96.0];
        assert!((compute_mean(&samples).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(compute_mean(&[]), Err(StatsError::EmptySamples));
    }

    #[test]
    fn test_mean_propagates_nan() {
        assert!(compute_mean(&[1.0, f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&samples).unwrap();

        assert!((summary.mean - 3.0).abs() < 0.01);
        assert!((summary.median - 3.0).abs() < 0.01);
        assert!((summary.std_dev - 2.5f64.sqrt()).abs() < 1e-9);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.sample_count, 5);
    }

    #[test]
    fn test_constant_samples() {
        let summary = compute_summary(&[10.0; 5]).unwrap();
        assert_eq!(summary.mean, 10.0);
        assert_eq!(summary.std_dev, 0.0);
        assert!((summary.coefficient_of_variation() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&[2.5]).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.min, 2.5);
        assert_eq!(summary.max, 2.5);
    }
}
