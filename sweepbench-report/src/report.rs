//! Report Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sweepbench_core::{Mode, ThresholdPoint};
use sweepbench_stats::SummaryStatistics;

/// Complete result of a parameter sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepReport {
    pub meta: ReportMeta,
    pub baseline: BaselineResult,
    /// One entry per (mode, threads) configuration, in sweep order
    pub results: Vec<ConfigurationResult>,
    /// One curve per mode, in declared mode order
    pub curves: Vec<SpeedupCurve>,
    pub summary: SweepSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Sweep parameters captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub command: Vec<String>,
    pub working_dir: Option<String>,
    pub subject: String,
    pub serial_mode: Mode,
    pub modes: Vec<Mode>,
    pub threads: Vec<u32>,
    pub runs: usize,
    pub title: String,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu: String,
    pub cpu_cores: u32,
    pub memory_gb: f64,
}

/// Aggregate over the serial baseline trials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineResult {
    pub mode: Mode,
    pub stats: SummaryStatistics,
}

impl BaselineResult {
    /// Baseline mean elapsed seconds
    pub fn mean(&self) -> f64 {
        self.stats.mean
    }
}

/// Aggregate over the `runs` trials of one parallel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigurationResult {
    pub mode: Mode,
    pub threads: u32,
    /// Mean elapsed seconds
    pub mean: f64,
    /// Baseline mean / `mean` (1.0 = same, >1.0 = faster)
    pub speedup: f64,
    pub stats: SummaryStatistics,
}

/// Speedup by thread count for a single mode.
///
/// Points follow the declared thread-count order, which is also the x-axis
/// order of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedupCurve {
    pub mode: Mode,
    /// (threads, speedup) pairs
    pub points: Vec<(u32, f64)>,
}

impl SpeedupCurve {
    /// Start an empty curve for `mode`
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            points: Vec::new(),
        }
    }

    /// Append the next point in sweep order
    pub fn push(&mut self, threads: u32, speedup: f64) {
        self.points.push((threads, speedup));
    }

    /// Highest speedup on this curve
    pub fn peak(&self) -> Option<(u32, f64)> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<(u32, f64)>, p| match best {
                Some(b) if b.1 >= p.1 => Some(b),
                _ => Some(p),
            })
    }
}

/// Sweep summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepSummary {
    pub configurations: usize,
    pub total_trials: usize,
    pub total_duration_ms: f64,
    /// Fastest configuration as (mode, threads, speedup)
    pub best: Option<(Mode, u32, f64)>,
}

/// Precision-recall curve extracted from a results log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveReport {
    pub timestamp: DateTime<Utc>,
    pub input: String,
    pub title: String,
    /// Non-degenerate points in log order
    pub points: Vec<ThresholdPoint>,
    pub summary: Option<CurveSummary>,
}

impl CurveReport {
    /// (precision, recall) pairs in plotting order
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.precision, p.recall)).collect()
    }
}

/// Best precision and best recall with the thresholds that first reach them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    pub max_precision: f64,
    pub precision_threshold: f64,
    pub max_recall: f64,
    pub recall_threshold: f64,
}

impl CurveSummary {
    /// Scan points in order; ties keep the earliest threshold.
    pub fn from_points(points: &[ThresholdPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut summary = CurveSummary {
            max_precision: first.precision,
            precision_threshold: first.threshold,
            max_recall: first.recall,
            recall_threshold: first.threshold,
        };

        for p in &points[1..] {
            if p.precision > summary.max_precision {
                summary.max_precision = p.precision;
                summary.precision_threshold = p.threshold;
            }
            if p.recall > summary.max_recall {
                summary.max_recall = p.recall;
                summary.recall_threshold = p.threshold;
            }
        }
        Some(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(threshold: f64, precision: f64, recall: f64) -> ThresholdPoint {
        ThresholdPoint {
            threshold,
            precision,
            recall,
        }
    }

    #[test]
    fn test_curve_keeps_push_order() {
        let mut curve = SpeedupCurve::new(Mode::from("p-steal"));
        curve.push(8, 3.1);
        curve.push(2, 1.8);
        curve.push(4, 2.9);
        let xs: Vec<u32> = curve.points.iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![8, 2, 4]);
        assert_eq!(curve.peak(), Some((8, 3.1)));
    }

    #[test]
    fn test_peak_of_empty_curve() {
        assert_eq!(SpeedupCurve::new(Mode::from("p-normal")).peak(), None);
    }

    #[test]
    fn test_curve_summary_first_threshold_wins() {
        let points = vec![
            point(0.1, 0.40, 0.95),
            point(0.2, 0.55, 0.95),
            point(0.3, 0.70, 0.80),
            point(0.4, 0.70, 0.60),
        ];
        let summary = CurveSummary::from_points(&points).unwrap();
        assert_eq!(summary.max_precision, 0.70);
        assert_eq!(summary.precision_threshold, 0.3);
        assert_eq!(summary.max_recall, 0.95);
        assert_eq!(summary.recall_threshold, 0.1);
    }

    #[test]
    fn test_curve_summary_empty() {
        assert!(CurveSummary::from_points(&[]).is_none());
    }
}
