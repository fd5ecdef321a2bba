//! Report Building
//!
//! Turns a finished [`SweepOutcome`] into a [`SweepReport`]: run parameters
//! and host metadata, per-configuration aggregates, per-mode curves and a
//! summary naming the fastest configuration.

use super::execution::SweepOutcome;
use super::metadata::build_report_meta;
use crate::config::SweepConfig;
use sweepbench_core::Mode;
use sweepbench_report::{ConfigurationResult, ReportConfig, SweepReport, SweepSummary};

/// Build the complete report for a successful sweep
pub fn build_sweep_report(outcome: SweepOutcome, config: &SweepConfig) -> SweepReport {
    let summary = SweepSummary {
        configurations: outcome.results.len(),
        total_trials: outcome.total_trials,
        total_duration_ms: outcome.duration.as_secs_f64() * 1000.0,
        best: best_configuration(&outcome.results),
    };

    let meta = build_report_meta(ReportConfig {
        command: config.program.clone(),
        working_dir: config
            .working_dir
            .as_ref()
            .map(|p| p.display().to_string()),
        subject: config.subject.clone(),
        serial_mode: Mode::new(config.serial_mode.as_str()),
        modes: config.modes.iter().map(|m| Mode::new(m.as_str())).collect(),
        threads: config.threads.clone(),
        runs: config.runs,
        title: config.title.clone(),
    });

    SweepReport {
        meta,
        baseline: outcome.baseline,
        results: outcome.results,
        curves: outcome.curves,
        summary,
    }
}

/// Highest speedup; the earliest configuration in sweep order wins ties
fn best_configuration(results: &[ConfigurationResult]) -> Option<(Mode, u32, f64)> {
    let mut best: Option<&ConfigurationResult> = None;
    for r in results {
        match best {
            Some(b) if b.speedup >= r.speedup => {}
            _ => best = Some(r),
        }
    }
    best.map(|r| (r.mode.clone(), r.threads, r.speedup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use sweepbench_report::{BaselineResult, SpeedupCurve};
    use sweepbench_stats::compute_summary;

    fn result(mode: &str, threads: u32, mean: f64, speedup: f64) -> ConfigurationResult {
        ConfigurationResult {
            mode: Mode::from(mode),
            threads,
            mean,
            speedup,
            stats: compute_summary(&[mean]).unwrap(),
        }
    }

    #[test]
    fn test_best_configuration_prefers_first_on_tie() {
        let results = vec![
            result("p-normal", 2, 5.0, 2.0),
            result("p-steal", 2, 2.5, 4.0),
            result("p-steal", 4, 2.5, 4.0),
        ];
        assert_eq!(
            best_configuration(&results),
            Some((Mode::from("p-steal"), 2, 4.0))
        );
        assert_eq!(best_configuration(&[]), None);
    }

    #[test]
    fn test_build_sweep_report() {
        let mut curve = SpeedupCurve::new(Mode::from("p-normal"));
        curve.push(2, 2.0);
        let outcome = SweepOutcome {
            baseline: BaselineResult {
                mode: Mode::from("s"),
                stats: compute_summary(&[10.0, 10.0]).unwrap(),
            },
            results: vec![result("p-normal", 2, 5.0, 2.0)],
            curves: vec![curve],
            total_trials: 4,
            duration: Duration::from_millis(1500),
        };

        let config = SweepConfig {
            modes: vec!["p-normal".to_string()],
            threads: vec![2],
            runs: 2,
            ..SweepConfig::default()
        };
        let report = build_sweep_report(outcome, &config);

        assert_eq!(report.summary.configurations, 1);
        assert_eq!(report.summary.total_trials, 4);
        assert_eq!(report.summary.total_duration_ms, 1500.0);
        assert_eq!(report.meta.config.serial_mode, Mode::from("s"));
        assert_eq!(report.meta.config.modes, vec![Mode::from("p-normal")]);
        assert_eq!(report.meta.config.runs, 2);
        assert_eq!(report.baseline.mean(), 10.0);
    }
}
