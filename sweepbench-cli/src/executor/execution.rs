//! Sweep Execution
//!
//! Drives the external program through the execution plan.
//!
//! ## Data Flow
//!
//! ```text
//! ExecutionPlan (baseline + mode × threads grid)
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  baseline phase  │  runs × serial invocation → BaselineResult
//! └────────┬─────────┘
//!          │ baseline mean
//!          ▼
//! ┌──────────────────┐
//! │   sweep phase    │  runs × invocation per configuration
//! └────────┬─────────┘  → ConfigurationResult + SpeedupCurve point
//!          ▼
//!    SweepOutcome
//! ```
//!
//! Trials run strictly one after another. Any failed trial aborts the whole
//! sweep.

use super::statistics::{aggregate_baseline, aggregate_configuration};
use crate::planner::ExecutionPlan;
use indicatif::ProgressBar;
use std::time::{Duration, Instant};
use sweepbench_core::{
    CommandTemplate, Configuration, Invocation, InvocationError, Invoker, ResultParseError, Trial,
    parse_final_line,
};
use sweepbench_report::{BaselineResult, ConfigurationResult, SpeedupCurve};
use sweepbench_stats::StatsError;
use thiserror::Error;
use tracing::{debug, info};

/// A sweep aborted at a specific configuration and trial
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Trial {trial}/{runs} of {configuration} failed: {source}")]
    Invocation {
        configuration: Configuration,
        trial: usize,
        runs: usize,
        #[source]
        source: InvocationError,
    },

    #[error("Trial {trial}/{runs} of {configuration} returned an unusable result: {source}")]
    ResultParse {
        configuration: Configuration,
        trial: usize,
        runs: usize,
        #[source]
        source: ResultParseError,
    },

    #[error("Cannot aggregate {configuration}: {source}")]
    Aggregate {
        configuration: Configuration,
        #[source]
        source: StatsError,
    },
}

/// Everything a completed sweep produced
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub baseline: BaselineResult,
    /// One result per configuration, in plan order
    pub results: Vec<ConfigurationResult>,
    /// One curve per mode, in first-seen mode order
    pub curves: Vec<SpeedupCurve>,
    pub total_trials: usize,
    pub duration: Duration,
}

/// Runs the baseline and the configuration grid through an `Invoker`
pub struct SweepRunner<I: Invoker> {
    invoker: I,
    template: CommandTemplate,
    progress: ProgressBar,
}

impl<I: Invoker> SweepRunner<I> {
    pub fn new(invoker: I, template: CommandTemplate) -> Self {
        Self {
            invoker,
            template,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report each completed trial on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Execute the plan to completion or to the first failure
    pub fn run(&mut self, plan: &ExecutionPlan) -> Result<SweepOutcome, SweepError> {
        let start = Instant::now();
        self.progress.set_length(plan.total_trials() as u64);

        let baseline = self.run_baseline(plan)?;
        info!(
            mode = %baseline.mode,
            mean = baseline.mean(),
            "baseline complete"
        );

        let mut results = Vec::with_capacity(plan.configurations.len());
        let mut curves: Vec<SpeedupCurve> = Vec::new();

        for configuration in &plan.configurations {
            let samples = self.collect_samples(configuration, plan.runs)?;
            let result = aggregate_configuration(configuration, &samples, baseline.mean())
                .map_err(|source| SweepError::Aggregate {
                    configuration: configuration.clone(),
                    source,
                })?;

            info!(
                mode = %result.mode,
                threads = result.threads,
                mean = result.mean,
                speedup = result.speedup,
                "configuration complete"
            );

            match curves.iter_mut().find(|c| c.mode == result.mode) {
                Some(curve) => curve.push(result.threads, result.speedup),
                None => {
                    let mut curve = SpeedupCurve::new(result.mode.clone());
                    curve.push(result.threads, result.speedup);
                    curves.push(curve);
                }
            }
            results.push(result);
        }

        self.progress.finish_and_clear();

        Ok(SweepOutcome {
            baseline,
            results,
            curves,
            total_trials: plan.total_trials(),
            duration: start.elapsed(),
        })
    }

    fn run_baseline(&mut self, plan: &ExecutionPlan) -> Result<BaselineResult, SweepError> {
        let samples = self.collect_samples(&plan.baseline, plan.runs)?;
        aggregate_baseline(&plan.baseline, &samples).map_err(|source| SweepError::Aggregate {
            configuration: plan.baseline.clone(),
            source,
        })
    }

    /// Run exactly `runs` trials of one configuration
    fn collect_samples(
        &mut self,
        configuration: &Configuration,
        runs: usize,
    ) -> Result<Vec<f64>, SweepError> {
        let invocation =
            self.template
                .invocation(configuration)
                .map_err(|source| SweepError::Invocation {
                    configuration: configuration.clone(),
                    trial: 1,
                    runs,
                    source,
                })?;

        let mut samples = Vec::with_capacity(runs);
        for index in 1..=runs {
            let trial = self.run_trial(configuration, &invocation, index, runs)?;
            samples.push(trial.elapsed_secs);
        }
        Ok(samples)
    }

    fn run_trial(
        &mut self,
        configuration: &Configuration,
        invocation: &Invocation,
        index: usize,
        runs: usize,
    ) -> Result<Trial, SweepError> {
        self.progress
            .set_message(format!("{} [{}/{}]", configuration, index, runs));

        let output = self
            .invoker
            .invoke(invocation)
            .map_err(|source| SweepError::Invocation {
                configuration: configuration.clone(),
                trial: index,
                runs,
                source,
            })?;

        let elapsed_secs =
            parse_final_line(&output.stdout).map_err(|source| SweepError::ResultParse {
                configuration: configuration.clone(),
                trial: index,
                runs,
                source,
            })?;

        debug!(
            configuration = %configuration,
            trial = index,
            elapsed_secs,
            wall_ms = output.wall_time.as_secs_f64() * 1000.0,
            "trial complete"
        );
        self.progress.inc(1);

        Ok(Trial {
            configuration: configuration.clone(),
            index,
            elapsed_secs,
            wall_time: output.wall_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::build_plan;
    use std::collections::HashMap;
    use sweepbench_core::InvocationOutput;

    /// Replies with a fixed stdout per argument list and records every call
    struct ScriptedInvoker {
        replies: HashMap<Vec<String>, String>,
        calls: Vec<Vec<String>>,
    }

    impl ScriptedInvoker {
        fn new() -> Self {
            Self {
                replies: HashMap::new(),
                calls: Vec::new(),
            }
        }

        fn reply(mut self, args: &[&str], stdout: &str) -> Self {
            self.replies.insert(
                args.iter().map(|a| a.to_string()).collect(),
                stdout.to_string(),
            );
            self
        }
    }

    impl Invoker for ScriptedInvoker {
        fn invoke(
            &mut self,
            invocation: &Invocation,
        ) -> Result<InvocationOutput, InvocationError> {
            self.calls.push(invocation.args.clone());
            match self.replies.get(&invocation.args) {
                Some(stdout) => Ok(InvocationOutput {
                    stdout: stdout.clone(),
                    ..Default::default()
                }),
                None => Err(InvocationError::NonZeroExit {
                    status: "exit status: 1".to_string(),
                    stderr: "unexpected arguments".to_string(),
                }),
            }
        }
    }

    fn template() -> CommandTemplate {
        CommandTemplate {
            program: vec!["./editor".to_string()],
            working_dir: None,
            subject: "imbalanced".to_string(),
        }
    }

    fn modes(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_speedup_two_at_four_threads() {
        let plan = build_plan("s", &modes(&["p-steal"]), &[4], 5);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "loading\n10.0\n")
            .reply(&["imbalanced", "p-steal", "4"], "5.0\n");

        let outcome = SweepRunner::new(&mut invoker, template()).run(&plan).unwrap();

        assert_eq!(outcome.baseline.mean(), 10.0);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].threads, 4);
        assert_eq!(outcome.results[0].speedup, 2.0);
        assert_eq!(outcome.curves[0].points, vec![(4, 2.0)]);
        // 5 baseline + 5 sweep trials
        assert_eq!(invoker.calls.len(), 10);
    }

    #[test]
    fn test_every_configuration_gets_exactly_runs_trials() {
        let plan = build_plan("s", &modes(&["p-normal", "p-steal"]), &[2, 8], 3);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "8.0")
            .reply(&["imbalanced", "p-normal", "2"], "4.0")
            .reply(&["imbalanced", "p-normal", "8"], "2.0")
            .reply(&["imbalanced", "p-steal", "2"], "4.0")
            .reply(&["imbalanced", "p-steal", "8"], "1.0");

        let outcome = SweepRunner::new(&mut invoker, template()).run(&plan).unwrap();

        assert_eq!(outcome.results.len(), 4);
        for result in &outcome.results {
            assert_eq!(result.stats.sample_count, 3);
        }
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for call in &invoker.calls {
            *counts.entry(call.clone()).or_default() += 1;
        }
        assert!(counts.values().all(|&n| n == 3));
        assert_eq!(outcome.total_trials, 15);
    }

    #[test]
    fn test_results_and_curves_follow_declared_order() {
        let plan = build_plan("s", &modes(&["p-steal", "p-normal"]), &[12, 2, 6], 1);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "12.0")
            .reply(&["imbalanced", "p-steal", "12"], "1.0")
            .reply(&["imbalanced", "p-steal", "2"], "6.0")
            .reply(&["imbalanced", "p-steal", "6"], "2.0")
            .reply(&["imbalanced", "p-normal", "12"], "3.0")
            .reply(&["imbalanced", "p-normal", "2"], "6.0")
            .reply(&["imbalanced", "p-normal", "6"], "4.0");

        let outcome = SweepRunner::new(&mut invoker, template()).run(&plan).unwrap();

        let rows: Vec<(String, u32)> = outcome
            .results
            .iter()
            .map(|r| (r.mode.to_string(), r.threads))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("p-steal".to_string(), 12),
                ("p-steal".to_string(), 2),
                ("p-steal".to_string(), 6),
                ("p-normal".to_string(), 12),
                ("p-normal".to_string(), 2),
                ("p-normal".to_string(), 6),
            ]
        );

        assert_eq!(outcome.curves.len(), 2);
        assert_eq!(outcome.curves[0].mode.as_str(), "p-steal");
        assert_eq!(outcome.curves[0].points, vec![(12, 12.0), (2, 2.0), (6, 6.0)]);
        assert_eq!(outcome.curves[1].points, vec![(12, 4.0), (2, 2.0), (6, 3.0)]);
    }

    #[test]
    fn test_non_numeric_output_aborts_with_location() {
        let plan = build_plan("s", &modes(&["p-normal"]), &[2, 4], 2);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "4.0")
            .reply(&["imbalanced", "p-normal", "2"], "working\ndone\n");

        let err = SweepRunner::new(&mut invoker, template())
            .run(&plan)
            .unwrap_err();

        match &err {
            SweepError::ResultParse {
                configuration,
                trial,
                source,
                ..
            } => {
                assert_eq!(configuration.threads, Some(2));
                assert_eq!(*trial, 1);
                assert_eq!(
                    *source,
                    ResultParseError::NotANumber {
                        line: "done".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("mode=p-normal threads=2"));
        // Nothing after the failing trial was attempted
        assert_eq!(invoker.calls.len(), 3);
    }

    #[test]
    fn test_failed_baseline_stops_before_sweep() {
        let plan = build_plan("s", &modes(&["p-normal"]), &[2], 3);
        let mut invoker = ScriptedInvoker::new();

        let err = SweepRunner::new(&mut invoker, template())
            .run(&plan)
            .unwrap_err();

        assert!(matches!(
            err,
            SweepError::Invocation { ref configuration, trial: 1, .. } if configuration.is_baseline()
        ));
        assert_eq!(invoker.calls.len(), 1);
    }

    #[test]
    fn test_zero_time_is_rejected_not_infinite() {
        let plan = build_plan("s", &modes(&["p-normal"]), &[2], 2);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "4.0")
            .reply(&["imbalanced", "p-normal", "2"], "0.00");

        let err = SweepRunner::new(&mut invoker, template())
            .run(&plan)
            .unwrap_err();

        assert!(matches!(
            err,
            SweepError::Aggregate {
                source: StatsError::NonPositiveMean(_),
                ..
            }
        ));
    }

    #[test]
    fn test_equal_means_give_unit_speedup() {
        let plan = build_plan("s", &modes(&["p-nosteal"]), &[6], 5);
        let mut invoker = ScriptedInvoker::new()
            .reply(&["imbalanced", "s"], "3.3")
            .reply(&["imbalanced", "p-nosteal", "6"], "3.3");

        let outcome = SweepRunner::new(&mut invoker, template()).run(&plan).unwrap();
        assert_eq!(outcome.results[0].speedup, 1.0);
    }
}
