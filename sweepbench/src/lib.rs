#![warn(missing_docs)]
//! # Sweepbench
//!
//! Performance-measurement harness for an external program:
//! - **Parameter sweep**: run the program over a serial baseline and every
//!   (mode, thread count) configuration, average elapsed time over repeated
//!   trials, and report speedup relative to the baseline as a CSV table and
//!   a speedup-vs-threads chart
//! - **Precision-recall curves**: read a classifier's threshold log, drop
//!   degenerate points and plot precision against recall
//!
//! ## Quick Start
//!
//! ```text
//! sweepbench init > sweep.toml
//! sweepbench sweep --threads 2,4,8 --runs 3 -- go run editor.go
//! sweepbench pr-curve --input ../results/PrecisionRecall.txt
//! ```
//!
//! ## Library use
//!
//! ```ignore
//! use sweepbench::{ChartStyle, SweepConfig, execute_sweep};
//! use indicatif::ProgressBar;
//!
//! let config = SweepConfig::default();
//! config.validate()?;
//! let report = execute_sweep(&config, ChartStyle::default(), ProgressBar::hidden())?;
//! println!("best: {:?}", report.summary.best);
//! ```

// Re-export core types
pub use sweepbench_core::{
    CommandTemplate, Configuration, Invocation, InvocationError, InvocationOutput, Invoker, Mode,
    RecordParseError, ResultParseError, ThresholdPoint, Trial, parse_final_line, parse_record,
};

// Re-export report types
pub use sweepbench_report::{
    BaselineResult, ChartStyle, ConfigurationResult, CurveReport, CurveSummary, OutputFormat,
    ReportError, SpeedupCurve, SweepReport, SweepSummary,
};

// Re-export stats
pub use sweepbench_stats::{StatsError, SummaryStatistics, compute_mean, compute_speedup};

// Re-export the pipelines
pub use sweepbench_cli::{
    BenchConfig, CurveConfig, CurveError, ExecutionPlan, ProcessInvoker, SweepConfig, SweepError,
    SweepRunner, build_plan, execute_curve, execute_sweep, extract_curve,
};

/// Run the Sweepbench CLI.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     sweepbench::run()
/// }
/// ```
pub use sweepbench_cli::run;
