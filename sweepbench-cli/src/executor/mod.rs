//! Sweep Executor
//!
//! Drives both measurement pipelines from a validated configuration.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ExecutionPlan (baseline + mode x threads grid)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Invoke the program `runs` times per configuration
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Mean elapsed time and speedup per configuration
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  SweepReport with host metadata and summary
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! The precision-recall pipeline is a single pass in [`curve`]: read the
//! log, parse each record, drop degenerate points.

mod curve;
mod execution;
mod formatting;
mod metadata;
mod report;
mod statistics;

pub use curve::{CurveError, build_curve_report, extract_curve, extract_curve_from_path};
pub use execution::{SweepError, SweepOutcome, SweepRunner};
pub use formatting::{format_curve_human, format_sweep_human};
pub use metadata::{build_report_meta, collect_system_info};
pub use report::build_sweep_report;
pub use statistics::{aggregate_baseline, aggregate_configuration};
