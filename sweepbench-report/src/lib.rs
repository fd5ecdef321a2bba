#![warn(missing_docs)]
//! Sweepbench Report - Persistence and Visualization
//!
//! Output collaborators for both pipelines:
//! - CSV speedup table (`mode,threads,avg_time,speedup`)
//! - SVG line charts (speedup vs threads, precision vs recall)
//! - JSON (machine-readable) reports
//!
//! Every file is rendered fully in memory and then moved into place, so a
//! reader never observes a half-written table or chart.

mod chart;
mod csv;
mod json;
mod persist;
mod report;

pub use chart::{
    ChartStyle, render_pr_chart, render_pr_svg, render_speedup_chart, render_speedup_svg,
};
pub use csv::{render_speedup_table, write_speedup_table};
pub use json::{generate_curve_json, generate_sweep_json};
pub use persist::{write_all_atomic, write_atomic};
pub use report::{
    BaselineResult, ConfigurationResult, CurveReport, CurveSummary, ReportConfig, ReportMeta,
    SpeedupCurve, SweepReport, SweepSummary, SystemInfo,
};

use thiserror::Error;

/// Errors raised while producing output files
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format selection for the terminal report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
