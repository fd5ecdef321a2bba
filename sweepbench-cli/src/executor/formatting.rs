//! Output Formatting
//!
//! Human-readable terminal output for both pipelines:
//! - Baseline timing and per-configuration mean/speedup
//! - A speedup series table (modes as rows, thread counts as columns)
//! - Precision-recall point listing with the best thresholds

use sweepbench_report::{CurveReport, SweepReport};

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n{}\n", title));
    output.push_str(&"-".repeat(60));
    output.push('\n');
}

/// Format a sweep report for terminal display
pub fn format_sweep_human(report: &SweepReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("{}\n", report.meta.config.title));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  command: {}  subject: {}\n",
        report.meta.config.command.join(" "),
        report.meta.config.subject
    ));

    section(&mut output, "Baseline");
    let stats = &report.baseline.stats;
    output.push_str(&format!(
        "  mode={}  mean: {:.4} s  median: {:.4} s  stddev: {:.4} s\n",
        report.baseline.mode, stats.mean, stats.median, stats.std_dev
    ));
    output.push_str(&format!(
        "  min: {:.4} s  max: {:.4} s  runs: {}\n",
        stats.min, stats.max, stats.sample_count
    ));

    section(&mut output, "Configurations");
    let max_mode_len = report
        .results
        .iter()
        .map(|r| r.mode.as_str().len())
        .max()
        .unwrap_or(4)
        .max(4);
    output.push_str(&format!(
        "  {:<width$}  {:>7}  {:>12}  {:>10}\n",
        "Mode",
        "Threads",
        "Mean (s)",
        "Speedup",
        width = max_mode_len
    ));
    output.push_str(&format!("  {}\n", "-".repeat(max_mode_len + 35)));
    for r in &report.results {
        output.push_str(&format!(
            "  {:<width$}  {:>7}  {:>12.4}  {:>9.2}x\n",
            r.mode,
            r.threads,
            r.mean,
            r.speedup,
            width = max_mode_len
        ));
    }

    if !report.curves.is_empty() {
        section(&mut output, "Speedup by threads");
        let thread_counts = &report.meta.config.threads;
        let max_name_len = report
            .curves
            .iter()
            .map(|c| c.mode.as_str().len())
            .max()
            .unwrap_or(8);
        let col_width = 8;

        output.push_str(&format!("  {:<width$}", "", width = max_name_len));
        for t in thread_counts {
            output.push_str(&format!(" | {:>w$}", t, w = col_width));
        }
        output.push('\n');

        output.push_str(&format!("  {}", "-".repeat(max_name_len)));
        for _ in thread_counts {
            output.push_str(&format!("-+-{}", "-".repeat(col_width)));
        }
        output.push('\n');

        for curve in &report.curves {
            output.push_str(&format!("  {:<width$}", curve.mode, width = max_name_len));
            for t in thread_counts {
                let cell = curve
                    .points
                    .iter()
                    .find(|p| p.0 == *t)
                    .map(|p| format!("{:.2}", p.1))
                    .unwrap_or_else(|| "-".to_string());
                output.push_str(&format!(" | {:>w$}", cell, w = col_width));
            }
            output.push('\n');
        }
    }

    section(&mut output, "Summary");
    output.push_str(&format!(
        "  Configurations: {}  Trials: {}\n",
        report.summary.configurations, report.summary.total_trials
    ));
    if let Some((mode, threads, speedup)) = &report.summary.best {
        output.push_str(&format!(
            "  Best: mode={} threads={} ({:.2}x)\n",
            mode, threads, speedup
        ));
    }
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

/// Format an extracted precision-recall curve for terminal display
pub fn format_curve_human(report: &CurveReport) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("{}\n", report.title));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("  input: {}\n", report.input));

    section(&mut output, "Points");
    output.push_str(&format!(
        "  {:>10}  {:>10}  {:>10}\n",
        "Threshold", "Precision", "Recall"
    ));
    output.push_str(&format!("  {}\n", "-".repeat(34)));
    for p in &report.points {
        output.push_str(&format!(
            "  {:>10.4}  {:>10.4}  {:>10.4}\n",
            p.threshold, p.precision, p.recall
        ));
    }

    section(&mut output, "Summary");
    output.push_str(&format!("  Points: {}\n", report.points.len()));
    if let Some(s) = &report.summary {
        output.push_str(&format!(
            "  Max precision: {:.4} (threshold {:.4})\n",
            s.max_precision, s.precision_threshold
        ));
        output.push_str(&format!(
            "  Max recall: {:.4} (threshold {:.4})\n",
            s.max_recall, s.recall_threshold
        ));
    }

    output
}
