#![warn(missing_docs)]
//! Sweepbench CLI Library
//!
//! Command-line driver for both measurement pipelines:
//! - `sweep`: run the external program over the serial baseline and every
//!   (mode, threads) configuration, then write the speedup table and chart
//! - `pr-curve`: extract precision/recall points from a results log and
//!   plot them
//! - `init`: print a default `sweep.toml`
//!
//! Use `sweepbench_cli::run()` in a `main` function to get the full CLI.

mod config;
mod executor;
mod planner;
mod supervisor;

pub use config::*;
pub use executor::{
    CurveError, SweepError, SweepOutcome, SweepRunner, aggregate_baseline,
    aggregate_configuration, build_curve_report, build_report_meta, build_sweep_report,
    collect_system_info, extract_curve, extract_curve_from_path, format_curve_human,
    format_sweep_human,
};
pub use planner::{ExecutionPlan, build_plan};
pub use supervisor::*;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use sweepbench_core::CommandTemplate;
use sweepbench_report::{
    ChartStyle, CurveReport, OutputFormat, SweepReport, generate_curve_json, generate_sweep_json,
    render_pr_chart, render_speedup_svg, render_speedup_table, write_all_atomic,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sweepbench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "sweepbench")]
#[command(author, version, about = "Sweepbench - parameter sweeps and precision-recall curves")]
pub struct Cli {
    /// Pipeline to run
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest sweep.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Terminal output format: human, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Verbose output (debug logging, no progress bar)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure speedup over the mode x threads grid
    Sweep(SweepArgs),
    /// Plot a precision-recall curve from a results log
    PrCurve(CurveArgs),
    /// Print a default sweep.toml
    Init,
}

/// Overrides for the `[sweep]` configuration section
#[derive(Args, Debug, Default)]
pub struct SweepArgs {
    /// Program and leading arguments, e.g. `-- go run editor.go`
    #[arg(last = true)]
    pub program: Vec<String>,

    /// Working directory for the program
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Dataset selector passed before the mode
    #[arg(long)]
    pub subject: Option<String>,

    /// Mode tag of the serial baseline
    #[arg(long)]
    pub serial_mode: Option<String>,

    /// Comma-separated parallel modes, in sweep order
    #[arg(long, value_delimiter = ',')]
    pub modes: Option<Vec<String>>,

    /// Comma-separated thread counts, in sweep order
    #[arg(long, value_delimiter = ',')]
    pub threads: Option<Vec<u32>>,

    /// Trials per configuration
    #[arg(long, short = 'n')]
    pub runs: Option<usize>,

    /// Per-invocation timeout (e.g. "30s", "10m"); "0" disables it
    #[arg(long)]
    pub timeout: Option<String>,

    /// Output CSV table
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Output chart
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,

    /// Print the planned invocations without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Overrides for the `[curve]` configuration section
#[derive(Args, Debug, Default)]
pub struct CurveArgs {
    /// Results log to read
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output chart
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,
}

impl SweepArgs {
    /// Apply every flag that was given on top of `config`
    pub fn apply(&self, config: &mut SweepConfig) {
        if !self.program.is_empty() {
            config.program = self.program.clone();
        }
        if let Some(dir) = &self.working_dir {
            config.working_dir = Some(dir.clone());
        }
        if let Some(subject) = &self.subject {
            config.subject = subject.clone();
        }
        if let Some(serial) = &self.serial_mode {
            config.serial_mode = serial.clone();
        }
        if let Some(modes) = &self.modes {
            config.modes = modes.clone();
        }
        if let Some(threads) = &self.threads {
            config.threads = threads.clone();
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if let Some(timeout) = &self.timeout {
            config.timeout = timeout.clone();
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(chart) = &self.chart {
            config.chart = chart.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
    }
}

impl CurveArgs {
    /// Apply every flag that was given on top of `config`
    pub fn apply(&self, config: &mut CurveConfig) {
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(chart) = &self.chart {
            config.chart = chart.clone();
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
    }
}

/// Run the Sweepbench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or the first error that aborted the pipeline.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the Sweepbench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => BenchConfig::load(path)
            .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?,
        None => BenchConfig::discover().unwrap_or_default(),
    };

    let format_str = cli.format.as_deref().unwrap_or(&config.output.format);
    let format: OutputFormat = format_str.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    match &cli.command {
        Commands::Sweep(args) => run_sweep(args, config, format, cli.verbose),
        Commands::PrCurve(args) => run_curve(args, config, format),
        Commands::Init => {
            print!("{}", BenchConfig::default_toml());
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn chart_style(config: &BenchConfig) -> ChartStyle {
    ChartStyle {
        width: config.visuals.width,
        height: config.visuals.height,
    }
}

fn run_sweep(
    args: &SweepArgs,
    mut config: BenchConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    args.apply(&mut config.sweep);
    config.sweep.validate()?;

    if args.dry_run {
        return print_plan(&config.sweep);
    }

    let plan = plan_for(&config.sweep);
    let progress = if verbose {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(plan.total_trials() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };

    let report = execute_sweep(&config.sweep, chart_style(&config), progress)?;

    let output = match format {
        OutputFormat::Json => generate_sweep_json(&report)?,
        OutputFormat::Human => format_sweep_human(&report),
    };
    println!("{}", output);
    Ok(())
}

fn plan_for(config: &SweepConfig) -> ExecutionPlan {
    build_plan(&config.serial_mode, &config.modes, &config.threads, config.runs)
}

fn template_for(config: &SweepConfig) -> CommandTemplate {
    CommandTemplate {
        program: config.program.clone(),
        working_dir: config.working_dir.clone(),
        subject: config.subject.clone(),
    }
}

fn print_plan(config: &SweepConfig) -> anyhow::Result<()> {
    let plan = plan_for(config);
    let template = template_for(config);

    println!(
        "Planned {} configurations x {} runs ({} invocations):",
        plan.configurations.len() + 1,
        plan.runs,
        plan.total_trials()
    );
    for configuration in std::iter::once(&plan.baseline).chain(&plan.configurations) {
        let invocation = template.invocation(configuration)?;
        println!("  {:<28} {}", configuration.to_string(), invocation.display());
    }
    Ok(())
}

/// Run a validated sweep and persist its table and chart.
///
/// Nothing is written unless every trial succeeded.
pub fn execute_sweep(
    config: &SweepConfig,
    style: ChartStyle,
    progress: ProgressBar,
) -> anyhow::Result<SweepReport> {
    if let Some(dir) = &config.working_dir {
        if !dir.is_dir() {
            warn!("working directory {} does not exist", dir.display());
        }
    }

    let timeout = config.timeout_duration()?;
    let timeout = (timeout > Duration::ZERO).then_some(timeout);

    let plan = plan_for(config);
    info!(
        "Sweeping {} configurations x {} runs",
        plan.configurations.len() + 1,
        plan.runs
    );

    let outcome = SweepRunner::new(ProcessInvoker::new(timeout), template_for(config))
        .with_progress(progress)
        .run(&plan)?;
    let report = build_sweep_report(outcome, config);

    // Render both before persisting either; a failure leaves neither in place
    let table = render_speedup_table(&report.results)?;
    let chart = render_speedup_svg(&config.title, &config.threads, &report.curves, style)?;
    write_all_atomic(&[
        (config.table.as_path(), table.as_slice()),
        (config.chart.as_path(), chart.as_bytes()),
    ])?;
    info!("Table written to: {}", config.table.display());
    info!("Chart written to: {}", config.chart.display());

    Ok(report)
}

fn run_curve(args: &CurveArgs, mut config: BenchConfig, format: OutputFormat) -> anyhow::Result<()> {
    args.apply(&mut config.curve);
    let report = execute_curve(&config.curve, chart_style(&config))?;

    let output = match format {
        OutputFormat::Json => generate_curve_json(&report)?,
        OutputFormat::Human => format_curve_human(&report),
    };
    println!("{}", output);
    Ok(())
}

/// Extract a precision-recall curve and persist its chart
pub fn execute_curve(config: &CurveConfig, style: ChartStyle) -> anyhow::Result<CurveReport> {
    let points = extract_curve_from_path(&config.input)?;
    info!(
        "Extracted {} points from {}",
        points.len(),
        config.input.display()
    );

    let report = build_curve_report(points, &config.input, &config.title);
    render_pr_chart(&config.chart, &config.title, &report.pairs(), style)?;
    info!("Chart written to: {}", config.chart.display());

    Ok(report)
}
