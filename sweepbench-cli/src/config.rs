//! Configuration loading from sweep.toml
//!
//! Sweepbench configuration can be specified in a `sweep.toml` file in the
//! project root. The configuration is automatically discovered by walking up
//! from the current directory. CLI flags override file values.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "sweep.toml";

/// Sweepbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Parameter sweep configuration
    #[serde(default)]
    pub sweep: SweepConfig,
    /// Precision-recall curve configuration
    #[serde(default)]
    pub curve: CurveConfig,
    /// Visualization configuration
    #[serde(default)]
    pub visuals: VisualsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameter sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Program and leading arguments
    #[serde(default = "default_program")]
    pub program: Vec<String>,
    /// Working directory for the program
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Dataset selector passed as the first argument after the program
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Mode tag for the serial baseline
    #[serde(default = "default_serial_mode")]
    pub serial_mode: String,
    /// Parallel mode tags, in sweep order
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,
    /// Thread counts, in sweep (and x-axis) order
    #[serde(default = "default_threads")]
    pub threads: Vec<u32>,
    /// Trials per configuration
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Timeout for a single invocation (e.g., "60s", "10m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Output CSV table
    #[serde(default = "default_table")]
    pub table: PathBuf,
    /// Output chart
    #[serde(default = "default_sweep_chart")]
    pub chart: PathBuf,
    /// Chart title
    #[serde(default = "default_sweep_title")]
    pub title: String,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            working_dir: None,
            subject: default_subject(),
            serial_mode: default_serial_mode(),
            modes: default_modes(),
            threads: default_threads(),
            runs: default_runs(),
            timeout: default_timeout(),
            table: default_table(),
            chart: default_sweep_chart(),
            title: default_sweep_title(),
        }
    }
}

fn default_program() -> Vec<String> {
    vec!["go".to_string(), "run".to_string(), "editor.go".to_string()]
}
fn default_subject() -> String {
    "imbalanced".to_string()
}
fn default_serial_mode() -> String {
    "s".to_string()
}
fn default_modes() -> Vec<String> {
    vec![
        "p-normal".to_string(),
        "p-nosteal".to_string(),
        "p-steal".to_string(),
    ]
}
fn default_threads() -> Vec<u32> {
    vec![2, 4, 6, 8, 12]
}
fn default_runs() -> usize {
    5
}
fn default_timeout() -> String {
    "10m".to_string()
}
fn default_table() -> PathBuf {
    PathBuf::from("speedup_data_imbalanced.csv")
}
fn default_sweep_chart() -> PathBuf {
    PathBuf::from("speedup-images-imbalanced.svg")
}
fn default_sweep_title() -> String {
    "Speedup vs Threads - Imbalanced".to_string()
}

/// Precision-recall curve configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveConfig {
    /// Results log to read
    #[serde(default = "default_curve_input")]
    pub input: PathBuf,
    /// Output chart
    #[serde(default = "default_curve_chart")]
    pub chart: PathBuf,
    /// Chart title
    #[serde(default = "default_curve_title")]
    pub title: String,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            input: default_curve_input(),
            chart: default_curve_chart(),
            title: default_curve_title(),
        }
    }
}

fn default_curve_input() -> PathBuf {
    PathBuf::from("../results/PrecisionRecall.txt")
}
fn default_curve_chart() -> PathBuf {
    PathBuf::from("../results/Precision-Recall Curve.svg")
}
fn default_curve_title() -> String {
    "Precision - Recall Curve".to_string()
}

/// Visualization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualsConfig {
    /// Chart width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for VisualsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default terminal report format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!("Loaded configuration from {}", config_path.display());
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Sweepbench Configuration

[sweep]
# Program and leading arguments; subject, mode and thread count are appended
program = ["go", "run", "editor.go"]
# Working directory for the program (uncomment to enable)
# working_dir = "../editor"
# Dataset selector passed before the mode
subject = "imbalanced"
# Mode tag of the serial baseline (no thread count is passed)
serial_mode = "s"
# Parallel modes, in sweep order
modes = ["p-normal", "p-nosteal", "p-steal"]
# Thread counts, in sweep and x-axis order
threads = [2, 4, 6, 8, 12]
# Trials per configuration
runs = 5
# Timeout for a single invocation
timeout = "10m"
# Output table and chart
table = "speedup_data_imbalanced.csv"
chart = "speedup-images-imbalanced.svg"
title = "Speedup vs Threads - Imbalanced"

[curve]
# Results log with "Threshold: x, Precision: y, Recall: z" lines
input = "../results/PrecisionRecall.txt"
chart = "../results/Precision-Recall Curve.svg"
title = "Precision - Recall Curve"

[visuals]
# Chart dimensions
width = 1280
height = 720

[output]
# Terminal report format: human or json
format = "human"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}

impl SweepConfig {
    /// Reject grids that would produce incomparable or empty results
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.program.is_empty() {
            anyhow::bail!("sweep.program must name the program to run");
        }
        if self.runs == 0 {
            anyhow::bail!("sweep.runs must be at least 1");
        }
        if self.modes.is_empty() {
            anyhow::bail!("sweep.modes must list at least one mode");
        }
        if self.threads.is_empty() {
            anyhow::bail!("sweep.threads must list at least one thread count");
        }
        if let Some(t) = self.threads.iter().find(|&&t| t == 0) {
            anyhow::bail!("sweep.threads must be positive, got {}", t);
        }

        let mut seen_modes = HashSet::new();
        for mode in &self.modes {
            if mode.trim().is_empty() {
                anyhow::bail!("sweep.modes contains an empty mode tag");
            }
            if !seen_modes.insert(mode.as_str()) {
                anyhow::bail!("sweep.modes lists `{}` more than once", mode);
            }
        }
        if seen_modes.contains(self.serial_mode.as_str()) {
            anyhow::bail!(
                "serial mode `{}` must not also appear in sweep.modes",
                self.serial_mode
            );
        }

        let mut seen_threads = HashSet::new();
        for t in &self.threads {
            if !seen_threads.insert(*t) {
                anyhow::bail!("sweep.threads lists {} more than once", t);
            }
        }

        BenchConfig::parse_duration(&self.timeout)?;
        Ok(())
    }

    /// Parsed invocation timeout
    pub fn timeout_duration(&self) -> anyhow::Result<Duration> {
        BenchConfig::parse_duration(&self.timeout)
    }
}
