#![warn(missing_docs)]
//! Sweepbench Core - Domain Model and Parsers
//!
//! This crate holds the pieces both measurement pipelines are built from:
//! - `Mode` / `Configuration` / `Trial` for the parameter sweep
//! - `Invoker` trait and `CommandTemplate` describing how the external program is called
//! - Final-line result parsing for captured program output
//! - `ThresholdPoint` record parsing for precision-recall logs

mod invoke;
mod record;
mod result;

pub use invoke::{CommandTemplate, Invocation, InvocationError, InvocationOutput, Invoker};
pub use record::{Field, RecordParseError, ThresholdPoint, parse_record};
pub use result::{ResultParseError, parse_final_line};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Execution strategy tag passed verbatim to the external program
/// (e.g. `p-normal`, `p-steal`, or the serial marker `s`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mode(String);

impl Mode {
    /// Create a mode from its tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag as passed on the command line
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Mode {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// One point of the parameter grid.
///
/// `threads` is `None` only for the serial baseline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    /// Execution mode tag
    pub mode: Mode,
    /// Worker thread count, absent for the baseline
    pub threads: Option<u32>,
}

impl Configuration {
    /// The serial baseline configuration
    pub fn baseline(serial_mode: Mode) -> Self {
        Self {
            mode: serial_mode,
            threads: None,
        }
    }

    /// A parallel configuration with an explicit thread count
    pub fn parallel(mode: Mode, threads: u32) -> Self {
        Self {
            mode,
            threads: Some(threads),
        }
    }

    /// Whether this is the serial baseline
    pub fn is_baseline(&self) -> bool {
        self.threads.is_none()
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.threads {
            Some(threads) => write!(f, "mode={} threads={}", self.mode, threads),
            None => write!(f, "mode={} (baseline)", self.mode),
        }
    }
}

/// One timed execution of the external program.
///
/// `elapsed_secs` is the value the program reported on its final output line.
/// `wall_time` is what the supervisor observed and is only used for logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    /// Configuration the program ran under
    pub configuration: Configuration,
    /// 1-based trial index within its configuration
    pub index: usize,
    /// Reported elapsed seconds
    pub elapsed_secs: f64,
    /// Observed wall-clock duration of the child process
    pub wall_time: Duration,
}
