//! Process Invocation Contract
//!
//! The external program is a black box: it receives
//! `[program..., subject, mode, threads?]` in a fixed working directory and
//! reports its elapsed time on the last line of stdout. `Invoker` is the seam
//! between the sweep runner and whatever actually spawns the process.

use crate::Configuration;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while running the external program
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Empty program command")]
    EmptyCommand,

    #[error("Failed to spawn `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while supervising child: {0}")]
    Io(#[from] std::io::Error),

    #[error("Program exited with {status}{}", format_stderr(.stderr))]
    NonZeroExit { status: String, stderr: String },

    #[error("Program timed out after {0:?}")]
    Timeout(Duration),
}

fn format_stderr(stderr: &str) -> String {
    let tail = stderr.trim();
    if tail.is_empty() {
        String::new()
    } else {
        format!(": {}", tail)
    }
}

/// Command line shared by every trial of a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    /// Program and its leading arguments (e.g. `["go", "run", "editor.go"]`)
    pub program: Vec<String>,
    /// Working directory override for the child
    pub working_dir: Option<PathBuf>,
    /// Dataset selector passed before the mode
    pub subject: String,
}

impl CommandTemplate {
    /// Build the invocation for one configuration
    pub fn invocation(&self, configuration: &Configuration) -> Result<Invocation, InvocationError> {
        let (program, leading) = self
            .program
            .split_first()
            .ok_or(InvocationError::EmptyCommand)?;

        let mut args: Vec<String> = leading.to_vec();
        args.push(self.subject.clone());
        args.push(configuration.mode.as_str().to_string());
        if let Some(threads) = configuration.threads {
            args.push(threads.to_string());
        }

        Ok(Invocation {
            program: program.clone(),
            args,
            working_dir: self.working_dir.clone(),
        })
    }
}

/// A fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments after the executable
    pub args: Vec<String>,
    /// Working directory for the child
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Shell-like rendering for logs and dry runs
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Everything captured from one completed child
#[derive(Debug, Clone, Default)]
pub struct InvocationOutput {
    /// Full standard output
    pub stdout: String,
    /// Full standard error
    pub stderr: String,
    /// Observed wall-clock duration
    pub wall_time: Duration,
}

/// Runs the external program and blocks until it finishes.
///
/// Implementations must return `Ok` only for a zero exit status with stdout
/// fully captured.
pub trait Invoker {
    /// Run one invocation to completion
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError>;
}

impl<I: Invoker + ?Sized> Invoker for &mut I {
    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        (**self).invoke(invocation)
    }
}
