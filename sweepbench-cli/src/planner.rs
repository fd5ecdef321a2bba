//! Sweep Planner
//!
//! Builds the execution plan: the serial baseline followed by the
//! mode × thread-count grid.
//!
//! Ordering: modes in declared order, and within each mode the thread counts
//! in declared order. Nothing is sorted, because the declared thread order is
//! the x-axis order of the emitted curves.

use sweepbench_core::{Configuration, Mode};

/// Execution plan for a sweep
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Serial baseline, run first
    pub baseline: Configuration,
    /// Parallel configurations in sweep order
    pub configurations: Vec<Configuration>,
    /// Trials per configuration (baseline included)
    pub runs: usize,
}

impl ExecutionPlan {
    /// Total number of program invocations the plan will make
    pub fn total_trials(&self) -> usize {
        (self.configurations.len() + 1) * self.runs
    }
}

/// Build the execution plan for the given grid
pub fn build_plan(serial_mode: &str, modes: &[String], threads: &[u32], runs: usize) -> ExecutionPlan {
    let configurations = modes
        .iter()
        .flat_map(|mode| {
            threads
                .iter()
                .map(move |&t| Configuration::parallel(Mode::from(mode.as_str()), t))
        })
        .collect();

    ExecutionPlan {
        baseline: Configuration::baseline(Mode::from(serial_mode)),
        configurations,
        runs,
    }
}
