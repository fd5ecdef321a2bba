//! Final-Line Result Parsing
//!
//! The benchmarked program may print anything, but the last line of its
//! stdout must be its elapsed time in seconds.

use thiserror::Error;

/// The captured output did not end in a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultParseError {
    #[error("Program produced no output")]
    Missing,

    #[error("Final output line {line:?} is not a number")]
    NotANumber { line: String },
}

/// Parse the elapsed seconds from captured stdout.
///
/// Trailing whitespace (including blank trailing lines) is ignored, so the
/// last non-empty line is the result line. NaN and infinities parse as-is.
pub fn parse_final_line(stdout: &str) -> Result<f64, ResultParseError> {
    let trimmed = stdout.trim_end();
    if trimmed.is_empty() {
        return Err(ResultParseError::Missing);
    }

    let last = trimmed.rsplit('\n').next().unwrap_or(trimmed).trim();
    last.parse::<f64>()
        .map_err(|_| ResultParseError::NotANumber {
            line: last.to_string(),
        })
}
