//! Precision-Recall Curve Extraction
//!
//! Reads a results log line by line, parses every record and drops the
//! degenerate (0, 0) points. Any malformed line aborts extraction; lines are
//! never skipped.

use chrono::Utc;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use sweepbench_core::{RecordParseError, ThresholdPoint, parse_record};
use sweepbench_report::{CurveReport, CurveSummary};
use thiserror::Error;
use tracing::{debug, warn};

/// Extraction failed on the log as a whole or on one of its lines
#[derive(Debug, Error)]
pub enum CurveError {
    #[error("Failed to read {source_name}: {source}")]
    Read {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}:{line_number}: line is not valid UTF-8 {content:?}: {source}")]
    Encoding {
        source_name: String,
        line_number: usize,
        /// The line with invalid sequences replaced
        content: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("{source_name}:{line_number}: malformed record {content:?}: {source}")]
    Record {
        source_name: String,
        line_number: usize,
        content: String,
        #[source]
        source: RecordParseError,
    },
}

/// Parse every line of `reader`, keeping non-degenerate points in order.
///
/// `source_name` only labels errors.
pub fn extract_curve<R: BufRead>(
    reader: R,
    source_name: &str,
) -> Result<Vec<ThresholdPoint>, CurveError> {
    let mut points = Vec::new();

    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let mut bytes = bytes.map_err(|source| CurveError::Read {
            source_name: source_name.to_string(),
            source,
        })?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        let line = String::from_utf8(bytes).map_err(|source| CurveError::Encoding {
            source_name: source_name.to_string(),
            line_number: idx + 1,
            content: String::from_utf8_lossy(source.as_bytes()).into_owned(),
            source,
        })?;

        let point = parse_record(&line).map_err(|source| CurveError::Record {
            source_name: source_name.to_string(),
            line_number: idx + 1,
            content: line.clone(),
            source,
        })?;

        if point.is_degenerate() {
            debug!(threshold = point.threshold, "dropping degenerate point");
            continue;
        }
        points.push(point);
    }

    Ok(points)
}

/// Open and extract a results log from disk
pub fn extract_curve_from_path(path: &Path) -> Result<Vec<ThresholdPoint>, CurveError> {
    let source_name = path.display().to_string();
    let file = File::open(path).map_err(|source| CurveError::Read {
        source_name: source_name.clone(),
        source,
    })?;
    extract_curve(BufReader::new(file), &source_name)
}

/// Wrap extracted points into a report
pub fn build_curve_report(points: Vec<ThresholdPoint>, input: &Path, title: &str) -> CurveReport {
    if points.is_empty() {
        warn!("{} has no non-degenerate points; the curve will be empty", input.display());
    }

    CurveReport {
        timestamp: Utc::now(),
        input: input.display().to_string(),
        title: title.to_string(),
        summary: CurveSummary::from_points(&points),
        points,
    }
}
