//! CSV speedup table

use crate::ReportError;
use crate::persist::write_atomic;
use crate::report::ConfigurationResult;
use serde::Serialize;
use std::path::Path;

const HEADER: [&str; 4] = ["mode", "threads", "avg_time", "speedup"];

#[derive(Serialize)]
struct TableRow<'a> {
    mode: &'a str,
    threads: u32,
    avg_time: f64,
    speedup: f64,
}

/// Render the speedup table, header first, one row per configuration.
pub fn render_speedup_table(results: &[ConfigurationResult]) -> Result<Vec<u8>, ReportError> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for result in results {
        writer.serialize(TableRow {
            mode: result.mode.as_str(),
            threads: result.threads,
            avg_time: result.mean,
            speedup: result.speedup,
        })?;
    }

    writer.into_inner().map_err(|e| ReportError::Io {
        path: "<csv buffer>".to_string(),
        source: e.into_error(),
    })
}

/// Render and atomically persist the speedup table
pub fn write_speedup_table(path: &Path, results: &[ConfigurationResult]) -> Result<(), ReportError> {
    let bytes = render_speedup_table(results)?;
    write_atomic(path, &bytes)
}
