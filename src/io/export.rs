//! CSV export for adjusted forecast rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::data::history::TIMESTAMP_FORMAT;
use crate::forecast::adjust::AdjustedForecastRow;

/// Column header for CSV forecast export.
const HEADER: &str = "timestamp,point_estimate,lower_bound,upper_bound";

/// Exports adjusted forecast rows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per forecast hour. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(rows: &[AdjustedForecastRow], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes adjusted forecast rows as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(rows: &[AdjustedForecastRow], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in rows {
        wtr.write_record(&[
            r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", r.point_estimate),
            format!("{:.4}", r.lower_bound),
            format!("{:.4}", r.upper_bound),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
