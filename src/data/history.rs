//! Historical charging-session dataset.
//!
//! Loaded once at startup from CSV and read-only afterwards. The pipeline
//! only uses it for the last known timestamp; callers may also take a recent
//! tail as chart/API overlay context.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used in the history CSV (`2024-05-06 18:00:00`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter for the CSV timestamp column.
pub mod csv_timestamp {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One observed hour of charging activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Hour of the observation.
    #[serde(with = "csv_timestamp")]
    pub timestamp: NaiveDateTime,
    /// Observed concurrent charging sessions.
    pub number_of_charging_sessions: u32,
    /// Observed temperature (°C).
    pub temperature: f64,
    /// ISO weekday index, Monday = 0 … Sunday = 6.
    pub day_of_week: u32,
}

/// Dataset load errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("cannot read history file \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid history row: {0}")]
    Parse(#[from] csv::Error),
    #[error("history dataset is empty")]
    Empty,
}

/// The loaded dataset. Guaranteed non-empty and read-only after load.
#[derive(Debug, Clone)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    /// Wraps pre-built records, rejecting an empty set.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Empty` for an empty vector.
    pub fn from_records(records: Vec<HistoryRecord>) -> Result<Self, HistoryError> {
        if records.is_empty() {
            return Err(HistoryError::Empty);
        }
        Ok(Self { records })
    }

    /// Loads the dataset from a CSV file.
    ///
    /// A missing file is the "data not available" fail-fast path; there is
    /// no retry and no partial operation.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::Read` for an unreadable file, `Parse` for a
    /// malformed row, and `Empty` for a header-only file.
    pub fn from_csv_file(path: &Path) -> Result<Self, HistoryError> {
        let file = std::fs::File::open(path).map_err(|source| HistoryError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for row in reader.deserialize() {
            records.push(row?);
        }
        log::info!("loaded {} history rows from {}", records.len(), path.display());
        Self::from_records(records)
    }

    /// Last observed timestamp; the forecast horizon starts one hour after.
    pub fn last_timestamp(&self) -> NaiveDateTime {
        // Non-empty by construction.
        self.records[self.records.len() - 1].timestamp
    }

    /// All records in timestamp order.
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// The most recent `n` records (all of them if fewer exist).
    pub fn tail(&self, n: usize) -> &[HistoryRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(hour: u32) -> HistoryRecord {
        HistoryRecord {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 6)
                .and_then(|d| d.and_hms_opt(hour, 0, 0))
                .expect("valid fixture timestamp"),
            number_of_charging_sessions: 10 + hour,
            temperature: 20.0,
            day_of_week: 0,
        }
    }

    #[test]
    fn empty_records_rejected() {
        let err = History::from_records(Vec::new()).expect_err("must fail");
        assert!(matches!(err, HistoryError::Empty));
    }

    #[test]
    fn last_timestamp_is_final_row() {
        let history = History::from_records(vec![record(0), record(1), record(2)])
            .expect("non-empty records");
        assert_eq!(history.last_timestamp(), record(2).timestamp);
    }

    #[test]
    fn tail_clamps_to_available_rows() {
        let history =
            History::from_records(vec![record(0), record(1)]).expect("non-empty records");
        assert_eq!(history.tail(1).len(), 1);
        assert_eq!(history.tail(1)[0], record(1));
        assert_eq!(history.tail(10).len(), 2);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = History::from_csv_file(Path::new("does_not_exist.csv")).expect_err("must fail");
        assert!(matches!(err, HistoryError::Read { .. }));
    }

    #[test]
    fn csv_round_trip_preserves_records() {
        let records = vec![record(0), record(1)];
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            for r in &records {
                writer.serialize(r).expect("serialize row");
            }
            writer.flush().expect("flush");
        }
        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let parsed: Vec<HistoryRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("parse rows");
        assert_eq!(parsed, records);
    }

    #[test]
    fn timestamp_column_uses_space_separated_format() {
        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            writer.serialize(record(18)).expect("serialize row");
            writer.flush().expect("flush");
        }
        let text = String::from_utf8(buf).expect("valid UTF-8");
        assert!(text.contains("2024-05-06 18:00:00"));
    }
}
