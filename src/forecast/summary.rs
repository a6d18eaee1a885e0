//! Headline metrics and demand classification for an adjusted forecast.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::forecast::adjust::AdjustedForecastRow;

/// Peak demand above this is classified `Critical` (exclusive bound).
pub const CRITICAL_THRESHOLD: f64 = 70.0;
/// Peak demand above this is classified `High` (exclusive bound).
pub const HIGH_THRESHOLD: f64 = 55.0;

/// Grid demand classification of the forecast peak, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum DemandLevel {
    Normal,
    High,
    Critical,
}

impl DemandLevel {
    /// Classifies a peak value against the fixed thresholds.
    ///
    /// The bounds are exclusive: a peak of exactly 70 is `High`, exactly 55
    /// is `Normal`.
    pub fn from_peak(peak_value: f64) -> Self {
        if peak_value > CRITICAL_THRESHOLD {
            Self::Critical
        } else if peak_value > HIGH_THRESHOLD {
            Self::High
        } else {
            Self::Normal
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// Summary metrics over the whole adjusted forecast window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    /// Highest adjusted point estimate (sessions/hr).
    pub peak_value: f64,
    /// Timestamp of the peak; earliest row wins ties.
    pub peak_timestamp: NaiveDateTime,
    /// Sum of adjusted point estimates over the window.
    pub total: f64,
    /// Classification of the peak.
    pub demand_level: DemandLevel,
}

impl fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Forecast Summary ---")?;
        writeln!(f, "Peak demand:        {:.0} sessions/hr", self.peak_value)?;
        writeln!(
            f,
            "Peak expected at:   {}",
            self.peak_timestamp.format("%Y-%m-%d %H:%M")
        )?;
        writeln!(f, "Total sessions:     {:.0}", self.total)?;
        write!(f, "Grid demand level:  {}", self.demand_level)
    }
}

/// Pipeline errors for the one-shot forecast computation.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("cannot summarize an empty forecast; the peak and total are undefined")]
    EmptyInput,
}

/// Computes peak, total, and demand level from the adjusted rows.
///
/// # Errors
///
/// Returns `ForecastError::EmptyInput` for an empty slice; callers keep this
/// unreachable by validating `horizon_hours` at the configuration boundary.
pub fn summarize(rows: &[AdjustedForecastRow]) -> Result<SummaryMetrics, ForecastError> {
    let first = rows.first().ok_or(ForecastError::EmptyInput)?;

    let mut peak = first;
    let mut total = 0.0;
    for row in rows {
        // Strict comparison keeps the earliest row on ties.
        if row.point_estimate > peak.point_estimate {
            peak = row;
        }
        total += row.point_estimate;
    }

    Ok(SummaryMetrics {
        peak_value: peak.point_estimate,
        peak_timestamp: peak.timestamp,
        total,
        demand_level: DemandLevel::from_peak(peak.point_estimate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(points: &[f64]) -> Vec<AdjustedForecastRow> {
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| AdjustedForecastRow {
                timestamp: NaiveDate::from_ymd_opt(2024, 5, 6)
                    .and_then(|d| d.and_hms_opt(i as u32, 0, 0))
                    .expect("valid fixture timestamp"),
                point_estimate: p,
                lower_bound: p - 5.0,
                upper_bound: p + 5.0,
            })
            .collect()
    }

    #[test]
    fn peak_total_and_critical_level() {
        let summary = summarize(&rows(&[10.0, 72.0, 40.0])).expect("non-empty");
        assert_eq!(summary.peak_value, 72.0);
        assert_eq!(summary.peak_timestamp, rows(&[0.0, 0.0])[1].timestamp);
        assert!((summary.total - 122.0).abs() < 1e-9);
        assert_eq!(summary.demand_level, DemandLevel::Critical);
    }

    #[test]
    fn exactly_seventy_is_high_not_critical() {
        let summary = summarize(&rows(&[10.0, 70.0, 40.0])).expect("non-empty");
        assert_eq!(summary.demand_level, DemandLevel::High);
    }

    #[test]
    fn just_above_fifty_five_is_high() {
        let summary = summarize(&rows(&[10.0, 55.01, 40.0])).expect("non-empty");
        assert_eq!(summary.demand_level, DemandLevel::High);
    }

    #[test]
    fn exactly_fifty_five_is_normal() {
        let summary = summarize(&rows(&[10.0, 55.0, 40.0])).expect("non-empty");
        assert_eq!(summary.demand_level, DemandLevel::Normal);
    }

    #[test]
    fn tie_keeps_earliest_timestamp() {
        let all = rows(&[30.0, 42.0, 42.0, 12.0]);
        let summary = summarize(&all).expect("non-empty");
        assert_eq!(summary.peak_timestamp, all[1].timestamp);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = summarize(&[]).expect_err("empty must fail");
        assert!(matches!(err, ForecastError::EmptyInput));
    }

    #[test]
    fn summary_display_does_not_panic() {
        let summary = summarize(&rows(&[10.0, 72.0])).expect("non-empty");
        let s = format!("{summary}");
        assert!(s.contains("Critical"));
    }
}
