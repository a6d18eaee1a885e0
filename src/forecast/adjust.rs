//! Post-hoc scenario adjustment of the raw model forecast.

use chrono::NaiveDateTime;

use crate::forecast::model::ForecastRow;

/// Demand multiplier applied when a public holiday / special event is active.
pub const EVENT_MULTIPLIER: f64 = 1.35;

/// A forecast row after scenario adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedForecastRow {
    /// Timestamp of the predicted hour.
    pub timestamp: NaiveDateTime,
    /// Adjusted point estimate, floored at zero.
    pub point_estimate: f64,
    /// Adjusted lower bound. Not floored; may stay negative.
    pub lower_bound: f64,
    /// Adjusted upper bound.
    pub upper_bound: f64,
}

impl std::fmt::Display for AdjustedForecastRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | predicted={:>6.1} sessions/hr  band=[{:>6.1}, {:>6.1}]",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.point_estimate,
            self.lower_bound,
            self.upper_bound,
        )
    }
}

/// Applies the event multiplier and the zero floor to every forecast row.
///
/// Pure and order-preserving, one output row per input row. The multiplier
/// scales all three fields; only the point estimate is then floored at zero.
/// The bounds keep whatever the multiplication produced, matching the
/// dashboard's historical behavior, so a negative lower bound survives.
pub fn adjust(rows: &[ForecastRow], event_active: bool) -> Vec<AdjustedForecastRow> {
    let multiplier = if event_active { EVENT_MULTIPLIER } else { 1.0 };
    rows.iter()
        .map(|r| AdjustedForecastRow {
            timestamp: r.timestamp,
            point_estimate: (r.point_estimate * multiplier).max(0.0),
            lower_bound: r.lower_bound * multiplier,
            upper_bound: r.upper_bound * multiplier,
        })
        .collect()
}
