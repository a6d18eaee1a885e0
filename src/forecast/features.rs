//! Builds the future regressor rows that the demand model predicts over.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};

/// Amplitude of the imposed daily temperature cycle (°C).
///
/// Each future hour gets `average + 7 * sin(2π * hour / 24)`, a smooth
/// day/night swing around the scenario's chosen average.
pub const DAILY_TEMP_SWING_C: f64 = 7.0;

/// One future time step with its regressor values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    /// Timestamp of the hour being predicted.
    pub timestamp: NaiveDateTime,
    /// ISO weekday index, Monday = 0 … Sunday = 6.
    pub day_of_week: u32,
    /// Scenario temperature for this hour (°C).
    pub temperature: f64,
}

/// Builds hourly feature rows for the requested horizon.
///
/// Produces exactly `horizon_hours` rows at hourly steps, the first one hour
/// after `last_known`. A zero horizon yields an empty vector; the
/// configuration boundary rejects it before this is reached.
///
/// # Arguments
///
/// * `last_known` - Last timestamp present in the historical dataset
/// * `horizon_hours` - Number of future hours to cover
/// * `average_temperature` - Scenario average temperature (°C)
pub fn build_feature_rows(
    last_known: NaiveDateTime,
    horizon_hours: u32,
    average_temperature: f64,
) -> Vec<FeatureRow> {
    let mut rows = Vec::with_capacity(horizon_hours as usize);
    for step in 1..=i64::from(horizon_hours) {
        let timestamp = last_known + Duration::hours(step);
        let hour = f64::from(timestamp.hour());
        let swing = DAILY_TEMP_SWING_C * (std::f64::consts::TAU * hour / 24.0).sin();
        rows.push(FeatureRow {
            timestamp,
            day_of_week: timestamp.weekday().num_days_from_monday(),
            temperature: average_temperature + swing,
        });
    }
    rows
}
