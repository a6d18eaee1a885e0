//! Seeded synthetic charging-session generator.
//!
//! Produces the hourly demo dataset: a daily sinusoidal ebb and flow, morning
//! and evening weekday peaks, a weekend boost, and noise on both sessions and
//! temperature. Deterministic for a fixed seed.

use std::io::Write;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::data::history::HistoryRecord;

/// Baseline sessions per hour before any pattern terms.
const BASE_SESSIONS: f64 = 10.0;
/// Amplitude of the daily session cycle.
const DAILY_AMPLITUDE: f64 = 20.0;
/// Extra sessions during the morning commute window (hours 8–10).
const MORNING_PEAK: f64 = 15.0;
/// Extra sessions during the evening window (hours 18–21).
const EVENING_PEAK: f64 = 25.0;
/// Extra baseline on Saturdays and Sundays.
const WEEKEND_BOOST: f64 = 20.0;
/// Mean temperature of the synthetic climate (°C).
const TEMP_MEAN: f64 = 25.0;
/// Amplitude of the slow temperature oscillation (°C).
const TEMP_AMPLITUDE: f64 = 8.0;
/// Gaussian noise standard deviation on temperature (°C).
const TEMP_NOISE_STD: f64 = 2.0;

/// Generates `days` of hourly records ending at `end` (inclusive).
///
/// # Arguments
///
/// * `days` - Number of simulated days (must be > 0)
/// * `seed` - Seed for the session and temperature noise
/// * `end` - Timestamp of the final generated hour
///
/// # Panics
///
/// Panics if `days` is zero.
pub fn generate(days: u32, seed: u64, end: NaiveDateTime) -> Vec<HistoryRecord> {
    assert!(days > 0, "days must be > 0");
    let total = days as usize * 24;
    let start = end - Duration::hours(total as i64 - 1);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut records = Vec::with_capacity(total);
    for i in 0..total {
        let timestamp = start + Duration::hours(i as i64);
        let hour = timestamp.hour();
        let day_of_week = timestamp.weekday().num_days_from_monday();

        let daily = DAILY_AMPLITUDE * (std::f64::consts::TAU * f64::from(hour) / 24.0).sin();
        let mut peaks = 0.0;
        if (8..=10).contains(&hour) {
            peaks += MORNING_PEAK;
        }
        if (18..=21).contains(&hour) {
            peaks += EVENING_PEAK;
        }
        let weekend = if day_of_week >= 5 { WEEKEND_BOOST } else { 0.0 };
        let noise = f64::from(rng.random_range(0..10u32));
        let sessions = (BASE_SESSIONS + daily + peaks + weekend + noise).max(0.0) as u32;

        // One slow sinusoid across the whole span, roughly one cycle per day.
        let phase = if total > 1 {
            i as f64 * f64::from(days) * std::f64::consts::TAU / (total as f64 - 1.0)
        } else {
            0.0
        };
        let temperature =
            TEMP_MEAN + TEMP_AMPLITUDE * phase.sin() + gaussian(&mut rng, TEMP_NOISE_STD);

        records.push(HistoryRecord {
            timestamp,
            number_of_charging_sessions: sessions,
            temperature: (temperature * 10.0).round() / 10.0,
            day_of_week,
        });
    }
    records
}

/// Gaussian noise via Box-Muller.
fn gaussian(rng: &mut StdRng, std: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos() * std
}

/// Writes history records as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(records: &[HistoryRecord], writer: impl Write) -> std::io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes history records to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn write_csv_file(records: &[HistoryRecord], path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    let buf = std::io::BufWriter::new(file);
    write_csv(records, buf)
}
