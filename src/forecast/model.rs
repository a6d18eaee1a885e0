//! Demand model contract and the shipped seasonal-regression implementation.
//!
//! The pipeline only depends on the [`DemandModel`] trait: feature rows in,
//! forecast rows with uncertainty bounds out. [`SeasonalRegression`] is a
//! deliberately small model fitted offline from the historical CSV and
//! serialized to JSON; a heavier model can replace it behind the same trait
//! without touching the adjuster or classifier.

use std::path::Path;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::data::history::HistoryRecord;
use crate::forecast::features::FeatureRow;

/// z-score for the symmetric 80% prediction interval.
const Z_80: f64 = 1.28;

/// Minimum history length for fitting: one week of hourly rows.
pub const MIN_FIT_ROWS: usize = 168;

/// One predicted hour: point estimate plus lower/upper uncertainty bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    /// Timestamp of the predicted hour.
    pub timestamp: NaiveDateTime,
    /// Best-guess predicted sessions per hour.
    pub point_estimate: f64,
    /// Lower uncertainty bound.
    pub lower_bound: f64,
    /// Upper uncertainty bound.
    pub upper_bound: f64,
}

/// Opaque forecasting capability: regressor rows in, forecast rows out.
///
/// One output row per input row, same order.
pub trait DemandModel {
    fn predict(&self, features: &[FeatureRow]) -> Vec<ForecastRow>;
}

/// Model fitting errors.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    #[error("insufficient history: need at least {MIN_FIT_ROWS} hourly rows, got {0}")]
    InsufficientData(usize),
}

/// Model load/store errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("cannot read model file \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot write model file \"{path}\": {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid model JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Additive seasonal regression over hour-of-day, day-of-week, and temperature.
///
/// `prediction = mean + temp_coef * (temperature - mean_temperature)
///             + hour_effect[hour] + dow_effect[day_of_week]`
///
/// Bounds are `prediction ± 1.28 * residual_std` (80% interval). Effects are
/// fitted sequentially on residuals, which is adequate for the roughly
/// balanced hourly panels this model sees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalRegression {
    /// Global mean of the target series (sessions/hr).
    mean_sessions: f64,
    /// Mean temperature over the fitting window (°C).
    mean_temperature: f64,
    /// Linear temperature coefficient (sessions per °C).
    temp_coef: f64,
    /// Additive hour-of-day effects, index 0–23.
    hour_effect: [f64; 24],
    /// Additive day-of-week effects, Monday = 0 … Sunday = 6.
    dow_effect: [f64; 7],
    /// Standard deviation of the fit residuals.
    residual_std: f64,
}

impl SeasonalRegression {
    /// Fits the model from historical records.
    ///
    /// # Errors
    ///
    /// Returns `FitError::InsufficientData` with fewer than [`MIN_FIT_ROWS`]
    /// rows.
    pub fn fit(records: &[HistoryRecord]) -> Result<Self, FitError> {
        if records.len() < MIN_FIT_ROWS {
            return Err(FitError::InsufficientData(records.len()));
        }
        let n = records.len() as f64;

        let mean_sessions = records
            .iter()
            .map(|r| f64::from(r.number_of_charging_sessions))
            .sum::<f64>()
            / n;
        let mean_temperature = records.iter().map(|r| r.temperature).sum::<f64>() / n;

        // Least-squares slope of sessions on temperature.
        let mut cov = 0.0;
        let mut var = 0.0;
        for r in records {
            let dt = r.temperature - mean_temperature;
            let dy = f64::from(r.number_of_charging_sessions) - mean_sessions;
            cov += dt * dy;
            var += dt * dt;
        }
        let temp_coef = if var > f64::EPSILON { cov / var } else { 0.0 };

        let detrended: Vec<f64> = records
            .iter()
            .map(|r| {
                f64::from(r.number_of_charging_sessions)
                    - mean_sessions
                    - temp_coef * (r.temperature - mean_temperature)
            })
            .collect();

        let mut hour_effect = [0.0_f64; 24];
        let mut hour_count = [0usize; 24];
        for (r, resid) in records.iter().zip(&detrended) {
            let h = r.timestamp.hour() as usize;
            hour_effect[h] += resid;
            hour_count[h] += 1;
        }
        for h in 0..24 {
            if hour_count[h] > 0 {
                hour_effect[h] /= hour_count[h] as f64;
            }
        }

        let mut dow_effect = [0.0_f64; 7];
        let mut dow_count = [0usize; 7];
        for (r, resid) in records.iter().zip(&detrended) {
            let d = (r.day_of_week as usize).min(6);
            dow_effect[d] += resid - hour_effect[r.timestamp.hour() as usize];
            dow_count[d] += 1;
        }
        for d in 0..7 {
            if dow_count[d] > 0 {
                dow_effect[d] /= dow_count[d] as f64;
            }
        }

        let mut sq_sum = 0.0;
        for (r, resid) in records.iter().zip(&detrended) {
            let e = resid
                - hour_effect[r.timestamp.hour() as usize]
                - dow_effect[(r.day_of_week as usize).min(6)];
            sq_sum += e * e;
        }
        let residual_std = (sq_sum / (n - 1.0)).sqrt();

        Ok(Self {
            mean_sessions,
            mean_temperature,
            temp_coef,
            hour_effect,
            dow_effect,
            residual_std,
        })
    }

    /// Residual standard deviation of the fitted model.
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Parses a serialized model from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Parse` on malformed JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Loads a serialized model from a JSON file.
    ///
    /// A missing file is the "model not available" fail-fast path; there is
    /// no fallback model.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Read` if the file cannot be read and
    /// `ModelError::Parse` on malformed JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Serializes the model to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Parse` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the serialized model to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Write` if the file cannot be written.
    pub fn to_json_file(&self, path: &Path) -> Result<(), ModelError> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).map_err(|source| ModelError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

impl DemandModel for SeasonalRegression {
    fn predict(&self, features: &[FeatureRow]) -> Vec<ForecastRow> {
        features
            .iter()
            .map(|f| {
                let point = self.mean_sessions
                    + self.temp_coef * (f.temperature - self.mean_temperature)
                    + self.hour_effect[f.timestamp.hour() as usize]
                    + self.dow_effect[(f.day_of_week as usize).min(6)];
                let band = Z_80 * self.residual_std;
                ForecastRow {
                    timestamp: f.timestamp,
                    point_estimate: point,
                    lower_bound: point - band,
                    upper_bound: point + band,
                }
            })
            .collect()
    }
}
