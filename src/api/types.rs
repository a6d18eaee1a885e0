//! API response and query types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;
use crate::forecast::adjust::AdjustedForecastRow;
use crate::forecast::summary::{DemandLevel, SummaryMetrics};

/// Scenario overrides accepted on the forecast endpoint. Anything omitted
/// falls back to the normal-weather defaults.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Hours to forecast (12–168).
    pub horizon: Option<u32>,
    /// Weather scenario name.
    pub weather: Option<String>,
    /// Average temperature override (°C).
    pub avg_temp: Option<f64>,
    /// Whether the event multiplier applies.
    pub event: Option<bool>,
}

impl ForecastQuery {
    /// Merges the query overrides onto the default scenario.
    pub fn into_scenario(self) -> ScenarioConfig {
        let mut scenario = ScenarioConfig::normal();
        if let Some(h) = self.horizon {
            scenario.horizon_hours = h;
        }
        if let Some(w) = self.weather {
            scenario.weather = w;
        }
        if let Some(t) = self.avg_temp {
            scenario.average_temperature = Some(t);
        }
        if let Some(e) = self.event {
            scenario.event_active = e;
        }
        scenario
    }
}

/// Combined forecast response: echoed scenario, summary, and per-hour rows.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    /// The scenario the pipeline actually ran.
    pub scenario: ScenarioEcho,
    /// Headline metrics over the window.
    pub summary: SummaryRecord,
    /// Adjusted per-hour forecast rows.
    pub rows: Vec<ForecastRecord>,
}

/// Resolved scenario parameters echoed back to the caller.
#[derive(Debug, Serialize)]
pub struct ScenarioEcho {
    pub horizon_hours: u32,
    pub weather: String,
    pub average_temperature: f64,
    pub event_active: bool,
}

impl From<&ScenarioConfig> for ScenarioEcho {
    fn from(cfg: &ScenarioConfig) -> Self {
        Self {
            horizon_hours: cfg.horizon_hours,
            weather: cfg.weather.clone(),
            average_temperature: cfg.resolved_temperature(),
            event_active: cfg.event_active,
        }
    }
}

/// One adjusted forecast hour.
#[derive(Debug, Serialize)]
pub struct ForecastRecord {
    pub timestamp: NaiveDateTime,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl From<&AdjustedForecastRow> for ForecastRecord {
    fn from(r: &AdjustedForecastRow) -> Self {
        Self {
            timestamp: r.timestamp,
            point_estimate: r.point_estimate,
            lower_bound: r.lower_bound,
            upper_bound: r.upper_bound,
        }
    }
}

/// Headline metrics record.
#[derive(Debug, Serialize)]
pub struct SummaryRecord {
    /// Highest adjusted point estimate (sessions/hr).
    pub peak_value: f64,
    /// When the peak is expected.
    pub peak_timestamp: NaiveDateTime,
    /// Total predicted sessions over the window.
    pub total: f64,
    /// Grid demand classification of the peak.
    pub demand_level: DemandLevel,
}

impl From<&SummaryMetrics> for SummaryRecord {
    fn from(s: &SummaryMetrics) -> Self {
        Self {
            peak_value: s.peak_value,
            peak_timestamp: s.peak_timestamp,
            total: s.total,
            demand_level: s.demand_level,
        }
    }
}

/// Optional tail length for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Number of most recent records to return (default: one week).
    pub tail: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
