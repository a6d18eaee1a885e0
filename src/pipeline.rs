//! One-shot forecast pipeline: features → predict → adjust → summarize.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::ScenarioConfig;
use crate::data::history::{History, HistoryError};
use crate::forecast::adjust::{AdjustedForecastRow, adjust};
use crate::forecast::features::build_feature_rows;
use crate::forecast::model::{DemandModel, ModelError, SeasonalRegression};
use crate::forecast::summary::{ForecastError, SummaryMetrics, summarize};

/// Startup load errors. Both inputs are required; the pipeline is unusable
/// without them and there is no retry.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("model not available: {0}")]
    Model(#[from] ModelError),
    #[error("data not available: {0}")]
    Data(#[from] HistoryError),
}

/// Immutable handle over the loaded model and dataset.
///
/// Constructed once per process and passed by reference into every forecast
/// run; read-only afterwards, so concurrent readers need no synchronization.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub model: SeasonalRegression,
    pub history: History,
}

impl AppContext {
    /// Loads the fitted model and the historical dataset.
    ///
    /// # Errors
    ///
    /// Fails fast with a `LoadError` if either file is missing or malformed.
    pub fn load(model_path: &Path, data_path: &Path) -> Result<Self, LoadError> {
        let model = SeasonalRegression::from_json_file(model_path)?;
        let history = History::from_csv_file(data_path)?;
        Ok(Self { model, history })
    }
}

/// Adjusted forecast rows plus the derived summary metrics.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub rows: Vec<AdjustedForecastRow>,
    pub summary: SummaryMetrics,
}

/// Runs the full pipeline for one scenario against the loaded context.
///
/// Recomputed from scratch on every parameter change; nothing carries over
/// between invocations.
///
/// # Errors
///
/// Returns `ForecastError::EmptyInput` if the horizon produced no rows;
/// config validation keeps that unreachable for valid scenarios.
pub fn run_forecast(
    ctx: &AppContext,
    scenario: &ScenarioConfig,
) -> Result<ForecastOutcome, ForecastError> {
    forecast_with(&ctx.model, ctx.history.last_timestamp(), scenario)
}

/// Pipeline core over any [`DemandModel`] implementation.
pub fn forecast_with(
    model: &dyn DemandModel,
    last_known: NaiveDateTime,
    scenario: &ScenarioConfig,
) -> Result<ForecastOutcome, ForecastError> {
    let features = build_feature_rows(
        last_known,
        scenario.horizon_hours,
        scenario.resolved_temperature(),
    );
    let raw = model.predict(&features);
    let rows = adjust(&raw, scenario.event_active);
    let summary = summarize(&rows)?;
    log::debug!(
        "forecast: {} rows, peak {:.1} at {}, level {}",
        rows.len(),
        summary.peak_value,
        summary.peak_timestamp,
        summary.demand_level
    );
    Ok(ForecastOutcome { rows, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synth;
    use crate::forecast::features::FeatureRow;
    use crate::forecast::model::ForecastRow;
    use chrono::NaiveDate;

    fn fixture_end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .and_then(|d| d.and_hms_opt(23, 0, 0))
            .expect("valid fixture timestamp")
    }

    fn fixture_context() -> AppContext {
        let records = synth::generate(45, 42, fixture_end());
        let model = SeasonalRegression::fit(&records).expect("fit should succeed");
        let history = History::from_records(records).expect("non-empty records");
        AppContext { model, history }
    }

    /// Model stub returning a fixed value per row.
    struct FlatModel(f64);

    impl DemandModel for FlatModel {
        fn predict(&self, features: &[FeatureRow]) -> Vec<ForecastRow> {
            features
                .iter()
                .map(|f| ForecastRow {
                    timestamp: f.timestamp,
                    point_estimate: self.0,
                    lower_bound: self.0 - 10.0,
                    upper_bound: self.0 + 10.0,
                })
                .collect()
        }
    }

    #[test]
    fn outcome_covers_requested_horizon() {
        let ctx = fixture_context();
        let mut scenario = ScenarioConfig::normal();
        scenario.horizon_hours = 72;
        let outcome = run_forecast(&ctx, &scenario).expect("pipeline should run");
        assert_eq!(outcome.rows.len(), 72);
        assert_eq!(
            outcome.rows[0].timestamp,
            ctx.history.last_timestamp() + chrono::Duration::hours(1)
        );
    }

    #[test]
    fn event_scenario_scales_the_summary() {
        let ctx = fixture_context();
        let base = run_forecast(&ctx, &ScenarioConfig::normal()).expect("base run");
        let mut event = ScenarioConfig::normal();
        event.event_active = true;
        let boosted = run_forecast(&ctx, &event).expect("event run");
        assert!(
            (boosted.summary.peak_value - base.summary.peak_value * 1.35).abs() < 1e-9,
            "event peak should be exactly 1.35x the base peak"
        );
        assert!(boosted.summary.total > base.summary.total);
    }

    #[test]
    fn event_multiplier_crosses_demand_levels() {
        let last = fixture_end();
        let mut scenario = ScenarioConfig::normal();
        scenario.horizon_hours = 24;
        let calm = forecast_with(&FlatModel(60.0), last, &scenario).expect("run");
        assert_eq!(
            calm.summary.demand_level,
            crate::forecast::summary::DemandLevel::High
        );

        scenario.event_active = true;
        let event = forecast_with(&FlatModel(60.0), last, &scenario).expect("run");
        assert_eq!(
            event.summary.demand_level,
            crate::forecast::summary::DemandLevel::Critical
        );
    }

    #[test]
    fn zero_horizon_surfaces_empty_input() {
        let mut scenario = ScenarioConfig::normal();
        scenario.horizon_hours = 0;
        let err = forecast_with(&FlatModel(10.0), fixture_end(), &scenario)
            .expect_err("empty horizon must fail");
        assert!(matches!(err, ForecastError::EmptyInput));
    }

    #[test]
    fn missing_files_fail_fast() {
        let err = AppContext::load(Path::new("no_model.json"), Path::new("no_data.csv"))
            .expect_err("must fail");
        assert!(matches!(err, LoadError::Model(_)));
        let msg = format!("{err}");
        assert!(msg.contains("not available"));
    }

    #[test]
    fn rerun_with_same_scenario_is_deterministic() {
        let ctx = fixture_context();
        let scenario = ScenarioConfig::heatwave();
        let a = run_forecast(&ctx, &scenario).expect("first run");
        let b = run_forecast(&ctx, &scenario).expect("second run");
        assert_eq!(a.rows, b.rows);
        assert_eq!(a.summary, b.summary);
    }
}
