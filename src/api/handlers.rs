//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::ApiState;
use super::types::{
    ErrorResponse, ForecastQuery, ForecastRecord, ForecastResponse, HistoryQuery, ScenarioEcho,
    SummaryRecord,
};
use crate::data::history::HistoryRecord;
use crate::pipeline::run_forecast;

/// Default history tail: one week of hourly rows.
const DEFAULT_HISTORY_TAIL: usize = 168;

/// Runs the forecast pipeline for the scenario given by the query string.
///
/// `GET /forecast` → 200 + `ForecastResponse` JSON
/// `GET /forecast?horizon=24&weather=heatwave&event=true` → overridden scenario
/// `GET /forecast?horizon=9999` → 400 + `ErrorResponse`
pub async fn get_forecast(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ForecastQuery>,
) -> impl IntoResponse {
    let scenario = query.into_scenario();

    let errors = scenario.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: joined })));
    }

    match run_forecast(&state.ctx, &scenario) {
        Ok(outcome) => Ok(Json(ForecastResponse {
            scenario: ScenarioEcho::from(&scenario),
            summary: SummaryRecord::from(&outcome.summary),
            rows: outcome.rows.iter().map(ForecastRecord::from).collect(),
        })),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Returns the most recent history records for overlay context.
///
/// `GET /history` → 200 + last week of records
/// `GET /history?tail=N` → last N records
pub async fn get_history(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<HistoryRecord>> {
    let tail = query.tail.unwrap_or(DEFAULT_HISTORY_TAIL);
    Json(state.ctx.history.tail(tail).to_vec())
}
