//! Shared test fixtures for integration tests.

use chrono::{NaiveDate, NaiveDateTime};

use ecopredict::data::history::History;
use ecopredict::data::synth;
use ecopredict::forecast::model::SeasonalRegression;
use ecopredict::pipeline::AppContext;

/// Fixed end of the synthetic history (a Monday, 23:00).
pub fn fixture_end() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 6)
        .and_then(|d| d.and_hms_opt(23, 0, 0))
        .expect("valid fixture timestamp")
}

/// Default synthetic history: 45 days, seed 42, ending at [`fixture_end`].
pub fn fixture_records() -> Vec<ecopredict::data::history::HistoryRecord> {
    synth::generate(45, 42, fixture_end())
}

/// A fully loaded context: model fitted on the fixture history.
pub fn fixture_context() -> AppContext {
    let records = fixture_records();
    let model = SeasonalRegression::fit(&records).expect("fixture history should fit");
    let history = History::from_records(records).expect("fixture history is non-empty");
    AppContext { model, history }
}
