//! End-to-end pipeline tests: generate → fit → forecast → summarize.

mod common;

use chrono::{Duration, Timelike};

use ecopredict::config::ScenarioConfig;
use ecopredict::io::export::write_csv;
use ecopredict::pipeline::run_forecast;

#[test]
fn full_run_produces_contiguous_hourly_rows() {
    let ctx = common::fixture_context();
    let mut scenario = ScenarioConfig::normal();
    scenario.horizon_hours = 168;

    let outcome = run_forecast(&ctx, &scenario).expect("pipeline should run");

    assert_eq!(outcome.rows.len(), 168);
    assert_eq!(
        outcome.rows[0].timestamp,
        ctx.history.last_timestamp() + Duration::hours(1)
    );
    for pair in outcome.rows.windows(2) {
        assert_eq!(
            pair[1].timestamp - pair[0].timestamp,
            Duration::hours(1),
            "rows must be strictly increasing by one hour"
        );
    }
}

#[test]
fn point_estimates_never_negative() {
    let ctx = common::fixture_context();
    for preset in ScenarioConfig::PRESETS {
        for event in [false, true] {
            let mut scenario = ScenarioConfig::from_preset(preset).expect("known preset");
            scenario.event_active = event;
            let outcome = run_forecast(&ctx, &scenario).expect("pipeline should run");
            for row in &outcome.rows {
                assert!(
                    row.point_estimate >= 0.0,
                    "preset {preset} event {event}: negative point estimate"
                );
            }
        }
    }
}

#[test]
fn summary_peak_is_attained_by_some_row() {
    let ctx = common::fixture_context();
    let outcome = run_forecast(&ctx, &ScenarioConfig::heatwave()).expect("pipeline should run");

    let peak_row = outcome
        .rows
        .iter()
        .find(|r| r.timestamp == outcome.summary.peak_timestamp)
        .expect("peak timestamp must belong to a forecast row");
    assert_eq!(peak_row.point_estimate, outcome.summary.peak_value);

    let manual_total: f64 = outcome.rows.iter().map(|r| r.point_estimate).sum();
    assert!((manual_total - outcome.summary.total).abs() < 1e-9);
}

#[test]
fn event_forecast_dominates_base_forecast() {
    let ctx = common::fixture_context();
    let base = run_forecast(&ctx, &ScenarioConfig::normal()).expect("base run");
    let mut event_scenario = ScenarioConfig::normal();
    event_scenario.event_active = true;
    let event = run_forecast(&ctx, &event_scenario).expect("event run");

    for (b, e) in base.rows.iter().zip(&event.rows) {
        assert!((e.point_estimate - (b.point_estimate * 1.35).max(0.0)).abs() < 1e-9);
        assert!((e.upper_bound - b.upper_bound * 1.35).abs() < 1e-9);
    }
    assert!(event.summary.demand_level >= base.summary.demand_level);
}

#[test]
fn forecast_peaks_in_the_morning_window() {
    // The synthetic training data is heaviest around 08:00 where the daily
    // cycle and the 8-10 boost overlap; the fitted model should keep that.
    let ctx = common::fixture_context();
    let mut scenario = ScenarioConfig::normal();
    scenario.horizon_hours = 24;
    let outcome = run_forecast(&ctx, &scenario).expect("pipeline should run");
    let peak_hour = outcome.summary.peak_timestamp.hour();
    assert!(
        (6..=10).contains(&peak_hour),
        "expected morning peak, got hour {peak_hour}"
    );
}

#[test]
fn exported_csv_matches_forecast_rows() {
    let ctx = common::fixture_context();
    let mut scenario = ScenarioConfig::cold_snap();
    scenario.horizon_hours = 12;
    let outcome = run_forecast(&ctx, &scenario).expect("pipeline should run");

    let mut buf = Vec::new();
    write_csv(&outcome.rows, &mut buf).expect("csv export should succeed");
    let text = String::from_utf8(buf).expect("valid UTF-8");
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("timestamp,point_estimate,lower_bound,upper_bound")
    );
    assert_eq!(lines.count(), 12);
}
