/// Historical charging-session dataset, loaded once per process.
pub mod history;
/// Synthetic hourly session data for demos and tests.
pub mod synth;
