//! EV charging demand forecasting with scenario adjustment.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod data;
/// Feature building, demand model, scenario adjustment, and summary metrics.
pub mod forecast;
pub mod io;
pub mod pipeline;
