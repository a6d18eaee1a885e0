//! JSON API over the loaded forecasting context.
//!
//! Provides two GET endpoints:
//! - `/forecast` — runs the full scenario pipeline with query-string overrides
//! - `/history` — recent historical records for chart overlay context

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::pipeline::AppContext;

/// Immutable application state shared across all request handlers.
///
/// The model and dataset are loaded once and wrapped in `Arc` — no locks
/// needed since all data is read-only; each request recomputes its own
/// forecast from scratch.
pub struct ApiState {
    /// Loaded model and history.
    pub ctx: AppContext,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/forecast", get(handlers::get_forecast))
        .route("/history", get(handlers::get_history))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<ApiState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    log::info!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
