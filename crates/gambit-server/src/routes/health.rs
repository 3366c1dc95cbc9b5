//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Number of live game sessions.
    pub active_games: usize,
}

/// Simple health check. Never mounted under the route prefix.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_games: state.store.len(),
    })
}

/// Create health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
