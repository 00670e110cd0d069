//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Whether `/init` has selected an action
    pub initialized: bool,
    /// Name of the served action
    pub action: Option<&'static str>,
}

/// Health check handler
///
/// Always returns 200 OK; an uninitialized runtime is still healthy.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let action = state.current_action().await;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            initialized: action.is_some(),
            action,
        }),
    )
}
