//! `POST /init` handler
//!
//! Request body: `{"value": {"main": "<action>", "env": {...}}}`.
//! Fields the platform sends for code-based runtimes (`code`, `binary`) are
//! accepted and ignored: actions are compiled into this binary.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct InitRequest {
    #[serde(default)]
    pub value: InitValue,
}

#[derive(Debug, Default, Deserialize)]
pub struct InitValue {
    #[serde(default)]
    pub main: Option<String>,
    #[serde(default)]
    pub env: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InitResponse {
    pub ok: bool,
}

pub async fn handler(State(state): State<AppState>, body: Bytes) -> AppResult<Json<InitResponse>> {
    // A repeated init is refused before the body is looked at
    if state.rejects_init().await {
        return Err(AppError::AlreadyInitialized);
    }

    let request: InitRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Error unmarshaling request: {}", e)))?;

    // env values may hold credentials; log keys only
    tracing::debug!(
        main = ?request.value.main,
        env_keys = ?request.value.env.keys().collect::<Vec<_>>(),
        "init: decoded request"
    );

    state
        .initialize(request.value.main.as_deref(), &request.value.env)
        .await?;

    Ok(Json(InitResponse { ok: true }))
}
