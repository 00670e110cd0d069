//! `POST /run` handler
//!
//! Request body: `{"value": {params...}, "activation_id": ..., ...}`. Fields
//! other than `value` form the activation context. The response is the
//! action's response object, always with status 200 once an action is
//! initialized.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::request_id::RequestId;
use crate::params::{ActivationContext, Params};
use crate::response::ActionResponse;
use axum::{Extension, Json, body::Bytes, extract::State};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    /// `null` decodes the same as an absent value
    #[serde(default)]
    value: Option<Params>,
    #[serde(flatten)]
    pub context: ActivationContext,
}

impl RunRequest {
    /// Decode a run body; an empty body means no parameters
    pub fn parse(body: &[u8]) -> AppResult<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Error decoding run body: {}", e)))
    }

    pub fn params(&self) -> Params {
        self.value.clone().unwrap_or_default()
    }
}

pub async fn handler(
    State(state): State<AppState>,
    Extension(id): Extension<RequestId>,
    body: Bytes,
) -> AppResult<Json<ActionResponse>> {
    tracing::debug!(request_id = %id, bytes = body.len(), "done reading run body");

    let request = RunRequest::parse(&body)?;
    let response = state.run(&request.params(), &request.context, id).await?;
    Ok(Json(response))
}
