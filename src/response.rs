//! Action response object
//!
//! Serialized as either `{"body": ...}` or `{"error": "..."}`.

use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a single action invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionResponse {
    /// Success payload (text or markup)
    Body(Value),
    /// Failure message
    Error(String),
}

impl ActionResponse {
    pub fn body(text: impl Into<String>) -> Self {
        Self::Body(Value::String(text.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Label used for metrics and logs
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Body(_) => "body",
            Self::Error(_) => "error",
        }
    }

    /// Body text, if this is a success carrying a string
    pub fn body_text(&self) -> Option<&str> {
        match self {
            Self::Body(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<ActionError> for ActionResponse {
    fn from(err: ActionError) -> Self {
        Self::Error(err.to_string())
    }
}

impl From<Result<String, ActionError>> for ActionResponse {
    fn from(result: Result<String, ActionError>) -> Self {
        match result {
            Ok(text) => Self::body(text),
            Err(err) => {
                tracing::warn!(error = %err, "Action failed");
                err.into()
            }
        }
    }
}
