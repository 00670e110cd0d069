//! Error types for actionloop
//!
//! Two layers of errors exist:
//! - [`AppError`] covers host-level failures (configuration, action-loop protocol).
//!   It implements `IntoResponse` for Axum handlers.
//! - [`ActionError`] covers failures inside a single invocation. It never leaves
//!   an action: every action converts it into an `{"error": ...}` response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Action {0} not found")]
    ActionNotFound(String),

    #[error("Cannot initialize the action more than once.")]
    AlreadyInitialized,

    #[error("no action defined yet")]
    NotInitialized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ActionNotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyInitialized => StatusCode::FORBIDDEN,
            Self::NotInitialized => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_)
            | Self::ConfigParseFailed { .. }
            | Self::ConfigReadFailed { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Validation and Internal carry the caller-facing text directly
        let message = match self {
            Self::Validation(msg) | Self::Internal(msg) => msg,
            other => other.to_string(),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;

/// Failure inside a single action invocation
///
/// The `Display` text is what ends up in the `error` field of the response.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("OpenAI Key is not set")]
    MissingCredential,

    #[error("OpenAI Host is not set")]
    MissingHost,

    #[error("Invalid OpenAI host {host}: {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Chat completion from {url} returned no choices")]
    NoChoices { url: String },

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Cannot read template {path}: {source}")]
    TemplateRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_creates() {
        let err = AppError::Config("test error".to_string());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_initialized_message_matches_runtime() {
        assert_eq!(AppError::NotInitialized.to_string(), "no action defined yet");
    }

    #[test]
    fn test_already_initialized_response_status() {
        let response = AppError::AlreadyInitialized.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_validation_error_response_status() {
        let err = AppError::Validation("test".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_action_not_found_response_status() {
        let response = AppError::ActionNotFound("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_initialized_response_status() {
        let response = AppError::NotInitialized.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_error_body_is_bare_message() {
        let response = AppError::Validation("Error decoding run body: eof".to_string())
            .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Error decoding run body: eof");
    }

    #[test]
    fn test_missing_credential_message() {
        assert_eq!(
            ActionError::MissingCredential.to_string(),
            "OpenAI Key is not set"
        );
    }

    #[test]
    fn test_status_error_message() {
        let err = ActionError::Status {
            url: "https://example.test/models".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "https://example.test/models returned 401: unauthorized"
        );
    }
}
