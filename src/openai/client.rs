//! Minimal OpenAI-compatible HTTP client
//!
//! One client is built per invocation from the resolved host and key; the
//! underlying `reqwest::Client` (and its connection pool) is shared.

use crate::config::AuthScheme;
use crate::error::ActionError;
use serde_json::Value;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Maximum number of characters of an error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Normalize a host setting into a base URL
///
/// A host without a scheme gets `https://`; trailing slashes are trimmed.
pub fn base_url(host: &str) -> Result<String, ActionError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ActionError::MissingHost);
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let normalized = with_scheme.trim_end_matches('/').to_string();

    reqwest::Url::parse(&normalized).map_err(|e| ActionError::InvalidHost {
        host: host.to_string(),
        reason: e.to_string(),
    })?;

    Ok(normalized)
}

/// Client bound to one endpoint and credential
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    auth: AuthScheme,
}

impl OpenAiClient {
    /// Create a client for `host`
    ///
    /// `api_key` may be `None`; the request is then sent without credentials
    /// and the endpoint decides.
    pub fn new(
        http: reqwest::Client,
        host: &str,
        api_key: Option<String>,
        auth: AuthScheme,
    ) -> Result<Self, ActionError> {
        Ok(Self {
            http,
            base_url: base_url(host)?,
            api_key,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST <base>/chat/completions`
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ActionError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(
            url = %url,
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let builder = self.authorize(self.http.post(&url)).json(request);
        let response = self.send(builder, &url).await?;
        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|source| ActionError::Http { url, source })
    }

    /// `GET <base>/models`, returned as opaque JSON
    pub async fn list_models(&self) -> Result<Value, ActionError> {
        let url = format!("{}/models", self.base_url);
        tracing::debug!(url = %url, "Sending list models request");

        let builder = self.authorize(self.http.get(&url));
        let response = self.send(builder, &url).await?;
        response
            .json::<Value>()
            .await
            .map_err(|source| ActionError::Http { url, source })
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match (&self.api_key, self.auth) {
            (Some(key), AuthScheme::Bearer) => builder.bearer_auth(key),
            (Some(key), AuthScheme::ApiKey) => builder.header("api-key", key),
            (None, _) => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ActionError> {
        let response = builder.send().await.map_err(|source| ActionError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(url = %url, status = %status, "Endpoint returned error status");
            return Err(ActionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        Ok(response)
    }
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
