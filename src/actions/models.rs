//! Models action
//!
//! Lists the models available at an OpenAI-compatible endpoint and returns
//! the raw listing as pretty-printed JSON text.

use super::Action;
use crate::config::{AuthScheme, OpenAiConfig};
use crate::error::ActionError;
use crate::openai::OpenAiClient;
use crate::params::{EnvSnapshot, OPENAI_API_HOST, OPENAI_API_KEY, Params};
use crate::response::ActionResponse;
use async_trait::async_trait;

pub const NAME: &str = "models";

pub struct ModelsAction {
    http: reqwest::Client,
    fallback_host: String,
    auth: AuthScheme,
}

impl ModelsAction {
    pub fn new(http: reqwest::Client, config: &OpenAiConfig) -> Self {
        Self {
            http,
            fallback_host: config.fallback_host.clone(),
            auth: config.auth,
        }
    }

    /// Host the listing is requested from
    pub fn target_host(&self, params: &Params) -> String {
        params
            .get_non_empty(OPENAI_API_HOST)
            .unwrap_or_else(|| self.fallback_host.clone())
    }

    async fn list(&self, host: &str, api_key: String) -> Result<String, ActionError> {
        let client = OpenAiClient::new(self.http.clone(), host, Some(api_key), self.auth)?;
        tracing::info!(url = %client.base_url(), "Sending request to list models");

        let listing = client.list_models().await?;
        Ok(serde_json::to_string_pretty(&listing)?)
    }
}

#[async_trait]
impl Action for ModelsAction {
    fn name(&self) -> &'static str {
        NAME
    }

    // Credentials come from parameters only; the environment is not consulted.
    async fn invoke(&self, params: &Params, _env: &EnvSnapshot) -> ActionResponse {
        let Some(api_key) = params.get_non_empty(OPENAI_API_KEY) else {
            return ActionError::MissingCredential.into();
        };

        let host = self.target_host(params);
        self.list(&host, api_key).await.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> ModelsAction {
        ModelsAction::new(reqwest::Client::new(), &OpenAiConfig::default())
    }

    #[test]
    fn test_target_host_defaults_to_fallback() {
        let params = Params::new().with(OPENAI_API_KEY, "sk-test");
        assert_eq!(action().target_host(&params), "openai.nuvolaris.io");
    }

    #[test]
    fn test_target_host_prefers_param() {
        let params = Params::new().with(OPENAI_API_HOST, "api.example.test");
        assert_eq!(action().target_host(&params), "api.example.test");
    }

    #[test]
    fn test_empty_host_param_uses_fallback() {
        let params = Params::new().with(OPENAI_API_HOST, "");
        assert_eq!(action().target_host(&params), "openai.nuvolaris.io");
    }

    #[tokio::test]
    async fn test_missing_key_is_error() {
        let response = action().invoke(&Params::new(), &EnvSnapshot::new()).await;
        assert_eq!(response, ActionResponse::error("OpenAI Key is not set"));
    }

    #[tokio::test]
    async fn test_env_key_is_not_used() {
        let env = EnvSnapshot::new().with(OPENAI_API_KEY, "sk-env");
        let response = action().invoke(&Params::new(), &env).await;
        assert_eq!(response, ActionResponse::error("OpenAI Key is not set"));
    }
}
