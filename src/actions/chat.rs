//! Chat action
//!
//! Forwards `input` as a system + user chat completion and returns the text
//! of the first choice.

use super::Action;
use crate::config::{AuthScheme, OpenAiConfig};
use crate::error::ActionError;
use crate::openai::{ChatCompletionRequest, ChatMessage, OpenAiClient};
use crate::params::{EnvSnapshot, OPENAI_API_HOST, OPENAI_API_KEY, Params, resolve};
use crate::response::ActionResponse;
use async_trait::async_trait;

pub const NAME: &str = "chat";

/// Reply when no input was given
pub const EMPTY_INPUT_REPLY: &str = "Please provide an input parameter.";

pub struct ChatAction {
    http: reqwest::Client,
    model: String,
    system_prompt: String,
    auth: AuthScheme,
}

impl ChatAction {
    pub fn new(http: reqwest::Client, config: &OpenAiConfig) -> Self {
        Self {
            http,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
            auth: config.auth,
        }
    }

    /// Chat completion request for `input`
    pub fn request(&self, input: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(self.system_prompt.as_str()),
                ChatMessage::user(input),
            ],
        }
    }

    async fn complete(
        &self,
        host: Option<String>,
        api_key: Option<String>,
        input: &str,
    ) -> Result<String, ActionError> {
        let host = host.ok_or(ActionError::MissingHost)?;
        let client = OpenAiClient::new(self.http.clone(), &host, api_key, self.auth)?;

        let response = client.chat_completion(&self.request(input)).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| ActionError::NoChoices {
                url: client.base_url().to_string(),
            })
    }
}

#[async_trait]
impl Action for ChatAction {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn invoke(&self, params: &Params, env: &EnvSnapshot) -> ActionResponse {
        let api_key = resolve(params, env, OPENAI_API_KEY);
        let host = resolve(params, env, OPENAI_API_HOST);

        let Some(input) = params.get_truthy("input") else {
            return ActionResponse::body(EMPTY_INPUT_REPLY);
        };

        tracing::info!(
            model = %self.model,
            input_chars = input.chars().count(),
            has_key = api_key.is_some(),
            "Forwarding chat input"
        );

        self.complete(host, api_key, &input).await.into()
    }
}
