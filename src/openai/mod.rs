//! OpenAI-compatible outbound API
//!
//! - `POST <base>/chat/completions` - used by the chat action
//! - `GET <base>/models` - used by the models action

pub mod client;
pub mod types;

pub use client::{OpenAiClient, base_url};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};
