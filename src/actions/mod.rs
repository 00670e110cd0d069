//! Serverless actions
//!
//! Each action is an independent, stateless handler: it receives the
//! invocation parameters plus a read-only environment snapshot and always
//! returns an [`ActionResponse`]. Failures never escape an action.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::params::{EnvSnapshot, Params};
use crate::response::ActionResponse;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod chat;
pub mod hello;
pub mod models;
pub mod template;

pub use chat::ChatAction;
pub use hello::HelloAction;
pub use models::ModelsAction;
pub use template::TemplateAction;

/// Names of the actions shipped with the runtime
pub const BUILTIN_ACTIONS: [&str; 4] = [
    chat::NAME,
    models::NAME,
    template::NAME,
    hello::NAME,
];

/// A single invocable action
///
/// Implementations must be stateless across invocations: identical inputs
/// against an identical upstream produce identical responses.
#[async_trait]
pub trait Action: Send + Sync {
    /// Name used to select the action at `/init` and on the command line
    fn name(&self) -> &'static str;

    /// Run the action once
    async fn invoke(&self, params: &Params, env: &EnvSnapshot) -> ActionResponse;
}

/// Lookup table of available actions
#[derive(Clone, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<&'static str, Arc<dyn Action>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry of built-in actions from configuration
    ///
    /// All OpenAI-backed actions share one HTTP client (and connection pool).
    pub fn builtin(config: &Config) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        let mut registry = Self::new();
        registry.register(ChatAction::new(http.clone(), &config.openai));
        registry.register(ModelsAction::new(http, &config.openai));
        registry.register(TemplateAction::new(&config.templates));
        registry.register(HelloAction);
        Ok(registry)
    }

    /// Add an action, replacing any action with the same name
    pub fn register<A: Action + 'static>(&mut self, action: A) {
        self.actions.insert(action.name(), Arc::new(action));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    /// Registered action names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        self.actions.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
