//! HTTP request handlers for the action-loop protocol
//!
//! - `POST /init` - select the action this runtime serves
//! - `POST /run` - invoke it with one set of parameters
//! - `GET /health`, `GET /metrics`

use crate::actions::{Action, ActionRegistry};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::{Metrics, Outcome};
use crate::middleware::request_id::{RequestId, request_id_middleware};
use crate::params::{ActivationContext, EnvSnapshot, Params};
use crate::response::ActionResponse;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod init;
pub mod metrics;
pub mod run;

/// Name OpenWhisk sends when the action does not override its entry point
const DEFAULT_MAIN: &str = "main";

/// The action selected by `/init`, with its environment
#[derive(Clone)]
struct Initialized {
    action: Arc<dyn Action>,
    env: Arc<EnvSnapshot>,
}

/// Application state shared across all handlers
///
/// All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    registry: Arc<ActionRegistry>,
    metrics: Arc<Metrics>,
    base_env: Arc<EnvSnapshot>,
    initialized: Arc<RwLock<Option<Initialized>>>,
}

impl AppState {
    /// Create a new AppState with the built-in actions
    pub fn new(config: Arc<Config>, env: EnvSnapshot) -> AppResult<Self> {
        let registry = ActionRegistry::builtin(&config)?;
        Self::with_registry(config, registry, env)
    }

    /// Create a new AppState serving the actions in `registry`
    pub fn with_registry(
        config: Arc<Config>,
        registry: ActionRegistry,
        env: EnvSnapshot,
    ) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to create metrics: {}", e)))?;

        Ok(Self {
            config,
            registry: Arc::new(registry),
            metrics: Arc::new(metrics),
            base_env: Arc::new(env),
            initialized: Arc::new(RwLock::new(None)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Name of the initialized action, if any
    pub async fn current_action(&self) -> Option<&'static str> {
        self.initialized
            .read()
            .await
            .as_ref()
            .map(|init| init.action.name())
    }

    pub async fn is_initialized(&self) -> bool {
        self.initialized.read().await.is_some()
    }

    /// Whether a further `/init` would be rejected
    pub async fn rejects_init(&self) -> bool {
        !self.config.server.debug && self.is_initialized().await
    }

    /// Select the served action and overlay its environment
    ///
    /// Fails with [`AppError::AlreadyInitialized`] on a second call unless
    /// `server.debug` is set.
    pub async fn initialize(
        &self,
        main: Option<&str>,
        env: &Map<String, Value>,
    ) -> AppResult<&'static str> {
        let mut slot = self.initialized.write().await;
        if slot.is_some() && !self.config.server.debug {
            return Err(AppError::AlreadyInitialized);
        }

        let name = main
            .filter(|m| !m.is_empty() && *m != DEFAULT_MAIN)
            .or(self.config.server.default_action.as_deref())
            .ok_or_else(|| {
                AppError::Validation(
                    "No action named in init request and no server.default_action configured"
                        .to_string(),
                )
            })?;

        let action = self
            .registry
            .get(name)
            .ok_or_else(|| AppError::ActionNotFound(name.to_string()))?;

        tracing::info!(
            action = action.name(),
            env_overrides = env.len(),
            reinitialized = slot.is_some(),
            "Action initialized"
        );

        let selected = action.name();
        *slot = Some(Initialized {
            action,
            env: Arc::new(self.base_env.overlay(env)),
        });
        Ok(selected)
    }

    /// Run the initialized action once
    ///
    /// The activation context is exported to the action as `__OW_*`
    /// variables. Logs use the platform's activation id when one is sent,
    /// else the request id.
    pub async fn run(
        &self,
        params: &Params,
        context: &ActivationContext,
        request_id: RequestId,
    ) -> AppResult<ActionResponse> {
        let Initialized { action, env } = self
            .initialized
            .read()
            .await
            .clone()
            .ok_or(AppError::NotInitialized)?;

        let id = context
            .activation_id()
            .map(str::to_string)
            .unwrap_or_else(|| request_id.to_string());
        let env = if context.is_empty() {
            env
        } else {
            Arc::new(context.apply(&env))
        };

        let started = Instant::now();
        let response = action.invoke(params, &env).await;
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        let outcome = Outcome::from(&response);
        if let Err(e) = self
            .metrics
            .record_invocation(action.name(), outcome, duration_ms)
        {
            tracing::warn!(
                activation_id = %id,
                error = %e,
                "Failed to record activation metrics"
            );
        }

        tracing::info!(
            activation_id = %id,
            action = action.name(),
            outcome = outcome.as_str(),
            duration_ms,
            "Activation finished"
        );

        Ok(response)
    }
}

/// Build the HTTP router for the action-loop protocol
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/init", post(init::handler))
        .route("/run", post(run::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
