//! Invocation parameters and environment snapshot
//!
//! Parameters arrive per invocation as a JSON object. Credentials may also
//! come from the environment, captured once into an [`EnvSnapshot`] so that
//! resolution stays a pure function of its inputs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Parameter carrying the OpenAI API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Parameter carrying the OpenAI API host
pub const OPENAI_API_HOST: &str = "OPENAI_API_HOST";

/// Request parameters for one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and the CLI
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get a parameter as text
    ///
    /// Strings are returned as-is; numbers and booleans through their textual
    /// form. `null`, arrays and objects count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(primitive_text)
    }

    /// Get a parameter as text, treating falsy values as absent
    ///
    /// `""`, `0`, `false` and `null` are falsy, as are arrays and objects
    /// (which have no text form).
    pub fn get_truthy(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            value => primitive_text(value).filter(|s| !s.is_empty()),
        }
    }

    /// Like [`Params::get_str`] but also treats the empty string as absent
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn primitive_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Read-only view of environment variables available to actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot(HashMap<String, String>);

impl EnvSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self(std::env::vars().collect())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Return a new snapshot with `overlay` applied on top
    ///
    /// Overlay values are JSON primitives (as sent in an `/init` body).
    /// Non-primitive values are skipped.
    pub fn overlay(&self, overlay: &Map<String, Value>) -> Self {
        let mut vars = self.0.clone();
        for (key, value) in overlay {
            match primitive_text(value) {
                Some(text) => {
                    vars.insert(key.clone(), text);
                }
                None => {
                    tracing::debug!(key = %key, "Skipping non-primitive env value");
                }
            }
        }
        Self(vars)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-activation fields sent next to `value` in a run body
///
/// `activation_id`, `namespace`, `action_name`, `deadline`, `api_key` and
/// anything else the platform adds. Actions see each as `__OW_<KEY>`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ActivationContext(Map<String, Value>);

impl ActivationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Platform-assigned activation id, if one was sent
    pub fn activation_id(&self) -> Option<&str> {
        self.0
            .get("activation_id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Context fields renamed to their `__OW_<KEY>` variable names
    pub fn env_vars(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(key, value)| (format!("__OW_{}", key.to_uppercase()), value.clone()))
            .collect()
    }

    /// `env` with the context variables applied on top
    pub fn apply(&self, env: &EnvSnapshot) -> EnvSnapshot {
        env.overlay(&self.env_vars())
    }
}

impl From<Map<String, Value>> for ActivationContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Resolve a setting from parameters, falling back to the environment
///
/// A non-empty parameter wins; otherwise a non-empty environment value is used.
pub fn resolve(params: &Params, env: &EnvSnapshot, key: &str) -> Option<String> {
    params.get_non_empty(key).or_else(|| {
        env.get(key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    })
}
