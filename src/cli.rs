//! Command-line interface for actionloop
//!
//! Provides argument parsing and subcommand handling for the actionloop binary.

use clap::{Parser, Subcommand};
use serde_json::Value;

/// Action-loop runtime for OpenAI-backed serverless actions
#[derive(Parser)]
#[command(name = "actionloop")]
#[command(version)]
#[command(about = "Action-loop runtime for OpenAI-backed serverless actions")]
#[command(
    long_about = "actionloop serves chat, model-listing and template actions over the \
    OpenWhisk action-loop protocol (/init, /run), or invokes a single action locally."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Subcommand)]
pub enum Command {
    /// Run the action-loop HTTP server (default)
    Serve,

    /// Invoke one action locally and print its response
    Invoke {
        /// Action name (see `actions`)
        action: String,

        /// Parameter as key=value; JSON values are parsed, anything else is a string
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the available actions
    Actions,
}

/// Parse a `key=value` parameter
pub fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    if key.is_empty() {
        return Err(format!("parameter name cannot be empty in '{}'", raw));
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# actionloop Configuration
# =========================
#
# Every section and key is optional; the values below are the defaults.

# ─────────────────────────────────────────────────────────────────────────────
# SERVER CONFIGURATION
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on (the platform expects 8080)
port = 8080

# Allow /init to be called more than once
debug = false

# Action served when /init does not name one: "chat", "models", "template", "hello"
# default_action = "chat"

# ─────────────────────────────────────────────────────────────────────────────
# OPENAI-COMPATIBLE ENDPOINTS
# ─────────────────────────────────────────────────────────────────────────────
#
# Keys and hosts are passed per invocation (OPENAI_API_KEY, OPENAI_API_HOST).
# The chat action falls back to the environment for both.

[openai]
# Model used by the chat action
model = "gpt-35-turbo"

# System turn sent before the user's input
system_prompt = "You are a helpful assistant."

# Host used by the models action when OPENAI_API_HOST is not given
fallback_host = "openai.nuvolaris.io"

# Credential header: "bearer" (Authorization: Bearer) or "api-key" (Azure)
auth = "bearer"

# Outbound request timeout in seconds (no timeout when unset)
# request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# TEMPLATES
# ─────────────────────────────────────────────────────────────────────────────

[templates]
dir = "templates"
name = "hello.html"

# Keep compiled templates in memory instead of re-reading them per invocation
cache = false

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
