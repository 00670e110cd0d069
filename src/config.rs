//! Configuration management for actionloop
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Every section is optional; an empty file yields the defaults the actions
//! were written against.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Upper bound for `openai.request_timeout_seconds`
const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 600;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allow repeated `/init` calls
    #[serde(default)]
    pub debug: bool,
    /// Action served when `/init` does not name one
    #[serde(default)]
    pub default_action: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            default_action: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// How the API key is presented to the endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    #[default]
    Bearer,
    /// `api-key: <key>` (Azure OpenAI)
    ApiKey,
}

/// Outbound OpenAI-compatible settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Host used by the models action when none is supplied
    #[serde(default = "default_fallback_host")]
    pub fallback_host: String,
    #[serde(default)]
    pub auth: AuthScheme,
    /// No timeout is applied when unset
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            fallback_host: default_fallback_host(),
            auth: AuthScheme::default(),
            request_timeout_seconds: None,
        }
    }
}

fn default_model() -> String {
    "gpt-35-turbo".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_fallback_host() -> String {
    "openai.nuvolaris.io".to_string()
}

/// Template action settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_template_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_template_name")]
    pub name: String,
    /// Keep compiled templates for the process lifetime
    #[serde(default)]
    pub cache: bool,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_template_dir(),
            name: default_template_name(),
            cache: false,
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_template_name() -> String {
    "hello.html".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_ref = path.as_ref();
        let contents =
            std::fs::read_to_string(path_ref).map_err(|source| AppError::ConfigReadFailed {
                path: path_ref.display().to_string(),
                source,
            })?;

        let config: Config =
            toml::from_str(&contents).map_err(|source| AppError::ConfigParseFailed {
                path: path_ref.display().to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                path = %path.as_ref().display(),
                "Config file not found, using defaults"
            );
            Ok(Self::default())
        }
    }

    /// Outbound request timeout, if configured
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        self.openai
            .request_timeout_seconds
            .map(std::time::Duration::from_secs)
    }

    /// Validate configuration values
    ///
    /// Called by `from_file()` and `from_str()`, and can be called again after
    /// building a config in code.
    pub fn validate(&self) -> AppResult<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.openai.model.trim().is_empty() {
            return Err(AppError::Config("openai.model cannot be empty".to_string()));
        }

        if self.openai.fallback_host.trim().is_empty() {
            return Err(AppError::Config(
                "openai.fallback_host cannot be empty".to_string(),
            ));
        }

        if let Some(timeout) = self.openai.request_timeout_seconds
            && (timeout == 0 || timeout > MAX_REQUEST_TIMEOUT_SECONDS)
        {
            return Err(AppError::Config(format!(
                "openai.request_timeout_seconds must be in 1..={}, got {}",
                MAX_REQUEST_TIMEOUT_SECONDS, timeout
            )));
        }

        if self.templates.name.trim().is_empty() {
            return Err(AppError::Config(
                "templates.name cannot be empty".to_string(),
            ));
        }

        if let Some(action) = &self.server.default_action
            && !crate::actions::BUILTIN_ACTIONS.contains(&action.as_str())
        {
            return Err(AppError::Config(format!(
                "server.default_action '{}' is not a known action (expected one of: {})",
                action,
                crate::actions::BUILTIN_ACTIONS.join(", ")
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 9090
debug = true
default_action = "chat"

[openai]
model = "gpt-4o-mini"
fallback_host = "api.example.test/v1"
auth = "api-key"
request_timeout_seconds = 45

[templates]
dir = "/srv/templates"
name = "greeting.html"
cache = true

[observability]
log_level = "debug"
"#;

    #[test]
    fn test_config_from_str_parses_successfully() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert!(config.server.debug);
        assert_eq!(config.server.default_action.as_deref(), Some("chat"));
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.openai.fallback_host, "api.example.test/v1");
        assert_eq!(config.openai.auth, AuthScheme::ApiKey);
        assert_eq!(
            config.request_timeout(),
            Some(std::time::Duration::from_secs(45))
        );
        assert_eq!(config.templates.dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.templates.name, "greeting.html");
        assert!(config.templates.cache);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").expect("empty config should be valid");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(!config.server.debug);
        assert_eq!(config.server.default_action, None);
        assert_eq!(config.openai.model, "gpt-35-turbo");
        assert_eq!(config.openai.system_prompt, "You are a helpful assistant.");
        assert_eq!(config.openai.fallback_host, "openai.nuvolaris.io");
        assert_eq!(config.openai.auth, AuthScheme::Bearer);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.templates.dir, PathBuf::from("templates"));
        assert_eq!(config.templates.name, "hello.html");
        assert!(!config.templates.cache);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_rejects_zero_port() {
        let result = Config::from_str("[server]\nport = 0\n");
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("port")));
    }

    #[test]
    fn test_rejects_empty_model() {
        let result = Config::from_str("[openai]\nmodel = \"  \"\n");
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("model")));
    }

    #[test]
    fn test_rejects_out_of_range_timeout() {
        let zero = Config::from_str("[openai]\nrequest_timeout_seconds = 0\n");
        assert!(zero.is_err());

        let huge = Config::from_str("[openai]\nrequest_timeout_seconds = 601\n");
        assert!(matches!(huge, Err(AppError::Config(msg)) if msg.contains("601")));
    }

    #[test]
    fn test_rejects_unknown_default_action() {
        let result = Config::from_str("[server]\ndefault_action = \"sentiment\"\n");
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("sentiment")));
    }

    #[test]
    fn test_rejects_unknown_auth_scheme() {
        let result = Config::from_str("[openai]\nauth = \"basic\"\n");
        assert!(matches!(result, Err(AppError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_from_file_reports_missing_file() {
        let result = Config::from_file("/nonexistent/actionloop.toml");
        assert!(matches!(result, Err(AppError::ConfigReadFailed { .. })));
    }

    #[test]
    fn test_from_file_or_default_with_missing_file() {
        let config = Config::from_file_or_default("/nonexistent/actionloop.toml")
            .expect("missing file should fall back to defaults");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 3001\n").unwrap();

        let config = Config::from_file(&path).expect("should load config");
        assert_eq!(config.server.port, 3001);
    }
}
