//! Configuration for the Adzuna MCP server
//!
//! Settings come from an optional TOML file; every field has a default so the
//! server runs with no file at all. Credentials never live in the file: the
//! file names the environment variables they are read from.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Production Adzuna API root
pub const DEFAULT_BASE_URL: &str = "https://api.adzuna.com/v1/api";
pub const DEFAULT_APP_ID_ENV: &str = "ADZUNA_APP_ID";
pub const DEFAULT_APP_KEY_ENV: &str = "ADZUNA_APP_KEY";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub api: ApiSection,
}

/// MCP server identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Name reported in the MCP `initialize` handshake
    #[serde(default = "default_server_name")]
    pub name: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

fn default_server_name() -> String {
    "Adzuna Jobs".to_string()
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSection {
    /// API root, without a trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable containing the application id
    #[serde(default = "default_app_id_env")]
    pub app_id_env: String,
    /// Environment variable containing the application key
    #[serde(default = "default_app_key_env")]
    pub app_key_env: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            app_id_env: default_app_id_env(),
            app_key_env: default_app_key_env(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_app_id_env() -> String {
    DEFAULT_APP_ID_ENV.to_string()
}

fn default_app_key_env() -> String {
    DEFAULT_APP_KEY_ENV.to_string()
}

/// Adzuna application credentials
#[derive(Clone, PartialEq)]
pub struct Credentials {
    pub app_id: String,
    pub app_key: String,
}

impl Credentials {
    pub fn new<I: Into<String>, K: Into<String>>(app_id: I, app_key: K) -> Self {
        Self {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }

    /// Query parameters attached to every authenticated request
    pub fn query_params(&self) -> [(&'static str, &str); 2] {
        [
            ("app_id", self.app_id.as_str()),
            ("app_key", self.app_key.as_str()),
        ]
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .finish()
    }
}

/// Immutable settings handed to the API client at construction
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub app_id_env: String,
    pub app_key_env: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ApiSection::default().client_settings()
    }
}

impl ApiSection {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            app_id_env: self.app_id_env.clone(),
            app_key_env: self.app_key_env.clone(),
        }
    }

    /// Validate base URL and timeout
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.app_id_env.trim().is_empty() || self.app_key_env.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "api.app_id_env and api.app_key_env must name environment variables".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(content)?;
        config.api.validate()?;
        Ok(config)
    }

    /// Read credentials from the environment variables named in `[api]`
    pub fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
        let app_id = Self::get_env_var_required(&self.api.app_id_env)?;
        let app_key = Self::get_env_var_required(&self.api.app_key_env)?;
        Ok(Credentials { app_id, app_key })
    }

    /// Empty values count as missing
    fn get_env_var_required(env_var_name: &str) -> Result<String, ConfigError> {
        std::env::var(env_var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound(env_var_name.to_string()))
    }
}
