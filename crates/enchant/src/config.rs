use std::fmt;
use std::io::ErrorKind;
use std::ops::RangeInclusive;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Settings (secrets, from the environment)
// ============================================================================

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";

/// Credentials for the remote completion API.
///
/// Loaded once at startup and handed to the client accessor. Never logged in full.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
}

impl Settings {
    /// Read `API_KEY` and `API_BASE` from the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, trying the upper-case key before the lower-case one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |name: &str| {
            lookup(&name.to_ascii_uppercase())
                .or_else(|| lookup(name))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("api_key").ok_or(SettingsError::MissingApiKey)?;
        let api_base = get("api_base").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Ok(Self { api_key, api_base })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("API_KEY is not set (export it or add it to .env)")]
    MissingApiKey,
}

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    /// First port tried when binding.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Exclusive upper bound of the port scan.
    #[serde(default = "default_port_range_end")]
    pub port_range_end: u16,
    /// Kill the local process holding a busy port before moving on.
    #[serde(default = "default_reclaim_busy_ports")]
    pub reclaim_busy_ports: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_range_end: default_port_range_end(),
            reclaim_busy_ports: default_reclaim_busy_ports(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// Ports to scan, always including `port` itself even when it lies past the end.
    pub fn port_range(&self) -> RangeInclusive<u16> {
        let last = self.port_range_end.saturating_sub(1).max(self.port);
        self.port..=last
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_port_range_end() -> u16 {
    8020
}

fn default_reclaim_busy_ports() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// CorsConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

// ============================================================================
// CompletionConfig
// ============================================================================

/// Fixed parameters sent with every completion request.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

// ============================================================================
// Tests
// ============================================================================
