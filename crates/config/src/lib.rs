//! Configuration loading, validation, and management for Sommelier.
//!
//! Loads an optional `sommelier.toml` (path overridable with
//! `SOMMELIER_CONFIG`), then `.env`, then applies environment variable
//! overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `sommelier.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name the concierge introduces itself on behalf of
    #[serde(default = "default_winery_name")]
    pub winery_name: String,

    /// Completion API settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Weather tool settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Web search tool settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Business knowledge document
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// HTTP server settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Outbound call timeouts
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

fn default_winery_name() -> String {
    "Napa Valley Premium Winery".into()
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("winery_name", &self.winery_name)
            .field("provider", &self.provider)
            .field("weather", &self.weather)
            .field("search", &self.search)
            .field("knowledge", &self.knowledge)
            .field("gateway", &self.gateway)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_provider_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_provider_name() -> String {
    "openai".into()
}
fn default_provider_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            name: default_provider_name(),
            base_url: default_provider_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL serving both `/geo/1.0/direct` and `/data/2.5/weather`
    #[serde(default = "default_weather_url")]
    pub base_url: String,

    /// Location label that skips geocoding
    #[serde(default = "default_primary_location")]
    pub primary_location: String,

    #[serde(default = "default_primary_latitude")]
    pub primary_latitude: f64,

    #[serde(default = "default_primary_longitude")]
    pub primary_longitude: f64,
}

fn default_weather_url() -> String {
    "https://api.openweathermap.org".into()
}
fn default_primary_location() -> String {
    "Napa, CA".into()
}
fn default_primary_latitude() -> f64 {
    38.2975
}
fn default_primary_longitude() -> f64 {
    -122.2869
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
            primary_location: default_primary_location(),
            primary_latitude: default_primary_latitude(),
            primary_longitude: default_primary_longitude(),
        }
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("primary_location", &self.primary_location)
            .field("primary_latitude", &self.primary_latitude)
            .field("primary_longitude", &self.primary_longitude)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub base_url: String,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_search_url() -> String {
    "https://html.duckduckgo.com".into()
}
fn default_max_results() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    #[serde(default = "default_knowledge_path")]
    pub path: PathBuf,
}

fn default_knowledge_path() -> PathBuf {
    PathBuf::from("wine_business_info.txt")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: default_knowledge_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Per-call timeout for weather and search requests
    #[serde(default = "default_tool_timeout")]
    pub tool_secs: u64,

    /// Per-call timeout for the completion API
    #[serde(default = "default_completion_timeout")]
    pub completion_secs: u64,
}

fn default_tool_timeout() -> u64 {
    5
}
fn default_completion_timeout() -> u64 {
    30
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            tool_secs: default_tool_timeout(),
            completion_secs: default_completion_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path, `.env`, and the process
    /// environment.
    ///
    /// Environment variables take priority over the file:
    /// - `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `SOMMELIER_MODEL`
    /// - `OPENWEATHER_API_KEY`
    /// - `KNOWLEDGE_FILE`
    /// - `APP_HOST`, `APP_PORT`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("SOMMELIER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path());
        let mut config = Self::load_from(&config_path)?;

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Takes the lookup as a closure so tests never touch the real process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = non_empty("OPENAI_BASE_URL") {
            self.provider.base_url = url;
        }
        if let Some(model) = non_empty("SOMMELIER_MODEL") {
            self.provider.model = model;
        }
        if let Some(key) = non_empty("OPENWEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(path) = non_empty("KNOWLEDGE_FILE") {
            self.knowledge.path = PathBuf::from(path);
        }
        if let Some(host) = non_empty("APP_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = non_empty("APP_PORT") {
            self.gateway.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("APP_PORT must be a port number, got '{port}'"))
            })?;
        }

        Ok(())
    }

    /// Default config file location: `./sommelier.toml`.
    pub fn default_path() -> PathBuf {
        PathBuf::from("sommelier.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.temperature < 0.0 || self.provider.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.search.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "search.max_results must be at least 1".into(),
            ));
        }

        if self.timeouts.tool_secs == 0 || self.timeouts.completion_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Check if a completion API key is available.
    pub fn has_api_key(&self) -> bool {
        self.provider.api_key.is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            winery_name: default_winery_name(),
            provider: ProviderConfig::default(),
            weather: WeatherConfig::default(),
            search: SearchConfig::default(),
            knowledge: KnowledgeConfig::default(),
            gateway: GatewayConfig::default(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl From<ConfigError> for sommelier_core::Error {
    fn from(e: ConfigError) -> Self {
        sommelier_core::Error::Config {
            message: e.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
