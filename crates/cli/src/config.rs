//! Configuration loading from goodfoods.toml.

use serde::Deserialize;
use std::path::Path;

const API_KEY_ENV: &str = "GOODFOODS_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Model gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Gateway endpoint configuration.
#[derive(Debug, Default, Deserialize)]
pub struct GatewayConfig {
    /// Chat-completions endpoint URL. Defaults to the Groq endpoint.
    pub api_url: Option<String>,

    /// Model to use.
    pub model: Option<String>,

    /// Bearer credential. Falls back to the GOODFOODS_API_KEY environment
    /// variable; if neither is set the gateway degrades per request instead
    /// of failing at startup.
    pub api_key: Option<String>,
}

/// Catalog file configuration.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Path to the restaurants JSON file.
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "restaurants.json".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from the given path if it exists, else use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the API key: config file first, then the environment.
    pub fn api_key(&self) -> Option<String> {
        self.gateway
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
