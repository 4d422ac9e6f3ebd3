//! Configuration loading from TOML.
//!
//! All fields default to the public production endpoints, so a missing
//! `config.toml` is fine; an existing file can override any subset
//! (alternate base URLs for mirrors or test servers, fetch limits,
//! disabling a source entirely).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Identifying user-agent sent on every upstream request.
pub const USER_AGENT: &str = "prediction-markets/1.0";

/// Default per-request timeout. Upstreams occasionally hang; without this
/// a single stuck connection would stall the whole aggregate response.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub sources: SourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SourcesConfig {
    pub polymarket: PolymarketConfig,
    pub predictit: PredictItConfig,
    pub kalshi: KalshiConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PolymarketConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Maximum markets requested from (and returned by) the fetch.
    pub limit: u32,
}

impl Default for PolymarketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://clob.polymarket.com".to_string(),
            limit: 50,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PredictItConfig {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for PredictItConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://www.predictit.org".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct KalshiConfig {
    pub enabled: bool,
    pub base_url: String,
}

impl Default for KalshiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.elections.kalshi.com".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` if it exists, otherwise use built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
