//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Secrets (the MongoDB connection string) are referenced by env-var
//! name in the config and resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub quotes: QuotesConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Seconds between evaluation ticks.
    pub poll_interval_secs: u64,
    /// Currency pair in Coinbase notation, e.g. "BTC-USD".
    pub currency_pair: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuotesConfig {
    /// Spot-price endpoint root; pair and side are appended as path segments.
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Name of the env var holding the connection URI. The URI carries
    /// credentials, so it never appears in the config file itself.
    pub uri_env: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct NotifierConfig {
    /// When set, fired alerts are POSTed here as JSON; otherwise they
    /// are only logged.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Resolve an environment variable name to its value.
    /// Used for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }
}
