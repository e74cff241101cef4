//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The `[tracker]` section is the live user setting set: the engine
//! receives a fresh `TrackerConfig` on every valuation call, so changes
//! made mid-session apply to the next event.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::ValuationMode;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    pub prices: PricesConfig,
    #[serde(default)]
    pub replay: ReplayConfig,
}

/// User-facing tracker settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Comma or semicolon separated item names to value at zero.
    #[serde(default)]
    pub ignore_items: String,
    #[serde(default)]
    pub ignore_coins: bool,
    #[serde(default)]
    pub use_high_alchemy_value: bool,
    /// Whether the panel shows the profit lines.
    #[serde(default = "default_true")]
    pub display_profit: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricesConfig {
    /// "wiki" or "file".
    pub source: String,
    /// Price table path when `source = "file"`.
    #[serde(default)]
    pub path: Option<String>,
    /// User agent sent to the wiki prices API (the API rejects blank agents).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayConfig {
    /// Event log to replay when none is given on the command line.
    #[serde(default)]
    pub events_path: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            ignore_items: String::new(),
            ignore_coins: false,
            use_high_alchemy_value: false,
            display_profit: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    "inventory-value/0.1.0 (session profit tracker)".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}

impl TrackerConfig {
    /// The valuation mode these settings select.
    pub fn valuation_mode(&self) -> ValuationMode {
        ValuationMode::from_high_alchemy(self.use_high_alchemy_value)
    }

    /// Build the ignored-name list: split on `,` or `;`, trim, lowercase.
    ///
    /// Recomputed on every call since the raw string can change live.
    pub fn ignored_items(&self) -> Vec<String> {
        self.ignore_items
            .to_lowercase()
            .split([',', ';'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect()
    }
}
