//! Item price lookup.
//!
//! Defines the synchronous `PriceSource` trait the valuation core reads
//! from, the in-memory `PriceTable` that implements it, and the async
//! `PriceFeed` trait used at start-up to fill a table from:
//! - a JSON price file on disk
//! - the OSRS Wiki real-time prices API

pub mod wiki;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::PricesConfig;
use crate::types::{ItemId, TrackerError, ValuationMode};

// ---------------------------------------------------------------------------
// Price source
// ---------------------------------------------------------------------------

/// Read-only price and name lookup.
///
/// Implementors must answer from memory: the engine calls these on every
/// event and never expects them to block.
#[cfg_attr(test, mockall::automock)]
pub trait PriceSource {
    /// Price of one unit in the given mode. Unknown items are worth 0.
    fn price(&self, id: ItemId, mode: ValuationMode) -> i64;

    /// Display name of the item. Unknown items have an empty name.
    fn name(&self, id: ItemId) -> String;

    /// Candidate items whose name matches `name` (case-insensitive).
    fn search(&self, name: &str) -> Vec<ItemId>;
}

// ---------------------------------------------------------------------------
// Price table
// ---------------------------------------------------------------------------

/// Prices and name of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: ItemId,
    pub name: String,
    /// Market (Grand Exchange) price.
    #[serde(default)]
    pub market: i64,
    /// High alchemy value.
    #[serde(default)]
    pub high_alch: i64,
}

/// In-memory price table keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    entries: HashMap<ItemId, PriceEntry>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a list of entries. Later duplicates win.
    pub fn from_entries(entries: impl IntoIterator<Item = PriceEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.insert(entry);
        }
        table
    }

    /// Parse a JSON array of `PriceEntry`.
    pub fn from_json(json: &str) -> Result<Self, TrackerError> {
        let entries: Vec<PriceEntry> =
            serde_json::from_str(json).map_err(|e| TrackerError::PriceTable {
                source_name: "json".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::from_entries(entries))
    }

    pub fn insert(&mut self, entry: PriceEntry) {
        self.entries.insert(entry.id, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PriceSource for PriceTable {
    fn price(&self, id: ItemId, mode: ValuationMode) -> i64 {
        match (self.entries.get(&id), mode) {
            (Some(entry), ValuationMode::Market) => entry.market,
            (Some(entry), ValuationMode::HighAlchemy) => entry.high_alch,
            (None, _) => 0,
        }
    }

    fn name(&self, id: ItemId) -> String {
        self.entries
            .get(&id)
            .map(|entry| entry.name.clone())
            .unwrap_or_default()
    }

    fn search(&self, name: &str) -> Vec<ItemId> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut found: Vec<ItemId> = self
            .entries
            .values()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .map(|entry| entry.id)
            .collect();
        found.sort();
        found
    }
}

// ---------------------------------------------------------------------------
// Price feeds
// ---------------------------------------------------------------------------

/// A start-up source of prices.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch a complete price table.
    async fn fetch_table(&self) -> Result<PriceTable>;

    /// Feed name for logging.
    fn name(&self) -> &str;
}

/// Loads a `PriceTable` from a JSON file.
pub struct FilePriceFeed {
    path: PathBuf,
}

impl FilePriceFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceFeed for FilePriceFeed {
    async fn fetch_table(&self) -> Result<PriceTable> {
        debug!(path = %self.path.display(), "Reading price file");
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read price file {}", self.path.display()))?;
        let table = PriceTable::from_json(&json)
            .with_context(|| format!("Failed to parse price file {}", self.path.display()))?;
        info!(path = %self.path.display(), items = table.len(), "Price file loaded");
        Ok(table)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Build the feed named by `[prices] source`.
pub fn feed_from_config(cfg: &PricesConfig) -> Result<Box<dyn PriceFeed>> {
    let feed: Box<dyn PriceFeed> = match cfg.source.as_str() {
        "wiki" => Box::new(wiki::WikiPriceClient::new(&cfg.user_agent, cfg.timeout_secs)?),
        "file" => {
            let Some(path) = cfg.path.as_deref() else {
                return Err(TrackerError::Config(
                    "prices.source = \"file\" requires prices.path".to_string(),
                )
                .into());
            };
            Box::new(FilePriceFeed::new(path))
        }
        other => {
            return Err(TrackerError::Config(format!(
                "unknown price source '{other}' (expected \"wiki\" or \"file\")"
            ))
            .into())
        }
    };
    Ok(feed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
