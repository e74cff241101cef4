//! OSRS Wiki real-time prices.
//!
//! API docs: https://oldschool.runescape.wiki/w/RuneScape:Real-time_Prices
//! Base URL: https://prices.runescape.wiki/api/v1/osrs
//! Auth: none, but a descriptive User-Agent is required.
//!
//! `/mapping` supplies names and high alchemy values, `/latest` the most
//! recent instant-buy (`high`) and instant-sell (`low`) prices. The market
//! price is the midpoint of the two when both are known.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::{PriceEntry, PriceFeed, PriceTable};
use crate::types::{ItemId, TrackerError};

const BASE_URL: &str = "https://prices.runescape.wiki/api/v1/osrs";
const FEED_NAME: &str = "osrs-wiki";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

/// One row of `/mapping`. Only the fields we need.
#[derive(Debug, Deserialize)]
struct WikiMapping {
    id: i32,
    name: String,
    #[serde(default)]
    highalch: Option<i64>,
}

/// One item in `/latest`.
#[derive(Debug, Deserialize)]
struct WikiLatest {
    #[serde(default)]
    high: Option<i64>,
    #[serde(default)]
    low: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WikiLatestResponse {
    data: HashMap<String, WikiLatest>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// OSRS Wiki prices client.
pub struct WikiPriceClient {
    http: Client,
    base_url: String,
}

impl WikiPriceClient {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for OSRS Wiki prices")?;

        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another host (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(url = %url, "Fetching wiki prices");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("OSRS Wiki request failed: {endpoint}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TrackerError::PriceFeed {
                feed: FEED_NAME.to_string(),
                message: format!("HTTP {status} on {endpoint}: {body}"),
            }
            .into());
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse OSRS Wiki {endpoint} response"))
    }

    /// Merge mapping rows and latest prices into a price table.
    ///
    /// Items missing from `/latest` keep a market price of 0.
    fn build_table(mapping: Vec<WikiMapping>, latest: WikiLatestResponse) -> PriceTable {
        let mut skipped_keys = 0usize;
        let mut market: HashMap<i32, i64> = HashMap::with_capacity(latest.data.len());
        for (key, prices) in latest.data {
            let Ok(id) = key.parse::<i32>() else {
                skipped_keys += 1;
                continue;
            };
            if let Some(price) = Self::midpoint(&prices) {
                market.insert(id, price);
            }
        }
        if skipped_keys > 0 {
            warn!(skipped_keys, "Ignored non-numeric item ids in /latest");
        }

        PriceTable::from_entries(mapping.into_iter().map(|row| PriceEntry {
            id: ItemId(row.id),
            market: market.get(&row.id).copied().unwrap_or(0),
            high_alch: row.highalch.unwrap_or(0),
            name: row.name,
        }))
    }

    fn midpoint(prices: &WikiLatest) -> Option<i64> {
        match (prices.high, prices.low) {
            (Some(high), Some(low)) => Some((high + low) / 2),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }
}

#[async_trait]
impl PriceFeed for WikiPriceClient {
    async fn fetch_table(&self) -> Result<PriceTable> {
        info!("Fetching OSRS Wiki item mapping and latest prices...");

        let (mapping, latest) = tokio::join!(
            self.get_json::<Vec<WikiMapping>>("mapping"),
            self.get_json::<WikiLatestResponse>("latest"),
        );
        let table = Self::build_table(mapping?, latest?);

        info!(items = table.len(), "OSRS Wiki price table ready");
        Ok(table)
    }

    fn name(&self) -> &str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
