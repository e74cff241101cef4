//! Inventory Value
//!
//! Entry point. Loads configuration, initialises structured logging,
//! fetches a price table, then replays a recorded event log through a
//! tracking session and reports the resulting totals.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use inventory_value::config;
use inventory_value::display::{format_stack_size, LogSink};
use inventory_value::engine::session::TrackingSession;
use inventory_value::prices::feed_from_config;
use inventory_value::replay::Replayer;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("INVENTORY_VALUE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::AppConfig::load(&config_path)?;

    init_logging();

    info!(
        config = %config_path,
        price_source = %cfg.prices.source,
        mode = %cfg.tracker.valuation_mode(),
        ignore_coins = cfg.tracker.ignore_coins,
        "Inventory Value starting up"
    );

    // -- Prices ----------------------------------------------------------

    let feed = feed_from_config(&cfg.prices)?;
    let prices = feed
        .fetch_table()
        .await
        .with_context(|| format!("Failed to load prices from {}", feed.name()))?;
    if prices.is_empty() {
        warn!(feed = feed.name(), "Price table is empty; every item will value at zero");
    }
    info!(feed = feed.name(), items = prices.len(), "Prices ready");

    // -- Replay ----------------------------------------------------------

    let events_path = std::env::args()
        .nth(1)
        .or_else(|| cfg.replay.events_path.clone())
        .map(PathBuf::from);
    let Some(events_path) = events_path else {
        warn!("No event log given (argument or [replay] events_path); nothing to do");
        return Ok(());
    };

    let session = TrackingSession::new(Box::new(LogSink));
    let mut replayer = Replayer::new(cfg.tracker.clone(), session);
    let summary = replayer.replay_file(&prices, &events_path).await?;

    let totals = replayer.session().state().snapshot();
    info!(
        session_id = %replayer.session().id(),
        started_at = %replayer.session().started_at(),
        events = summary.events,
        updates = summary.updates,
        skipped_notifications = summary.skipped_notifications,
        inventory_value = %format_stack_size(totals.inventory_value),
        profit_on_hand = %format_stack_size(totals.profit_on_hand),
        profit_in_bank = %format_stack_size(totals.profit_in_bank),
        "Session totals"
    );

    Ok(())
}

/// Initialise the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise defaults to `inventory_value=info`.
/// Set `INVENTORY_VALUE_LOG_JSON=1` for structured JSON output.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("inventory_value=info"));

    if std::env::var("INVENTORY_VALUE_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
