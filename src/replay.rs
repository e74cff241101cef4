//! Event log replay.
//!
//! Stands in for the game client's event bus: reads a JSON-lines log of
//! recorded host events, keeps an in-memory `GameSnapshot` and the live
//! tracker settings up to date, and feeds each event to a tracking session.
//! Blank lines and `#` comments are ignored.
//!
//! Game-state events (`container_changed`, `container_closed`,
//! `rune_pouch`) replace what the host would report; only
//! `container_changed` triggers a reconcile, matching the client, which
//! re-values on container changes alone. `config_changed` edits the live
//! settings; the next event sees them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::containers::notifications::{ParseOutcome, SkipReason};
use crate::engine::session::{Host, MenuAction, TrackingSession};
use crate::game::{GameSnapshot, RunePouchSlot};
use crate::prices::PriceSource;
use crate::types::{InventoryId, Item, TrackerError, ValueUpdate};

/// One recorded host event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    ContainerChanged {
        container: InventoryId,
        #[serde(default)]
        items: Vec<Item>,
    },
    ContainerClosed {
        container: InventoryId,
    },
    ChatMessage {
        message: String,
    },
    MenuAction(MenuAction),
    RunePouch {
        slots: Vec<RunePouchSlot>,
    },
    Reset,
    ConfigChanged {
        #[serde(default)]
        ignore_items: Option<String>,
        #[serde(default)]
        ignore_coins: Option<bool>,
        #[serde(default)]
        use_high_alchemy_value: Option<bool>,
        #[serde(default)]
        display_profit: Option<bool>,
    },
}

/// Parse one log line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<ReplayEvent>, TrackerError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| TrackerError::Replay {
            line: line_no,
            message: e.to_string(),
        })
}

/// Totals from one replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub updates: usize,
    pub skipped_notifications: usize,
    pub last: Option<ValueUpdate>,
}

/// What one event did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Updated(ValueUpdate),
    Skipped(SkipReason),
    NoChange,
}

impl From<Option<ValueUpdate>> for ReplayStep {
    fn from(update: Option<ValueUpdate>) -> Self {
        update.map_or(ReplayStep::NoChange, ReplayStep::Updated)
    }
}

/// Drives a tracking session from recorded events.
pub struct Replayer {
    game: GameSnapshot,
    settings: TrackerConfig,
    session: TrackingSession,
}

impl Replayer {
    pub fn new(settings: TrackerConfig, session: TrackingSession) -> Self {
        Self {
            game: GameSnapshot::new(),
            settings,
            session,
        }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn settings(&self) -> &TrackerConfig {
        &self.settings
    }

    /// Apply one event.
    pub fn apply(&mut self, prices: &dyn PriceSource, event: ReplayEvent) -> ReplayStep {
        match event {
            ReplayEvent::ContainerChanged { container, items } => {
                self.game.set_container(container, items);
                let host = Host::new(prices, &self.game, &self.settings);
                ReplayStep::Updated(self.session.on_container_changed(&host, container))
            }
            ReplayEvent::ContainerClosed { container } => {
                self.game.remove_container(container);
                ReplayStep::NoChange
            }
            ReplayEvent::ChatMessage { message } => {
                let host = Host::new(prices, &self.game, &self.settings);
                match self.session.on_text_notification(&host, &message) {
                    ParseOutcome::Applied(_) => ReplayStep::Updated(self.session.state().snapshot()),
                    ParseOutcome::Skipped(reason) => {
                        warn!(%reason, message = %message, "Notification skipped");
                        ReplayStep::Skipped(reason)
                    }
                    ParseOutcome::Unrelated => ReplayStep::NoChange,
                }
            }
            ReplayEvent::MenuAction(action) => {
                let host = Host::new(prices, &self.game, &self.settings);
                self.session.on_menu_action(&host, &action).into()
            }
            ReplayEvent::RunePouch { slots } => {
                self.game.set_rune_pouch(&slots);
                ReplayStep::NoChange
            }
            ReplayEvent::Reset => {
                let host = Host::new(prices, &self.game, &self.settings);
                ReplayStep::Updated(self.session.on_reset_command(&host))
            }
            ReplayEvent::ConfigChanged {
                ignore_items,
                ignore_coins,
                use_high_alchemy_value,
                display_profit,
            } => {
                if let Some(value) = ignore_items {
                    self.settings.ignore_items = value;
                }
                if let Some(value) = ignore_coins {
                    self.settings.ignore_coins = value;
                }
                if let Some(value) = use_high_alchemy_value {
                    self.settings.use_high_alchemy_value = value;
                }
                if let Some(value) = display_profit {
                    self.settings.display_profit = value;
                }
                debug!(settings = ?self.settings, "Settings changed");
                ReplayStep::NoChange
            }
        }
    }

    /// Replay a whole log held in memory. Stops at the first bad line.
    pub fn replay_str(&mut self, prices: &dyn PriceSource, log: &str) -> Result<ReplaySummary, TrackerError> {
        let mut summary = ReplaySummary::default();
        for (index, line) in log.lines().enumerate() {
            let Some(event) = parse_line(index + 1, line)? else {
                continue;
            };
            summary.events += 1;

            match self.apply(prices, event) {
                ReplayStep::Updated(update) => {
                    summary.updates += 1;
                    summary.last = Some(update);
                }
                ReplayStep::Skipped(_) => summary.skipped_notifications += 1,
                ReplayStep::NoChange => {}
            }
        }
        info!(
            session_id = %self.session.id(),
            events = summary.events,
            updates = summary.updates,
            skipped = summary.skipped_notifications,
            "Replay finished"
        );
        Ok(summary)
    }

    /// Replay a log file.
    pub async fn replay_file(&mut self, prices: &dyn PriceSource, path: &Path) -> Result<ReplaySummary> {
        let log = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event log {}", path.display()))?;
        let summary = self
            .replay_str(prices, &log)
            .with_context(|| format!("Failed to replay event log {}", path.display()))?;
        Ok(summary)
    }
}
