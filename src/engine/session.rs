//! Tracking session: event intake for the valuation and profit core.
//!
//! A `TrackingSession` owns all mutable session state (profit totals and
//! the sub-container registry) and turns host events into registry
//! updates, reconciles and display emissions. Collaborators are passed in
//! per event through `Host`, so settings changed between events apply to
//! the next one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

use super::tracker::{ProfitState, ProfitTracker, ReconcileKind};
use super::valuation::Valuator;
use crate::config::TrackerConfig;
use crate::containers::notifications::{parse_notification, Notification, ParseOutcome};
use crate::containers::{SackKind, SubContainerRegistry};
use crate::display::{PanelSnapshot, ValueSink};
use crate::game::GameState;
use crate::prices::PriceSource;
use crate::types::{InventoryId, ItemId, ValueUpdate};

/// Menu options on a sack that invalidate what we know of its contents.
const SACK_INTERACTIONS: [&str; 3] = ["open", "check", "empty"];
const DEPOSIT_PREFIX: &str = "deposit";

// ---------------------------------------------------------------------------
// Host collaborators
// ---------------------------------------------------------------------------

/// The host's collaborators for one event.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub prices: &'a dyn PriceSource,
    pub game: &'a dyn GameState,
    pub settings: &'a TrackerConfig,
}

impl<'a> Host<'a> {
    pub fn new(
        prices: &'a dyn PriceSource,
        game: &'a dyn GameState,
        settings: &'a TrackerConfig,
    ) -> Self {
        Self {
            prices,
            game,
            settings,
        }
    }

    fn valuator<'r>(&self, registry: &'r SubContainerRegistry) -> Valuator<'r>
    where
        'a: 'r,
    {
        Valuator::new(self.prices, self.game, registry, self.settings)
    }
}

/// A clicked menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuAction {
    pub action_id: i32,
    pub item_id: ItemId,
    pub option: String,
}

impl MenuAction {
    pub fn new(action_id: i32, item_id: ItemId, option: &str) -> Self {
        Self {
            action_id,
            item_id,
            option: option.to_string(),
        }
    }

    fn is_deposit(&self) -> bool {
        self.option.trim().to_lowercase().starts_with(DEPOSIT_PREFIX)
    }

    /// The sack this action empties or opens, if any.
    fn invalidated_sack(&self) -> Option<SackKind> {
        let option = self.option.trim().to_lowercase();
        if !SACK_INTERACTIONS.contains(&option.as_str()) {
            return None;
        }
        SackKind::from_item(self.item_id)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct TrackingSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    state: ProfitState,
    registry: SubContainerRegistry,
    sink: Box<dyn ValueSink + Send>,
}

impl TrackingSession {
    pub fn new(sink: Box<dyn ValueSink + Send>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: ProfitState::new(),
            registry: SubContainerRegistry::new(),
            sink,
        };
        info!(session_id = %session.id, "Tracking session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn state(&self) -> &ProfitState {
        &self.state
    }

    pub fn registry(&self) -> &SubContainerRegistry {
        &self.registry
    }

    /// A container's contents changed.
    pub fn on_container_changed(&mut self, host: &Host<'_>, container: InventoryId) -> ValueUpdate {
        let kind = ReconcileKind {
            bank_snapshot: container.is_bank(),
            deposit_step: self.state.is_depositing(),
        };
        let update = ProfitTracker::reconcile(&mut self.state, &host.valuator(&self.registry), kind);
        self.emit(host, update);
        update
    }

    /// A chat message arrived. Returns how it was interpreted.
    pub fn on_text_notification(&mut self, host: &Host<'_>, text: &str) -> ParseOutcome {
        let outcome = parse_notification(text, host.prices);
        match &outcome {
            ParseOutcome::Applied(Notification::Observed { container, entries }) => {
                for (item, quantity) in entries {
                    self.registry.observe(*container, *item, *quantity);
                }
                self.refresh(host);
            }
            ParseOutcome::Applied(Notification::Emptied(kind)) => {
                self.registry.clear(*kind);
                self.refresh(host);
            }
            ParseOutcome::Applied(Notification::Reset) => {
                self.on_reset_command(host);
            }
            ParseOutcome::Skipped(_) | ParseOutcome::Unrelated => {}
        }
        outcome
    }

    /// A menu entry was clicked.
    ///
    /// Returns the update emitted when the click ended a deposit.
    pub fn on_menu_action(&mut self, host: &Host<'_>, action: &MenuAction) -> Option<ValueUpdate> {
        if let Some(kind) = action.invalidated_sack() {
            debug!(
                container = %kind,
                option = %action.option,
                action_id = action.action_id,
                "Sub-container interaction"
            );
            self.registry.clear(kind);
        }

        if action.is_deposit() {
            ProfitTracker::begin_deposit(&mut self.state);
            return None;
        }

        if !self.state.is_depositing() {
            return None;
        }
        let update = ProfitTracker::finish_deposit(&mut self.state, &host.valuator(&self.registry))?;
        self.emit(host, update);
        Some(update)
    }

    /// The user asked for a profit reset.
    pub fn on_reset_command(&mut self, host: &Host<'_>) -> ValueUpdate {
        let update = ProfitTracker::reset(&mut self.state, &host.valuator(&self.registry));
        self.emit(host, update);
        update
    }

    /// Re-value after a registry change.
    ///
    /// This is an ordinary inventory reconcile. Sack contents learnt from a
    /// check message count toward profit on hand the same way picked-up
    /// items do, so checking a sack filled before the session started
    /// reports its contents as profit. Use the reset command to re-anchor.
    fn refresh(&mut self, host: &Host<'_>) -> ValueUpdate {
        let kind = ReconcileKind {
            bank_snapshot: false,
            deposit_step: self.state.is_depositing(),
        };
        let update = ProfitTracker::reconcile(&mut self.state, &host.valuator(&self.registry), kind);
        self.emit(host, update);
        update
    }

    fn emit(&mut self, host: &Host<'_>, update: ValueUpdate) {
        let snapshot = PanelSnapshot::new(
            update,
            host.settings.valuation_mode(),
            host.settings.display_profit,
        );
        self.sink.on_value_updated(snapshot);
    }
}

// ---------------------------------------------------------------------------
// Shared session
// ---------------------------------------------------------------------------

/// A session shared between callers. Every event holds the lock for its
/// whole reconcile, so events are applied strictly one at a time.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<TrackingSession>>,
}

impl SharedSession {
    pub fn new(session: TrackingSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut TrackingSession) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
