//! Mock host for integration testing.
//!
//! Stands in for the game client: owns a deterministic price table, the
//! live game state and the user's settings, and forwards events to a
//! tracking session. Every emitted panel snapshot is recorded.

use std::sync::{Arc, Mutex};

use inventory_value::config::TrackerConfig;
use inventory_value::containers::notifications::ParseOutcome;
use inventory_value::display::{PanelSnapshot, ValueSink};
use inventory_value::engine::session::{Host, MenuAction, TrackingSession};
use inventory_value::game::GameSnapshot;
use inventory_value::prices::{PriceEntry, PriceTable};
use inventory_value::types::{InventoryId, Item, ItemId, ValueUpdate};

pub const RUNE_PLATEBODY: i32 = 1127;
pub const LEATHER_CHAPS: i32 = 1095;
pub const GOLD_BAR: i32 = 2357;
pub const GRIMY_RANARR: i32 = 207;
pub const GRIMY_GUAM: i32 = 199;
pub const RANARR_SEED: i32 = 5295;
pub const NATURE_RUNE: i32 = 561;

/// Records every snapshot handed to the display.
#[derive(Clone, Default)]
pub struct RecordingSink {
    snapshots: Arc<Mutex<Vec<PanelSnapshot>>>,
}

impl RecordingSink {
    pub fn snapshots(&self) -> Vec<PanelSnapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<ValueUpdate> {
        self.snapshots().iter().map(|s| s.update).collect()
    }
}

impl ValueSink for RecordingSink {
    fn on_value_updated(&mut self, snapshot: PanelSnapshot) {
        self.snapshots.lock().unwrap().push(snapshot);
    }
}

/// A deterministic game client.
pub struct MockHost {
    pub prices: PriceTable,
    pub game: GameSnapshot,
    pub settings: TrackerConfig,
    pub session: TrackingSession,
    pub sink: RecordingSink,
}

impl MockHost {
    pub fn new() -> Self {
        Self::with_prices(Self::default_prices())
    }

    pub fn with_prices(prices: PriceTable) -> Self {
        let sink = RecordingSink::default();
        Self {
            prices,
            game: GameSnapshot::new(),
            settings: TrackerConfig::default(),
            session: TrackingSession::new(Box::new(sink.clone())),
            sink,
        }
    }

    /// Prices with round numbers. Gold bars are 100 gp each, which makes
    /// `gold(value)` stacks easy to reason about.
    fn default_prices() -> PriceTable {
        let entry = |id: i32, name: &str, market: i64, high_alch: i64| PriceEntry {
            id: ItemId(id),
            name: name.to_string(),
            market,
            high_alch,
        };
        PriceTable::from_entries(vec![
            entry(995, "Coins", 1, 0),
            entry(RUNE_PLATEBODY, "Rune platebody", 100, 39_000),
            entry(LEATHER_CHAPS, "Leather chaps", 20, 12),
            entry(GOLD_BAR, "Gold bar", 100, 60),
            entry(GRIMY_RANARR, "Grimy ranarr weed", 50, 30),
            entry(GRIMY_GUAM, "Grimy guam leaf", 20, 3),
            entry(RANARR_SEED, "Ranarr seed", 30_000, 30),
            entry(NATURE_RUNE, "Nature rune", 150, 108),
            entry(ItemId::UNCUT_SAPPHIRE.0, "Uncut sapphire", 400, 30),
            entry(ItemId::UNCUT_RUBY.0, "Uncut ruby", 1_000, 120),
        ])
    }

    /// A stack of gold bars worth `value`.
    pub fn gold(value: i64) -> Vec<Item> {
        vec![Item::new(GOLD_BAR, value / 100)]
    }

    pub fn set_inventory(&mut self, items: Vec<Item>) -> ValueUpdate {
        self.game.set_container(InventoryId::Inventory, items);
        let host = Host::new(&self.prices, &self.game, &self.settings);
        self.session.on_container_changed(&host, InventoryId::Inventory)
    }

    pub fn set_bank(&mut self, items: Vec<Item>) -> ValueUpdate {
        self.game.set_container(InventoryId::Bank, items);
        let host = Host::new(&self.prices, &self.game, &self.settings);
        self.session.on_container_changed(&host, InventoryId::Bank)
    }

    /// The bank interface closed; the container reads as unavailable.
    pub fn close_bank(&mut self) {
        self.game.remove_container(InventoryId::Bank);
    }

    pub fn chat(&mut self, text: &str) -> ParseOutcome {
        let host = Host::new(&self.prices, &self.game, &self.settings);
        self.session.on_text_notification(&host, text)
    }

    pub fn menu(&mut self, action_id: i32, item: i32, option: &str) -> Option<ValueUpdate> {
        let host = Host::new(&self.prices, &self.game, &self.settings);
        self.session
            .on_menu_action(&host, &MenuAction::new(action_id, ItemId(item), option))
    }

    pub fn deposit(&mut self) -> Option<ValueUpdate> {
        self.menu(57, GOLD_BAR, "Deposit-All")
    }

    pub fn walk(&mut self) -> Option<ValueUpdate> {
        self.menu(23, ItemId::EMPTY.0, "Walk here")
    }

    pub fn reset(&mut self) -> ValueUpdate {
        let host = Host::new(&self.prices, &self.game, &self.settings);
        self.session.on_reset_command(&host)
    }

    /// Current totals without triggering a reconcile.
    pub fn totals(&self) -> ValueUpdate {
        self.session.state().snapshot()
    }
}
