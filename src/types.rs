//! Shared types for the inventory value tracker.
//!
//! These types form the data model used across all modules.
//! They are kept free of behaviour beyond formatting and small helpers
//! so that prices, game state, containers and the engine can depend on
//! them without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Stable identifier of a tradeable item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i32);

impl ItemId {
    /// Id the game reports for an empty container slot.
    pub const EMPTY: ItemId = ItemId(-1);

    pub const COINS: ItemId = ItemId(995);

    pub const HERB_SACK: ItemId = ItemId(13226);
    pub const OPEN_HERB_SACK: ItemId = ItemId(24478);
    pub const SEED_BOX: ItemId = ItemId(13639);
    pub const OPEN_SEED_BOX: ItemId = ItemId(24482);
    pub const GEM_BAG: ItemId = ItemId(12020);
    pub const OPEN_GEM_BAG: ItemId = ItemId(24481);

    pub const RUNE_POUCH: ItemId = ItemId(12791);
    pub const RUNE_POUCH_L: ItemId = ItemId(24416);
    pub const DIVINE_RUNE_POUCH: ItemId = ItemId(27281);
    pub const DIVINE_RUNE_POUCH_L: ItemId = ItemId(27509);

    pub const UNCUT_SAPPHIRE: ItemId = ItemId(1623);
    pub const UNCUT_EMERALD: ItemId = ItemId(1621);
    pub const UNCUT_RUBY: ItemId = ItemId(1619);
    pub const UNCUT_DIAMOND: ItemId = ItemId(1617);
    pub const UNCUT_DRAGONSTONE: ItemId = ItemId(1631);

    pub fn is_empty_slot(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One stack in a container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub quantity: i64,
}

impl Item {
    pub fn new(id: i32, quantity: i64) -> Self {
        Self {
            id: ItemId(id),
            quantity,
        }
    }

    /// Whether this slot holds nothing worth pricing.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty_slot() || self.quantity <= 0
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// Live game containers the host can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryId {
    Inventory,
    Equipment,
    Bank,
    /// Any other container, by raw game id.
    Other(i32),
}

impl InventoryId {
    pub fn is_bank(&self) -> bool {
        matches!(self, InventoryId::Bank)
    }
}

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryId::Inventory => write!(f, "inventory"),
            InventoryId::Equipment => write!(f, "equipment"),
            InventoryId::Bank => write!(f, "bank"),
            InventoryId::Other(id) => write!(f, "container({id})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Valuation mode
// ---------------------------------------------------------------------------

/// Which price an item is valued at. Session-wide, not per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValuationMode {
    /// Grand Exchange market price.
    #[default]
    Market,
    /// High alchemy (creation) value.
    HighAlchemy,
}

impl ValuationMode {
    pub fn from_high_alchemy(use_high_alchemy: bool) -> Self {
        if use_high_alchemy {
            ValuationMode::HighAlchemy
        } else {
            ValuationMode::Market
        }
    }

    /// Panel label for the value line.
    pub fn label(&self) -> &'static str {
        match self {
            ValuationMode::Market => "GE Price:",
            ValuationMode::HighAlchemy => "HA Price:",
        }
    }
}

impl fmt::Display for ValuationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuationMode::Market => write!(f, "market"),
            ValuationMode::HighAlchemy => write!(f, "high-alchemy"),
        }
    }
}

// ---------------------------------------------------------------------------
// Emitted values
// ---------------------------------------------------------------------------

/// The triple emitted after every reconcile. Copied by value to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueUpdate {
    pub inventory_value: i64,
    pub profit_on_hand: i64,
    pub profit_in_bank: i64,
}

impl fmt::Display for ValueUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "value={} profit(inv)={:+} profit(bank)={:+}",
            self.inventory_value, self.profit_on_hand, self.profit_in_bank,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised outside the core (loading, parsing host input).
/// The valuation and profit core itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Price table error ({source_name}): {message}")]
    PriceTable { source_name: String, message: String },

    #[error("Price feed request failed ({feed}): {message}")]
    PriceFeed { feed: String, message: String },

    #[error("Replay error on line {line}: {message}")]
    Replay { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
