//! Opaque sub-containers.
//!
//! Herb sacks, seed boxes and gem bags hide their contents from ordinary
//! inventory reads. Their contents are learnt from "check" chat
//! notifications and kept here as last-known quantities; the rune pouch is
//! read live from game state instead and has no registry.

pub mod notifications;

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::prices::PriceSource;
use crate::types::{ItemId, ValuationMode};

// ---------------------------------------------------------------------------
// Container kinds
// ---------------------------------------------------------------------------

/// Sub-containers whose contents are tracked from notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SackKind {
    HerbSack,
    SeedBox,
    GemBag,
}

impl SackKind {
    pub const ALL: &'static [SackKind] = &[SackKind::HerbSack, SackKind::SeedBox, SackKind::GemBag];

    /// Both the closed and the open item variant of this sack.
    pub fn item_ids(&self) -> [ItemId; 2] {
        match self {
            SackKind::HerbSack => [ItemId::HERB_SACK, ItemId::OPEN_HERB_SACK],
            SackKind::SeedBox => [ItemId::SEED_BOX, ItemId::OPEN_SEED_BOX],
            SackKind::GemBag => [ItemId::GEM_BAG, ItemId::OPEN_GEM_BAG],
        }
    }

    /// The chat sentinel the game sends when this sack is checked empty.
    pub fn empty_message(&self) -> &'static str {
        match self {
            SackKind::HerbSack => "The herb sack is empty.",
            SackKind::SeedBox => "The seed box is empty.",
            SackKind::GemBag => "The gem bag is empty.",
        }
    }

    pub fn from_item(id: ItemId) -> Option<Self> {
        SackKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.item_ids().contains(&id))
    }
}

impl fmt::Display for SackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SackKind::HerbSack => write!(f, "herb sack"),
            SackKind::SeedBox => write!(f, "seed box"),
            SackKind::GemBag => write!(f, "gem bag"),
        }
    }
}

/// Any in-inventory item whose contents are valued in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpaqueContainer {
    Sack(SackKind),
    RunePouch,
}

impl OpaqueContainer {
    /// Recognise an opaque container by item id.
    pub fn from_item(id: ItemId) -> Option<Self> {
        if let Some(kind) = SackKind::from_item(id) {
            return Some(OpaqueContainer::Sack(kind));
        }
        match id {
            ItemId::RUNE_POUCH
            | ItemId::RUNE_POUCH_L
            | ItemId::DIVINE_RUNE_POUCH
            | ItemId::DIVINE_RUNE_POUCH_L => Some(OpaqueContainer::RunePouch),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Last-known contents of the herb sack, seed box and gem bag.
#[derive(Debug, Clone, Default)]
pub struct SubContainerRegistry {
    herbs: HashMap<ItemId, i64>,
    seeds: HashMap<ItemId, i64>,
    gems: HashMap<ItemId, i64>,
}

impl SubContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: SackKind) -> &HashMap<ItemId, i64> {
        match kind {
            SackKind::HerbSack => &self.herbs,
            SackKind::SeedBox => &self.seeds,
            SackKind::GemBag => &self.gems,
        }
    }

    fn map_mut(&mut self, kind: SackKind) -> &mut HashMap<ItemId, i64> {
        match kind {
            SackKind::HerbSack => &mut self.herbs,
            SackKind::SeedBox => &mut self.seeds,
            SackKind::GemBag => &mut self.gems,
        }
    }

    /// Record that `kind` now holds `quantity` of `item`. Overwrites.
    pub fn observe(&mut self, kind: SackKind, item: ItemId, quantity: i64) {
        debug!(container = %kind, item = %item, quantity, "Sub-container observed");
        self.map_mut(kind).insert(item, quantity);
    }

    /// Forget everything known about `kind`.
    pub fn clear(&mut self, kind: SackKind) {
        let map = self.map_mut(kind);
        if !map.is_empty() {
            debug!(container = %kind, entries = map.len(), "Sub-container cleared");
        }
        map.clear();
    }

    /// Last-known quantity of `item` in `kind`.
    pub fn quantity(&self, kind: SackKind, item: ItemId) -> Option<i64> {
        self.map(kind).get(&item).copied()
    }

    pub fn is_empty(&self, kind: SackKind) -> bool {
        self.map(kind).is_empty()
    }

    /// Sum of quantity × price over the sack's entries.
    pub fn value_of(&self, kind: SackKind, mode: ValuationMode, prices: &dyn PriceSource) -> i64 {
        self.map(kind)
            .iter()
            .map(|(id, quantity)| quantity * prices.price(*id, mode))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
