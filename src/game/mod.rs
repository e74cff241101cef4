//! Live game state reads.
//!
//! The host client owns the real containers and varbits; the engine only
//! sees them through `GameState`. `GameSnapshot` is the in-memory
//! implementation used by the replay host and by tests.

use std::collections::HashMap;

use crate::types::{InventoryId, Item, ItemId};

/// Number of rune pouch slots (the divine pouch has four, the plain pouch
/// leaves the fourth empty).
pub const RUNE_POUCH_SLOTS: usize = 4;

/// Rune pouch rune-type codes mapped to rune item ids.
///
/// Mirrors the game's rune pouch enum; code 0 is an empty slot.
pub const RUNE_POUCH_RUNES: &[(i32, ItemId)] = &[
    (1, ItemId(556)),    // Air
    (2, ItemId(555)),    // Water
    (3, ItemId(557)),    // Earth
    (4, ItemId(554)),    // Fire
    (5, ItemId(558)),    // Mind
    (6, ItemId(562)),    // Chaos
    (7, ItemId(560)),    // Death
    (8, ItemId(565)),    // Blood
    (9, ItemId(564)),    // Cosmic
    (10, ItemId(561)),   // Nature
    (11, ItemId(563)),   // Law
    (12, ItemId(559)),   // Body
    (13, ItemId(566)),   // Soul
    (14, ItemId(9075)),  // Astral
    (15, ItemId(4695)),  // Mist
    (16, ItemId(4698)),  // Mud
    (17, ItemId(4696)),  // Dust
    (18, ItemId(4699)),  // Lava
    (19, ItemId(4694)),  // Steam
    (20, ItemId(4697)),  // Smoke
    (21, ItemId(21880)), // Wrath
];

/// Look up a rune pouch code in the default rune table.
pub fn default_rune_item(code: i32) -> Option<ItemId> {
    RUNE_POUCH_RUNES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, id)| *id)
}

/// Synchronous view of the host's live game state.
#[cfg_attr(test, mockall::automock)]
pub trait GameState {
    /// Current items of a container, or `None` when it is not loaded
    /// (e.g. the bank has not been opened).
    fn items(&self, container: InventoryId) -> Option<Vec<Item>>;

    /// Amount held in a rune pouch slot.
    fn rune_pouch_amount(&self, slot: usize) -> i64;

    /// Rune-type code in a rune pouch slot.
    fn rune_pouch_rune(&self, slot: usize) -> i32;

    /// Resolve a rune-type code through the rune enum table.
    fn rune_item(&self, code: i32) -> Option<ItemId>;
}

/// One rune pouch slot as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RunePouchSlot {
    pub rune: i32,
    pub amount: i64,
}

/// In-memory game state.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    containers: HashMap<InventoryId, Vec<Item>>,
    rune_pouch: [RunePouchSlot; RUNE_POUCH_SLOTS],
}

impl GameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a container's contents.
    pub fn set_container(&mut self, container: InventoryId, items: Vec<Item>) {
        self.containers.insert(container, items);
    }

    /// Forget a container (it reads as unavailable afterwards).
    pub fn remove_container(&mut self, container: InventoryId) {
        self.containers.remove(&container);
    }

    /// Replace the rune pouch slots. Missing trailing slots become empty.
    pub fn set_rune_pouch(&mut self, slots: &[RunePouchSlot]) {
        self.rune_pouch = [RunePouchSlot::default(); RUNE_POUCH_SLOTS];
        for (target, slot) in self.rune_pouch.iter_mut().zip(slots) {
            *target = *slot;
        }
    }
}

impl GameState for GameSnapshot {
    fn items(&self, container: InventoryId) -> Option<Vec<Item>> {
        self.containers.get(&container).cloned()
    }

    fn rune_pouch_amount(&self, slot: usize) -> i64 {
        self.rune_pouch.get(slot).map_or(0, |s| s.amount)
    }

    fn rune_pouch_rune(&self, slot: usize) -> i32 {
        self.rune_pouch.get(slot).map_or(0, |s| s.rune)
    }

    fn rune_item(&self, code: i32) -> Option<ItemId> {
        default_rune_item(code)
    }
}
