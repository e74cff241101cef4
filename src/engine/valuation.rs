//! Valuation engine.
//!
//! Prices a container's item list. Opaque containers are valued by their
//! contents, coins at face value, ignored names at zero, everything else at
//! quantity × price in the current valuation mode. Pure: reads prices,
//! game state, the registry and settings, mutates nothing.

use tracing::trace;

use crate::config::TrackerConfig;
use crate::containers::{OpaqueContainer, SubContainerRegistry};
use crate::game::{GameState, RUNE_POUCH_SLOTS};
use crate::prices::PriceSource;
use crate::types::{InventoryId, Item, ItemId, ValuationMode};

/// Everything a valuation reads, borrowed for one call.
pub struct Valuator<'a> {
    prices: &'a dyn PriceSource,
    game: &'a dyn GameState,
    registry: &'a SubContainerRegistry,
    settings: &'a TrackerConfig,
}

impl<'a> Valuator<'a> {
    pub fn new(
        prices: &'a dyn PriceSource,
        game: &'a dyn GameState,
        registry: &'a SubContainerRegistry,
        settings: &'a TrackerConfig,
    ) -> Self {
        Self {
            prices,
            game,
            registry,
            settings,
        }
    }

    fn mode(&self) -> ValuationMode {
        self.settings.valuation_mode()
    }

    /// Value of a live container, or `None` if the host does not have it.
    pub fn value_of_container(&self, container: InventoryId) -> Option<i64> {
        let items = self.game.items(container)?;
        let value = self.value_of_items(&items);
        trace!(container = %container, items = items.len(), value, "Container valued");
        Some(value)
    }

    /// Total value of an explicit item list.
    pub fn value_of_items(&self, items: &[Item]) -> i64 {
        let ignored = self.settings.ignored_items();
        items
            .iter()
            .map(|item| self.item_value(item, &ignored))
            .sum()
    }

    /// Value of one stack given a prepared ignore list.
    pub fn item_value(&self, item: &Item, ignored: &[String]) -> i64 {
        if item.is_empty() {
            return 0;
        }

        match OpaqueContainer::from_item(item.id) {
            Some(OpaqueContainer::Sack(kind)) => {
                return self.registry.value_of(kind, self.mode(), self.prices);
            }
            Some(OpaqueContainer::RunePouch) => return self.rune_pouch_value(),
            None => {}
        }

        if item.id == ItemId::COINS {
            return if self.settings.ignore_coins { 0 } else { item.quantity };
        }

        let name = self.prices.name(item.id).to_lowercase();
        if ignored.iter().any(|ignored_name| *ignored_name == name) {
            return 0;
        }

        item.quantity * self.prices.price(item.id, self.mode())
    }

    /// Rune pouch contents, read live from the four slots.
    pub fn rune_pouch_value(&self) -> i64 {
        (0..RUNE_POUCH_SLOTS)
            .map(|slot| {
                let amount = self.game.rune_pouch_amount(slot);
                if amount <= 0 {
                    return 0;
                }
                match self.game.rune_item(self.game.rune_pouch_rune(slot)) {
                    Some(rune) => amount * self.prices.price(rune, self.mode()),
                    None => 0,
                }
            })
            .sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
