//! End-to-end session flows through the mock host.
//!
//! Each test drives a tracking session the way the game client would and
//! checks the emitted totals.

use inventory_value::containers::notifications::{Notification, ParseOutcome, SkipReason};
use inventory_value::containers::SackKind;
use inventory_value::game::RunePouchSlot;
use inventory_value::types::{InventoryId, Item, ItemId};

use crate::mock_host::*;

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[test]
fn test_coins_scenario_follows_live_setting() {
    let mut host = MockHost::new();
    let items = vec![Item::new(RUNE_PLATEBODY, 5), Item::new(995, 200)];
    assert_eq!(host.set_inventory(items.clone()).inventory_value, 700);

    host.settings.ignore_coins = true;
    assert_eq!(host.set_inventory(items).inventory_value, 500);
}

#[test]
fn test_ignore_list_applies_to_named_items() {
    let mut host = MockHost::new();
    host.settings.ignore_items = " leather CHAPS ;Bottomless compost bucket".to_string();

    let update = host.set_inventory(vec![Item::new(LEATHER_CHAPS, 3), Item::new(NATURE_RUNE, 2)]);
    assert_eq!(update.inventory_value, 300);
}

#[test]
fn test_rune_pouch_valued_from_live_slots() {
    let mut host = MockHost::new();
    host.game.set_rune_pouch(&[RunePouchSlot { rune: 10, amount: 20 }]);

    let update = host.set_inventory(vec![Item { id: ItemId::RUNE_POUCH, quantity: 1 }]);
    assert_eq!(update.inventory_value, 20 * 150);
}

#[test]
fn test_high_alchemy_toggle_applies_to_next_event() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item::new(RUNE_PLATEBODY, 1)]);
    host.settings.use_high_alchemy_value = true;

    let update = host.set_inventory(vec![Item::new(RUNE_PLATEBODY, 1)]);
    assert_eq!(update.inventory_value, 39_000);
    assert_eq!(host.sink.snapshots().last().unwrap().lines()[0].label, "HA Price:");
}

// ---------------------------------------------------------------------------
// Sub-containers
// ---------------------------------------------------------------------------

#[test]
fn test_herb_sack_check_then_empty() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::HERB_SACK, quantity: 1 }]);

    let outcome = host.chat("3 x Grimy ranarr weed");
    assert!(matches!(outcome, ParseOutcome::Applied(Notification::Observed { .. })));
    assert_eq!(host.totals().inventory_value, 150);

    host.chat("The herb sack is empty.");
    assert_eq!(host.totals().inventory_value, 0);
}

#[test]
fn test_sack_check_counts_as_profit_until_reset() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::HERB_SACK, quantity: 1 }]);
    assert_eq!(host.totals().profit_on_hand, 0);

    host.chat("3 x Grimy ranarr weed");
    assert_eq!(host.totals().profit_on_hand, 150);

    let update = host.reset();
    assert_eq!(update.inventory_value, 150);
    assert_eq!(update.profit_on_hand, 0);
}

#[test]
fn test_herb_sack_overwrites_not_adds() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::OPEN_HERB_SACK, quantity: 1 }]);

    host.chat("3 x Grimy ranarr weed");
    host.chat("10 x Grimy guam leaf");
    host.chat("4 x Grimy ranarr weed");
    assert_eq!(host.totals().inventory_value, 4 * 50 + 10 * 20);
}

#[test]
fn test_seed_box_check() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::SEED_BOX, quantity: 1 }]);

    host.chat("2 x Ranarr seed.");
    assert_eq!(host.totals().inventory_value, 60_000);
}

#[test]
fn test_gem_bag_tally() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::GEM_BAG, quantity: 1 }]);

    host.chat("Sapphires: 2 / Emeralds: 0 / Rubies: 1<br>Diamonds: 0 / Dragonstones: 0");
    assert_eq!(host.totals().inventory_value, 2 * 400 + 1_000);
    assert_eq!(
        host.session.registry().quantity(SackKind::GemBag, ItemId::UNCUT_RUBY),
        Some(1)
    );
}

#[test]
fn test_gem_bag_mismatch_leaves_registry_untouched() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::GEM_BAG, quantity: 1 }]);
    host.chat("Sapphires: 2 / Emeralds: 0 / Rubies: 1<br>Diamonds: 0 / Dragonstones: 0");
    let before = host.totals();

    let outcome = host.chat("Sapphires: 5 / Emeralds: / Rubies: 3<br>Diamonds: 1 / Dragonstones: 0");
    assert!(matches!(outcome, ParseOutcome::Skipped(SkipReason::GemTallyMismatch { .. })));
    assert_eq!(host.totals(), before);
    assert_eq!(
        host.session.registry().quantity(SackKind::GemBag, ItemId::UNCUT_SAPPHIRE),
        Some(2)
    );
}

#[test]
fn test_ambiguous_herb_name_is_discarded() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::HERB_SACK, quantity: 1 }]);
    let emitted = host.sink.snapshots().len();

    // "Grimy" alone matches both grimy herbs.
    let outcome = host.chat("3 x Grimy ");
    assert!(matches!(outcome, ParseOutcome::Skipped(_)));
    assert!(host.session.registry().is_empty(SackKind::HerbSack));
    assert_eq!(host.sink.snapshots().len(), emitted);
}

#[test]
fn test_sack_open_clears_contents() {
    let mut host = MockHost::new();
    host.set_inventory(vec![Item { id: ItemId::HERB_SACK, quantity: 1 }]);
    host.chat("3 x Grimy ranarr weed");

    host.menu(33, ItemId::HERB_SACK.0, "Open");
    assert!(host.session.registry().is_empty(SackKind::HerbSack));
}

// ---------------------------------------------------------------------------
// Profit on hand
// ---------------------------------------------------------------------------

#[test]
fn test_profit_telescopes_over_inventory_updates() {
    let mut host = MockHost::new();
    let values = [2_000, 2_600, 1_100, 9_900, 9_900, 0];
    host.set_inventory(MockHost::gold(values[0]));

    for value in &values[1..] {
        let update = host.set_inventory(MockHost::gold(*value));
        assert_eq!(update.profit_on_hand, value - values[0]);
    }
}

#[test]
fn test_menu_clicks_outside_deposit_do_not_emit() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(500));
    let emitted = host.sink.snapshots().len();

    assert!(host.walk().is_none());
    assert!(host.menu(2, GOLD_BAR, "Use").is_none());
    assert_eq!(host.sink.snapshots().len(), emitted);
}

#[test]
fn test_every_reconcile_emits_a_snapshot() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(500));
    host.set_bank(MockHost::gold(10_000));
    host.reset();

    let updates = host.sink.updates();
    assert_eq!(updates.len(), 3);
    assert_eq!(*updates.last().unwrap(), host.totals());
}

#[test]
fn test_profit_lines_hidden_when_disabled() {
    let mut host = MockHost::new();
    host.settings.display_profit = false;
    host.set_inventory(MockHost::gold(500));

    let snapshot = host.sink.snapshots().pop().unwrap();
    assert_eq!(snapshot.lines().len(), 1);
    assert_eq!(snapshot.lines()[0].value, "500");
}

// ---------------------------------------------------------------------------
// Bank
// ---------------------------------------------------------------------------

#[test]
fn test_bank_baseline_scenario() {
    let mut host = MockHost::new();
    let first = host.set_bank(MockHost::gold(10_000));
    assert_eq!(first.profit_in_bank, 0);

    host.close_bank();
    let later = host.set_bank(MockHost::gold(12_500));
    assert_eq!(later.profit_in_bank, 2_500);
}

#[test]
fn test_withdrawal_at_bank_is_not_profit() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(0));
    host.set_bank(MockHost::gold(10_000));

    // Withdraw 3,000: the bank event lands first, then the inventory.
    host.game.set_container(InventoryId::Inventory, MockHost::gold(3_000));
    let at_bank = host.set_bank(MockHost::gold(7_000));
    assert_eq!(at_bank.profit_on_hand, 0);
    assert_eq!(at_bank.profit_in_bank, -3_000);
    assert_eq!(at_bank.inventory_value, 3_000);
}

#[test]
fn test_bank_profit_held_after_leaving() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(1_000));
    host.set_bank(MockHost::gold(10_000));
    host.set_bank(MockHost::gold(11_000));
    host.close_bank();

    let update = host.set_inventory(MockHost::gold(1_500));
    assert_eq!(update.profit_in_bank, 1_000);
    assert_eq!(update.profit_on_hand, 500);
}

// ---------------------------------------------------------------------------
// Deposit bridging, every transition order
// ---------------------------------------------------------------------------

/// Events that can happen while a deposit of 4,000 is in progress.
#[derive(Debug, Clone, Copy)]
enum Step {
    /// The inventory container reports the smaller inventory.
    Inventory,
    /// The bank container reports the larger bank.
    Bank,
    /// A second "Deposit" click.
    DepositAgain,
}

const START_INVENTORY: i64 = 5_000;
const DEPOSITED: i64 = 4_000;
const START_BANK: i64 = 10_000;

/// Run one deposit with `steps` in order, then leave with a walk click.
fn run_deposit(bank_seen_before: bool, steps: &[Step]) -> MockHost {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(START_INVENTORY));
    if bank_seen_before {
        host.set_bank(MockHost::gold(START_BANK));
        host.close_bank();
    }

    assert!(host.deposit().is_none());
    // The game state moves on regardless of which events arrive.
    let after_inventory = MockHost::gold(START_INVENTORY - DEPOSITED);
    host.game
        .set_container(InventoryId::Inventory, after_inventory.clone());
    for step in steps {
        match step {
            Step::Inventory => {
                host.set_inventory(after_inventory.clone());
            }
            Step::Bank => {
                host.set_bank(MockHost::gold(START_BANK + DEPOSITED));
            }
            Step::DepositAgain => {
                assert!(host.deposit().is_none());
            }
        }
    }

    let finished = host.walk().expect("leaving a deposit emits");
    assert_eq!(finished, host.totals());
    assert!(!host.session.state().is_depositing());
    host
}

#[test]
fn test_deposit_orders_never_touch_profit_on_hand() {
    let orders: &[&[Step]] = &[
        &[],
        &[Step::Inventory],
        &[Step::Bank],
        &[Step::Inventory, Step::Bank],
        &[Step::Bank, Step::Inventory],
        &[Step::Inventory, Step::DepositAgain],
        &[Step::DepositAgain, Step::Bank, Step::Inventory],
        &[Step::Inventory, Step::Bank, Step::DepositAgain, Step::Inventory],
    ];
    for bank_seen_before in [false, true] {
        for order in orders {
            let host = run_deposit(bank_seen_before, order);
            let totals = host.totals();
            assert_eq!(totals.profit_on_hand, 0, "order {order:?}, bank seen {bank_seen_before}");
            assert_eq!(totals.inventory_value, START_INVENTORY - DEPOSITED);
        }
    }
}

#[test]
fn test_deposit_credits_bank_once_after_prior_visit() {
    let orders: &[&[Step]] = &[
        &[],
        &[Step::Inventory],
        &[Step::Bank],
        &[Step::Inventory, Step::Bank],
        &[Step::Bank, Step::Inventory],
        &[Step::DepositAgain, Step::Bank, Step::Inventory],
    ];
    for order in orders {
        let host = run_deposit(true, order);
        let state = host.session.state();
        assert_eq!(state.baseline_bank_value, Some(START_BANK), "order {order:?}");
        assert_eq!(state.last_observed_bank_value, Some(START_BANK + DEPOSITED), "order {order:?}");
        assert_eq!(host.totals().profit_in_bank, DEPOSITED, "order {order:?}");
    }
}

#[test]
fn test_deposit_without_any_bank_visit_is_estimated() {
    for order in [&[][..], &[Step::Inventory][..], &[Step::Inventory, Step::DepositAgain][..]] {
        let host = run_deposit(false, order);
        let state = host.session.state();
        assert_eq!(state.baseline_bank_value, None);
        assert_eq!(state.last_observed_bank_value, Some(DEPOSITED), "order {order:?}");
        assert_eq!(host.totals().profit_in_bank, DEPOSITED, "order {order:?}");
    }
}

#[test]
fn test_first_bank_view_during_deposit_becomes_baseline() {
    for order in [&[Step::Bank][..], &[Step::Inventory, Step::Bank][..]] {
        let host = run_deposit(false, order);
        let state = host.session.state();
        assert_eq!(state.baseline_bank_value, Some(START_BANK + DEPOSITED));
        assert_eq!(host.totals().profit_in_bank, 0, "order {order:?}");
    }
}

#[test]
fn test_two_deposits_accumulate() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(5_000));

    host.deposit();
    host.set_inventory(MockHost::gold(3_000));
    host.walk();

    host.set_inventory(MockHost::gold(4_000));
    host.deposit();
    host.set_inventory(MockHost::gold(0));
    let update = host.walk().unwrap();

    assert_eq!(update.profit_in_bank, 2_000 + 4_000);
    assert_eq!(update.profit_on_hand, 1_000);
}

#[test]
fn test_leave_twice_is_noop() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(5_000));
    host.deposit();
    host.set_inventory(MockHost::gold(0));

    assert!(host.walk().is_some());
    let after = host.totals();
    assert!(host.walk().is_none());
    assert_eq!(host.totals(), after);
}

// ---------------------------------------------------------------------------
// Reset
// ---------------------------------------------------------------------------

#[test]
fn test_reset_zeroes_profits_and_keeps_value() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(1_000));
    host.set_bank(MockHost::gold(10_000));
    host.set_inventory(MockHost::gold(2_500));
    host.set_bank(MockHost::gold(12_000));
    host.close_bank();

    let update = host.reset();
    assert_eq!(update.inventory_value, 2_500);
    assert_eq!(update.profit_on_hand, 0);
    assert_eq!(update.profit_in_bank, 0);

    let next = host.set_inventory(MockHost::gold(3_000));
    assert_eq!(next.profit_on_hand, 500);
}

#[test]
fn test_deposit_after_reset_counts_from_zero() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(6_000));
    host.set_bank(MockHost::gold(10_000));
    host.close_bank();
    host.reset();

    host.deposit();
    host.set_inventory(MockHost::gold(1_000));
    let update = host.walk().unwrap();
    assert_eq!(update.profit_in_bank, 5_000);
}

#[test]
fn test_reset_command_typed_in_chat() {
    let mut host = MockHost::new();
    host.set_inventory(MockHost::gold(1_000));
    host.set_inventory(MockHost::gold(4_000));

    assert_eq!(host.chat("::resetvalue"), ParseOutcome::Applied(Notification::Reset));
    assert_eq!(host.totals().profit_on_hand, 0);
}

#[test]
fn test_reset_as_first_event_counts_nothing_as_profit() {
    let mut host = MockHost::new();
    host.game.set_container(InventoryId::Inventory, MockHost::gold(5_000));

    host.chat("::resetvalue");
    let totals = host.totals();
    assert_eq!(totals.inventory_value, 5_000);
    assert_eq!(totals.profit_on_hand, 0);
    assert_eq!(totals.profit_in_bank, 0);

    assert_eq!(host.set_inventory(MockHost::gold(5_300)).profit_on_hand, 300);
}
