//! Profit state tracker.
//!
//! Reconciles each event against the session's running totals: re-values
//! the inventory, accumulates profit on hand from inventory deltas, and
//! tracks banked profit against the first bank value seen this session.
//! Bank visits and deposits move items without creating profit, so the
//! inventory delta they cause is excluded from profit on hand.

use tracing::{debug, info};

use super::valuation::Valuator;
use crate::types::{InventoryId, ValueUpdate};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Progress of a multi-step deposit interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepositPhase {
    #[default]
    Idle,
    Depositing {
        /// Inventory value when the deposit began.
        pre_deposit_value: i64,
        /// A bank snapshot arrived mid-deposit; the bank value already
        /// includes whatever was deposited.
        bank_observed: bool,
    },
}

/// Session-lifetime profit totals. `None` means not yet known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfitState {
    pub current_inventory_value: i64,
    pub profit_on_hand: Option<i64>,
    pub baseline_bank_value: Option<i64>,
    pub last_observed_bank_value: Option<i64>,
    pub deposit: DepositPhase,
}

impl ProfitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_depositing(&self) -> bool {
        matches!(self.deposit, DepositPhase::Depositing { .. })
    }

    /// Banked profit while away from the bank.
    ///
    /// With no bank visit yet, deposits accumulated in the last observed
    /// value stand in for the profit.
    pub fn profit_in_bank(&self) -> i64 {
        match (self.last_observed_bank_value, self.baseline_bank_value) {
            (Some(last), Some(baseline)) => last - baseline,
            (Some(deposited), None) => deposited,
            (None, _) => 0,
        }
    }

    /// The triple as it stands, without re-valuing anything.
    pub fn snapshot(&self) -> ValueUpdate {
        ValueUpdate {
            inventory_value: self.current_inventory_value,
            profit_on_hand: self.profit_on_hand.unwrap_or(0),
            profit_in_bank: self.profit_in_bank(),
        }
    }
}

/// What kind of event a reconcile is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileKind {
    pub bank_snapshot: bool,
    pub deposit_step: bool,
}

impl ReconcileKind {
    pub const INVENTORY: ReconcileKind = ReconcileKind {
        bank_snapshot: false,
        deposit_step: false,
    };
    pub const BANK: ReconcileKind = ReconcileKind {
        bank_snapshot: true,
        deposit_step: false,
    };
    pub const DEPOSIT: ReconcileKind = ReconcileKind {
        bank_snapshot: false,
        deposit_step: true,
    };

    /// Whether the inventory delta of this event counts as profit.
    pub fn is_transfer(&self) -> bool {
        self.bank_snapshot || self.deposit_step
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

pub struct ProfitTracker;

impl ProfitTracker {
    /// Re-value and update totals for one event.
    pub fn reconcile(state: &mut ProfitState, valuator: &Valuator<'_>, kind: ReconcileKind) -> ValueUpdate {
        let inventory_value = valuator
            .value_of_container(InventoryId::Inventory)
            .unwrap_or(0);
        let previous_value = state.current_inventory_value;

        let profit_on_hand = match state.profit_on_hand {
            None => {
                info!(inventory_value, "Profit baseline established");
                0
            }
            Some(profit) if kind.is_transfer() => profit,
            Some(profit) => profit + (inventory_value - previous_value),
        };
        state.profit_on_hand = Some(profit_on_hand);
        state.current_inventory_value = inventory_value;

        let profit_in_bank = if kind.bank_snapshot {
            Self::observe_bank(state, valuator)
        } else {
            state.profit_in_bank()
        };

        let update = ValueUpdate {
            inventory_value,
            profit_on_hand,
            profit_in_bank,
        };
        debug!(
            bank_snapshot = kind.bank_snapshot,
            deposit_step = kind.deposit_step,
            inventory_value,
            profit_on_hand,
            profit_in_bank,
            "Reconciled"
        );
        update
    }

    /// Take a bank snapshot. An unavailable bank leaves the totals alone.
    fn observe_bank(state: &mut ProfitState, valuator: &Valuator<'_>) -> i64 {
        let Some(bank_value) = valuator.value_of_container(InventoryId::Bank) else {
            debug!("Bank snapshot requested but bank container unavailable");
            return state.profit_in_bank();
        };

        let baseline = match state.baseline_bank_value {
            Some(baseline) => baseline,
            None => {
                info!(bank_value, "Bank baseline established");
                state.baseline_bank_value = Some(bank_value);
                bank_value
            }
        };
        state.last_observed_bank_value = Some(bank_value);

        if let DepositPhase::Depositing { bank_observed, .. } = &mut state.deposit {
            *bank_observed = true;
        }

        bank_value - baseline
    }

    /// Enter a deposit interaction. Returns false if one was already open.
    pub fn begin_deposit(state: &mut ProfitState) -> bool {
        if state.is_depositing() {
            debug!("Deposit already in progress");
            return false;
        }
        state.deposit = DepositPhase::Depositing {
            pre_deposit_value: state.current_inventory_value,
            bank_observed: false,
        };
        info!(pre_deposit_value = state.current_inventory_value, "Deposit started");
        true
    }

    /// Leave a deposit interaction, crediting what left the inventory to
    /// the bank. Returns `None` if no deposit was open.
    pub fn finish_deposit(state: &mut ProfitState, valuator: &Valuator<'_>) -> Option<ValueUpdate> {
        let DepositPhase::Depositing {
            pre_deposit_value,
            bank_observed,
        } = state.deposit
        else {
            debug!("No deposit in progress");
            return None;
        };

        if bank_observed {
            info!("Deposit finished; bank value already observed");
        } else {
            let inventory_value = valuator
                .value_of_container(InventoryId::Inventory)
                .unwrap_or(state.current_inventory_value);
            let increment = pre_deposit_value - inventory_value;
            let bank_value = state.last_observed_bank_value.map_or(increment, |last| last + increment);
            state.last_observed_bank_value = Some(bank_value);
            info!(increment, bank_value, "Deposit finished");
        }

        let update = Self::reconcile(state, valuator, ReconcileKind::DEPOSIT);
        state.deposit = DepositPhase::Idle;
        Some(update)
    }

    /// Zero profit on hand and banked profit, then refresh.
    ///
    /// The bank baseline is dropped so the next bank visit starts a new one.
    /// The inventory is re-anchored first, so whatever is carried at the
    /// moment of the reset is the new zero point for profit on hand.
    pub fn reset(state: &mut ProfitState, valuator: &Valuator<'_>) -> ValueUpdate {
        if state.is_depositing() {
            info!("Open deposit abandoned by reset");
        }
        state.current_inventory_value = valuator
            .value_of_container(InventoryId::Inventory)
            .unwrap_or(0);
        state.deposit = DepositPhase::Idle;
        state.profit_on_hand = Some(0);
        state.last_observed_bank_value = Some(0);
        state.baseline_bank_value = None;
        info!(inventory_value = state.current_inventory_value, "Profit reset");

        Self::reconcile(state, valuator, ReconcileKind::INVENTORY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
