//! Per-user, per-symbol, per-outcome token inventory
//!
//! Mirrors the cash ledger's free/locked discipline for outcome tokens.
//! Locking reserves tokens against a resting sell; minting credits equal
//! free quantities of YES and NO in one step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::numeric::Quantity;
use types::outcome::Outcome;

/// Free/locked token quantities for one outcome of one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Holding {
    free: Quantity,
    locked: Quantity,
}

impl Holding {
    pub fn new(free: Quantity, locked: Quantity) -> Self {
        Self { free, locked }
    }

    pub fn free(&self) -> Quantity {
        self.free
    }

    pub fn locked(&self) -> Quantity {
        self.locked
    }

    pub fn total(&self) -> Quantity {
        self.free + self.locked
    }
}

/// YES and NO holdings of one user in one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    yes: Holding,
    no: Holding,
}

impl Position {
    pub fn holding(&self, outcome: Outcome) -> &Holding {
        match outcome {
            Outcome::Yes => &self.yes,
            Outcome::No => &self.no,
        }
    }

    fn holding_mut(&mut self, outcome: Outcome) -> &mut Holding {
        match outcome {
            Outcome::Yes => &mut self.yes,
            Outcome::No => &mut self.no,
        }
    }
}

/// Serializable view of one outcome holding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingView {
    pub quantity: Quantity,
    pub locked: Quantity,
}

/// Serializable view of one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    pub yes: HoldingView,
    pub no: HoldingView,
}

/// All positions of one user, keyed by symbol.
pub type InventoryView = BTreeMap<SymbolId, PositionView>;

/// Token register for all users.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    positions: BTreeMap<UserId, BTreeMap<SymbolId, Position>>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently create an empty position.
    pub fn ensure_position(&mut self, user: &UserId, symbol: &SymbolId) {
        self.positions
            .entry(user.clone())
            .or_default()
            .entry(symbol.clone())
            .or_default();
    }

    /// Seed a holding with explicit quantities, replacing prior state.
    pub fn set_holding(
        &mut self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        free: Quantity,
        locked: Quantity,
    ) {
        let position = self
            .positions
            .entry(user.clone())
            .or_default()
            .entry(symbol.clone())
            .or_default();
        *position.holding_mut(outcome) = Holding::new(free, locked);
    }

    fn position_mut(&mut self, user: &UserId, symbol: &SymbolId) -> &mut Position {
        self.positions
            .entry(user.clone())
            .or_default()
            .entry(symbol.clone())
            .or_default()
    }

    /// Move `qty` tokens from free to locked.
    pub fn lock_qty(
        &mut self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        qty: Quantity,
    ) -> Result<(), ExchangeError> {
        let holding = self.position_mut(user, symbol).holding_mut(outcome);
        match holding.free.checked_sub(qty) {
            Some(remaining) => {
                holding.free = remaining;
                holding.locked += qty;
                Ok(())
            }
            None => Err(ExchangeError::InsufficientInventory {
                required: qty.get(),
                available: holding.free.get(),
            }),
        }
    }

    /// Move `qty` tokens from locked back to free.
    pub fn unlock_qty(
        &mut self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        qty: Quantity,
    ) -> Result<(), ExchangeError> {
        let holding = self.position_mut(user, symbol).holding_mut(outcome);
        match holding.locked.checked_sub(qty) {
            Some(remaining) => {
                holding.locked = remaining;
                holding.free += qty;
                Ok(())
            }
            None => Err(ExchangeError::LedgerInconsistency(format!(
                "unlock of {} {} tokens exceeds locked {} for {} in {}",
                qty,
                outcome,
                holding.locked,
                user,
                symbol
            ))),
        }
    }

    /// Remove `qty` reserved tokens; they leave this position entirely
    /// (delivered to the trade counterparty).
    pub fn consume_locked_qty(
        &mut self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        qty: Quantity,
    ) -> Result<(), ExchangeError> {
        let holding = self.position_mut(user, symbol).holding_mut(outcome);
        match holding.locked.checked_sub(qty) {
            Some(remaining) => {
                holding.locked = remaining;
                Ok(())
            }
            None => Err(ExchangeError::LedgerInconsistency(format!(
                "consume of {} {} tokens exceeds locked {} for {} in {}",
                qty,
                outcome,
                holding.locked,
                user,
                symbol
            ))),
        }
    }

    /// Credit free tokens (trade delivery, sweep settlement).
    pub fn credit_free_qty(
        &mut self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        qty: Quantity,
    ) {
        let holding = self.position_mut(user, symbol).holding_mut(outcome);
        holding.free += qty;
    }

    /// Credit `qty` free tokens of both outcomes at once (minting).
    ///
    /// Outcome symmetry: exactly the same quantity lands on YES and NO.
    pub fn mint(&mut self, user: &UserId, symbol: &SymbolId, qty: Quantity) {
        let position = self.position_mut(user, symbol);
        position.yes.free += qty;
        position.no.free += qty;
    }

    /// Holding of one user for one outcome; zero when never touched.
    pub fn holding(&self, user: &UserId, symbol: &SymbolId, outcome: Outcome) -> Holding {
        self.positions
            .get(user)
            .and_then(|by_symbol| by_symbol.get(symbol))
            .map(|position| *position.holding(outcome))
            .unwrap_or_default()
    }

    /// Point-in-time copy of one user's positions (empty when unknown).
    pub fn user_snapshot(&self, user: &UserId) -> InventoryView {
        self.positions
            .get(user)
            .map(|by_symbol| {
                by_symbol
                    .iter()
                    .map(|(symbol, position)| (symbol.clone(), Self::position_view(position)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Point-in-time copy of every position.
    pub fn snapshot(&self) -> BTreeMap<UserId, InventoryView> {
        self.positions
            .keys()
            .map(|user| (user.clone(), self.user_snapshot(user)))
            .collect()
    }

    /// Total supply of one outcome token across all users (free + locked).
    pub fn total_supply(&self, symbol: &SymbolId, outcome: Outcome) -> Quantity {
        self.positions
            .values()
            .filter_map(|by_symbol| by_symbol.get(symbol))
            .fold(Quantity::ZERO, |acc, position| {
                acc + position.holding(outcome).total()
            })
    }

    fn position_view(position: &Position) -> PositionView {
        PositionView {
            yes: HoldingView {
                quantity: position.yes.free,
                locked: position.yes.locked,
            },
            no: HoldingView {
                quantity: position.no.free,
                locked: position.no.locked,
            },
        }
    }
}
