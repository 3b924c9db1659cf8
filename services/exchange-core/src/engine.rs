//! The exchange core
//!
//! One `Exchange` value owns the cash ledger, the inventory ledger, and
//! the per-symbol books behind a single writer lock. Every write
//! operation stages its mutations on a copy of the state and commits only
//! on success, so a failing request leaves all ledgers and the book
//! unchanged. Events are appended to the outbound queue inside the
//! critical section and delivered outside it.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::numeric::{Price, Quantity};
use types::outcome::Outcome;

use crate::book::{BookSide, BookSnapshot, SymbolBook};
use crate::events::{ExchangeEvent, OrderKind};
use crate::ledger::{CashBalanceView, CashLedger, InventoryLedger, InventoryView};
use crate::matching::{sweep, taker};
use crate::outbound::{EventOutbox, OutboxConfig};
use crate::seed;

/// Aggregate outcome of an order placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceOutcome {
    FullyMatched,
    PartiallyMatched,
    Pending,
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CancelReceipt {
    /// Quantity actually removed from the book.
    pub canceled: Quantity,
    /// Whether the canceled order was a resting buy or sell.
    #[serde(rename = "type")]
    pub kind: OrderKind,
}

/// Result of a mint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MintReceipt {
    pub minted: Quantity,
    /// Free cash remaining after the mint cost left the ledger.
    pub remaining_cash: Decimal,
}

/// Engine configuration.
#[derive(Debug, Clone, Default)]
pub struct ExchangeConfig {
    pub outbox: OutboxConfig,
}

/// All mutable exchange state, guarded by the engine lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct ExchangeState {
    pub(crate) cash: CashLedger,
    pub(crate) inventory: InventoryLedger,
    pub(crate) books: BTreeMap<SymbolId, SymbolBook>,
}

/// The in-memory exchange: two ledgers, the books, and the matching
/// engine driving them atomically.
pub struct Exchange {
    state: RwLock<ExchangeState>,
    outbox: Arc<EventOutbox>,
}

impl Exchange {
    /// Create an empty exchange with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExchangeConfig::default())
    }

    pub fn with_config(config: ExchangeConfig) -> Self {
        Self {
            state: RwLock::new(ExchangeState::default()),
            outbox: Arc::new(EventOutbox::new(config.outbox)),
        }
    }

    /// The outbound event queue, for wiring up a fan-out worker.
    pub fn outbox(&self) -> Arc<EventOutbox> {
        Arc::clone(&self.outbox)
    }

    /// Liveness probe.
    pub fn ping(&self) -> &'static str {
        "API is up and running"
    }

    // ── Write operations ────────────────────────────────────────────

    /// Clear all state and reinstate the deterministic fixture.
    pub fn reset(&self) {
        let result: Result<(), ExchangeError> = self.write(|state, events| {
            *state = seed::seeded_state();
            events.push(ExchangeEvent::DataReset);
            Ok(())
        });
        // the seed is infallible
        debug_assert!(result.is_ok());
        info!("exchange state reset to fixture");
    }

    /// Idempotently create a user with zero balances.
    pub fn create_user(&self, user: &UserId) -> Result<(), ExchangeError> {
        self.write(|state, events| {
            state.cash.ensure_user(user);
            events.push(ExchangeEvent::UserCreated {
                user_id: user.clone(),
            });
            Ok(())
        })
    }

    /// Create an empty book for a new symbol.
    pub fn create_symbol(&self, symbol: &SymbolId) -> Result<(), ExchangeError> {
        self.write(|state, events| {
            if state.books.contains_key(symbol) {
                return Err(ExchangeError::SymbolExists(symbol.to_string()));
            }
            state.books.insert(symbol.clone(), SymbolBook::new());
            events.push(ExchangeEvent::SymbolCreated {
                symbol_name: symbol.clone(),
            });
            Ok(())
        })
    }

    /// Credit free cash from outside the system.
    pub fn onramp(&self, user: &UserId, amount: Decimal) -> Result<CashBalanceView, ExchangeError> {
        self.write(|state, events| {
            state.cash.deposit(user, amount)?;
            let (free, locked) = state.cash.balances(user)?;
            let balance = CashBalanceView { free, locked };
            events.push(ExchangeEvent::BalanceUpdated {
                user_id: user.clone(),
                balance: balance.clone(),
            });
            Ok(balance)
        })
    }

    /// Place a buy: reserve the full notional, run the taker pass against
    /// the outcome's asks, rest the residual, refund the over-reservation,
    /// then sweep the book.
    pub fn buy(
        &self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        price: Price,
        qty: Quantity,
    ) -> Result<PlaceOutcome, ExchangeError> {
        validate_order(price, qty)?;
        self.write(|state, events| {
            let ExchangeState {
                cash,
                inventory,
                books,
            } = state;
            let book = books
                .get_mut(symbol)
                .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))?;

            let notional = qty * price;
            cash.lock(user, notional)?;

            let fill = taker::match_buy(
                book.outcome_mut(outcome),
                cash,
                inventory,
                symbol,
                outcome,
                user,
                price,
                qty,
            )?;

            let residual = qty - fill.filled;
            if !residual.is_zero() {
                book.outcome_mut(outcome)
                    .add_maker(BookSide::Bid, price, user, residual);
            }

            // reconcile the reservation: fills below the limit price leave
            // a surplus in locked cash
            let refund = notional - fill.notional - residual * price;
            if refund > Decimal::ZERO {
                cash.unlock(user, refund)?;
            }

            sweep::run_book_sweep(book, cash, inventory, symbol)?;

            // the sweep may have consumed part or all of the rested residual
            let resting_after = book.outcome(outcome).maker_qty(BookSide::Bid, price, user);
            let unfilled = residual.min(resting_after);
            let filled_total = qty - unfilled;

            events.push(ExchangeEvent::OrderPlaced {
                kind: OrderKind::Buy,
                user_id: user.clone(),
                stock_symbol: symbol.clone(),
                quantity: qty,
                price,
                stock_type: outcome,
            });
            info!(
                user = %user,
                symbol = %symbol,
                outcome = %outcome,
                price = %price,
                quantity = %qty,
                filled = %filled_total,
                "buy placed"
            );

            Ok(if filled_total == qty {
                PlaceOutcome::FullyMatched
            } else if !filled_total.is_zero() {
                PlaceOutcome::PartiallyMatched
            } else {
                PlaceOutcome::Pending
            })
        })
    }

    /// Place a sell: reserve the inventory and rest it as an ask. Sells
    /// always rest; they are consumed by later buys at that level.
    pub fn sell(
        &self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        price: Price,
        qty: Quantity,
    ) -> Result<PlaceOutcome, ExchangeError> {
        validate_order(price, qty)?;
        self.write(|state, events| {
            let ExchangeState {
                cash,
                inventory,
                books,
            } = state;
            let book = books
                .get_mut(symbol)
                .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))?;

            cash.ensure_user(user);
            inventory.lock_qty(user, symbol, outcome, qty)?;
            book.outcome_mut(outcome)
                .add_maker(BookSide::Ask, price, user, qty);

            sweep::run_book_sweep(book, cash, inventory, symbol)?;

            events.push(ExchangeEvent::OrderPlaced {
                kind: OrderKind::Sell,
                user_id: user.clone(),
                stock_symbol: symbol.clone(),
                quantity: qty,
                price,
                stock_type: outcome,
            });
            info!(
                user = %user,
                symbol = %symbol,
                outcome = %outcome,
                price = %price,
                quantity = %qty,
                "sell placed"
            );

            Ok(PlaceOutcome::Pending)
        })
    }

    /// Cancel up to `qty` of the order at (symbol, outcome, price, user).
    ///
    /// The bid side is consulted first. A resting buy refunds locked cash,
    /// a resting sell refunds locked inventory.
    pub fn cancel(
        &self,
        user: &UserId,
        symbol: &SymbolId,
        outcome: Outcome,
        price: Price,
        qty: Quantity,
    ) -> Result<CancelReceipt, ExchangeError> {
        validate_order(price, qty)?;
        self.write(|state, events| {
            let ExchangeState {
                cash,
                inventory,
                books,
            } = state;
            let book = books
                .get_mut(symbol)
                .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))?
                .outcome_mut(outcome);

            let (side, kind, owned) = {
                let owned_bid = book.maker_qty(BookSide::Bid, price, user);
                if !owned_bid.is_zero() {
                    (BookSide::Bid, OrderKind::Buy, owned_bid)
                } else {
                    let owned_ask = book.maker_qty(BookSide::Ask, price, user);
                    if owned_ask.is_zero() {
                        return Err(ExchangeError::OrderNotFound(format!(
                            "{} {} @ {} for {}",
                            symbol, outcome, price, user
                        )));
                    }
                    (BookSide::Ask, OrderKind::Sell, owned_ask)
                }
            };

            let canceled = qty.min(owned);
            book.reduce_maker(side, price, user, canceled)?;
            match side {
                BookSide::Bid => cash.unlock(user, canceled * price)?,
                BookSide::Ask => inventory.unlock_qty(user, symbol, outcome, canceled)?,
            }

            events.push(ExchangeEvent::OrderCanceled {
                kind,
                user_id: user.clone(),
                stock_symbol: symbol.clone(),
                quantity: canceled,
                price,
                stock_type: outcome,
            });
            info!(
                user = %user,
                symbol = %symbol,
                outcome = %outcome,
                price = %price,
                quantity = %canceled,
                "order canceled"
            );

            Ok(CancelReceipt { canceled, kind })
        })
    }

    /// Mint `qty` matched YES/NO pairs at a unit cost of `price`.
    ///
    /// The cost is debited straight from free cash and leaves the ledger;
    /// both outcome holdings grow by exactly `qty`.
    pub fn mint(
        &self,
        user: &UserId,
        symbol: &SymbolId,
        qty: Quantity,
        price: Price,
    ) -> Result<MintReceipt, ExchangeError> {
        validate_order(price, qty)?;
        self.write(|state, events| {
            if !state.books.contains_key(symbol) {
                return Err(ExchangeError::SymbolNotFound(symbol.to_string()));
            }

            let cost = qty * price;
            state.cash.consume_free(user, cost)?;
            state.inventory.mint(user, symbol, qty);

            let (free, _) = state.cash.balances(user)?;
            events.push(ExchangeEvent::TokensMinted {
                user_id: user.clone(),
                stock_symbol: symbol.clone(),
                quantity: qty,
                price,
            });
            info!(
                user = %user,
                symbol = %symbol,
                quantity = %qty,
                price = %price,
                "tokens minted"
            );

            Ok(MintReceipt {
                minted: qty,
                remaining_cash: free,
            })
        })
    }

    // ── Read operations ─────────────────────────────────────────────

    /// Balances of one user; errors when the user was never created.
    pub fn cash_balances(&self, user: &UserId) -> Result<CashBalanceView, ExchangeError> {
        self.read(|state| {
            state
                .cash
                .balances(user)
                .map(|(free, locked)| CashBalanceView { free, locked })
        })
    }

    /// Balances of every user.
    pub fn all_cash_balances(&self) -> BTreeMap<UserId, CashBalanceView> {
        self.read(|state| state.cash.snapshot())
    }

    /// Positions of one user (empty when unknown).
    pub fn inventory(&self, user: &UserId) -> InventoryView {
        self.read(|state| state.inventory.user_snapshot(user))
    }

    /// Positions of every user.
    pub fn all_inventories(&self) -> BTreeMap<UserId, InventoryView> {
        self.read(|state| state.inventory.snapshot())
    }

    /// Snapshot of one symbol's book.
    pub fn book_snapshot(&self, symbol: &SymbolId) -> Result<BookSnapshot, ExchangeError> {
        self.read(|state| {
            state
                .books
                .get(symbol)
                .map(SymbolBook::snapshot)
                .ok_or_else(|| ExchangeError::SymbolNotFound(symbol.to_string()))
        })
    }

    /// Snapshot of every book.
    pub fn all_books(&self) -> BTreeMap<SymbolId, BookSnapshot> {
        self.read(|state| {
            state
                .books
                .iter()
                .map(|(symbol, book)| (symbol.clone(), book.snapshot()))
                .collect()
        })
    }

    /// Sum of free + locked cash across all users.
    pub fn total_cash(&self) -> Decimal {
        self.read(|state| state.cash.total_cash())
    }

    /// Total supply of one outcome token (free + locked, all users).
    pub fn total_supply(&self, symbol: &SymbolId, outcome: Outcome) -> Quantity {
        self.read(|state| state.inventory.total_supply(symbol, outcome))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Run a write under the engine lock with commit-on-success staging.
    /// Events are enqueued inside the critical section only after the
    /// staged state has been committed.
    fn write<T>(
        &self,
        op: impl FnOnce(&mut ExchangeState, &mut Vec<ExchangeEvent>) -> Result<T, ExchangeError>,
    ) -> Result<T, ExchangeError> {
        let mut guard = self.state.write().expect("engine lock poisoned");
        let mut staged = guard.clone();
        let mut events = Vec::new();
        let value = op(&mut staged, &mut events)?;
        *guard = staged;
        self.outbox.enqueue_all(events);
        Ok(value)
    }

    fn read<T>(&self, op: impl FnOnce(&ExchangeState) -> T) -> T {
        let guard = self.state.read().expect("engine lock poisoned");
        op(&guard)
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_order(price: Price, qty: Quantity) -> Result<(), ExchangeError> {
    if qty.is_zero() {
        return Err(ExchangeError::InvalidInput(
            "quantity must be at least 1".to_string(),
        ));
    }
    if !price.in_face_range() {
        return Err(ExchangeError::InvalidInput(format!(
            "price {} outside [1, 10]",
            price
        )));
    }
    Ok(())
}
