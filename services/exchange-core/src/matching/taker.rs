//! Taker pass for placed buys
//!
//! Walks the resting asks of the bought outcome in ascending price order
//! and fills makers in insertion order at the maker's price. The taker's
//! cash was reserved up front by the caller; each fill consumes from that
//! reservation, delivers tokens out of the maker's locked inventory, and
//! pays the maker in free cash.

use rust_decimal::Decimal;
use tracing::debug;
use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::numeric::{Price, Quantity};
use types::outcome::Outcome;

use crate::book::{BookSide, OutcomeBook};
use crate::ledger::{CashLedger, InventoryLedger};

use super::crossing;

/// Aggregate result of one taker pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TakerFill {
    /// Tokens acquired across all fills.
    pub filled: Quantity,
    /// Cash consumed from the taker's reservation.
    pub notional: Decimal,
}

/// Match a buy of `qty` tokens limited at `limit` against the asks of
/// `book`. Stops at the first level priced above the limit or when the
/// taker is satisfied. Returns what was filled; the residual is the
/// caller's to rest.
#[allow(clippy::too_many_arguments)]
pub fn match_buy(
    book: &mut OutcomeBook,
    cash: &mut CashLedger,
    inventory: &mut InventoryLedger,
    symbol: &SymbolId,
    outcome: Outcome,
    taker: &UserId,
    limit: Price,
    qty: Quantity,
) -> Result<TakerFill, ExchangeError> {
    let mut remaining = qty;
    let mut notional = Decimal::ZERO;

    while !remaining.is_zero() {
        let Some(ask_price) = book.best_ask() else {
            break;
        };
        if !crossing::taker_can_match(limit, ask_price) {
            break;
        }

        let Some((maker, maker_qty)) = book.ask_level(ask_price).and_then(|level| level.front())
        else {
            break;
        };

        let fill = remaining.min(maker_qty);
        let fill_notional = fill * ask_price;

        // buyer: reserved cash pays out, tokens arrive free
        cash.consume_locked(taker, fill_notional)?;
        inventory.credit_free_qty(taker, symbol, outcome, fill);

        // maker: reserved tokens are delivered, cash arrives free
        inventory.consume_locked_qty(&maker, symbol, outcome, fill)?;
        cash.credit_free(&maker, fill_notional);

        book.reduce_maker(BookSide::Ask, ask_price, &maker, fill)?;

        debug!(
            taker = %taker,
            maker = %maker,
            symbol = %symbol,
            outcome = %outcome,
            price = %ask_price,
            quantity = %fill,
            "taker fill"
        );

        remaining -= fill;
        notional += fill_notional;
    }

    Ok(TakerFill {
        filled: qty - remaining,
        notional,
    })
}
