//! Book-sweep match: YES buyers paired with NO buyers
//!
//! A YES bid at `py` and a NO bid at `pn` with `py >= pn` jointly cover
//! the face value of a token pair, so the engine settles them by minting:
//! both buyers' reserved cash is consumed and each receives their outcome
//! token as free inventory. There is no seller, so no locked inventory is
//! touched anywhere in this pass.

use rust_decimal::Decimal;
use tracing::debug;
use types::errors::ExchangeError;
use types::ids::{SymbolId, UserId};
use types::numeric::{Price, Quantity};
use types::outcome::Outcome;

use crate::book::{BookSide, SymbolBook};
use crate::ledger::{CashLedger, InventoryLedger};

use super::crossing;

/// One settled YES/NO pairing.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTrade {
    pub yes_buyer: UserId,
    pub no_buyer: UserId,
    pub quantity: Quantity,
    /// Midpoint settlement price recorded for the trade.
    pub price: Decimal,
    pub yes_bid: Price,
    pub no_bid: Price,
}

/// Sweep one symbol's book until the heads no longer cross.
///
/// YES bids are scanned from the highest price downward, NO bids from the
/// lowest upward, both restricted to the tradable [1, 10] range (fixture
/// prices outside it never participate). Within a pair of head levels,
/// makers settle pairwise in insertion order.
pub fn run_book_sweep(
    book: &mut SymbolBook,
    cash: &mut CashLedger,
    inventory: &mut InventoryLedger,
    symbol: &SymbolId,
) -> Result<Vec<SweepTrade>, ExchangeError> {
    let mut trades = Vec::new();

    loop {
        let Some(py) = book.yes.max_bid_in_range() else {
            break;
        };
        let Some(pn) = book.no.min_bid_in_range() else {
            break;
        };
        // the sorted heads cannot improve once the best pair fails
        if !crossing::sweep_can_match(py, pn) {
            break;
        }

        let price = crossing::sweep_trade_price(py, pn);
        let yes_total = book.yes.bid_level(py).map(|l| l.total()).unwrap_or(Quantity::ZERO);
        let no_total = book.no.bid_level(pn).map(|l| l.total()).unwrap_or(Quantity::ZERO);
        let mut pending = yes_total.min(no_total);

        while !pending.is_zero() {
            let Some((yes_buyer, yes_qty)) = book.yes.bid_level(py).and_then(|l| l.front()) else {
                break;
            };
            let Some((no_buyer, no_qty)) = book.no.bid_level(pn).and_then(|l| l.front()) else {
                break;
            };

            let fill = yes_qty.min(no_qty).min(pending);

            // both buyers' reservations fund the minted pair
            cash.consume_locked(&yes_buyer, fill * py)?;
            cash.consume_locked(&no_buyer, fill * pn)?;
            inventory.credit_free_qty(&yes_buyer, symbol, Outcome::Yes, fill);
            inventory.credit_free_qty(&no_buyer, symbol, Outcome::No, fill);

            book.yes.reduce_maker(BookSide::Bid, py, &yes_buyer, fill)?;
            book.no.reduce_maker(BookSide::Bid, pn, &no_buyer, fill)?;

            debug!(
                yes_buyer = %yes_buyer,
                no_buyer = %no_buyer,
                symbol = %symbol,
                price = %price,
                quantity = %fill,
                "book-sweep settlement"
            );

            trades.push(SweepTrade {
                yes_buyer,
                no_buyer,
                quantity: fill,
                price,
                yes_bid: py,
                no_bid: pn,
            });

            pending -= fill;
        }
        // at least one head level emptied; the outer loop re-reads the heads
    }

    Ok(trades)
}
