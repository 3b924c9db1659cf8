//! Deterministic reset fixture
//!
//! Reinstated on every `reset`: three users, one symbol, and a known book
//! shape. The fixture reproduces the historical data set verbatim,
//! including a NO bid at 10.5 that sits outside the tradable range (the
//! book-sweep filter never crosses it) and resting bids that are not
//! backed by locked cash (cancels against them surface a ledger
//! inconsistency and leave state unchanged).

use rust_decimal::Decimal;
use types::ids::{SymbolId, UserId};
use types::numeric::{Price, Quantity};
use types::outcome::Outcome;

use crate::book::{BookSide, SymbolBook};
use crate::engine::ExchangeState;

/// Symbol reinstated by the fixture.
pub const SEED_SYMBOL: &str = "BTC_USDT_10_Oct_2024_9_30";

pub(crate) fn seeded_state() -> ExchangeState {
    let mut state = ExchangeState::default();

    let user1 = UserId::new("user1");
    let user2 = UserId::new("user2");
    let user3 = UserId::new("user3");
    let symbol = SymbolId::new(SEED_SYMBOL);

    state
        .cash
        .set_balances(&user1, Decimal::from(10000), Decimal::ZERO);
    state
        .cash
        .set_balances(&user2, Decimal::from(20000), Decimal::from(5000));
    state
        .cash
        .set_balances(&user3, Decimal::from(15000), Decimal::from(2000));

    let mut book = SymbolBook::new();
    let yes = book.outcome_mut(Outcome::Yes);
    let at_9_5 = Price::new(Decimal::new(95, 1));
    yes.add_maker(BookSide::Bid, at_9_5, &user1, Quantity::new(200));
    yes.add_maker(BookSide::Bid, at_9_5, &user2, Quantity::new(1000));
    let at_8_5 = Price::new(Decimal::new(85, 1));
    yes.add_maker(BookSide::Bid, at_8_5, &user1, Quantity::new(300));
    yes.add_maker(BookSide::Bid, at_8_5, &user2, Quantity::new(300));
    yes.add_maker(BookSide::Bid, at_8_5, &user3, Quantity::new(600));

    let no = book.outcome_mut(Outcome::No);
    let at_10_5 = Price::new(Decimal::new(105, 1));
    no.add_maker(BookSide::Bid, at_10_5, &user2, Quantity::new(500));
    no.add_maker(BookSide::Bid, at_10_5, &user3, Quantity::new(300));

    state.books.insert(symbol.clone(), book);

    state
        .inventory
        .set_holding(&user1, &symbol, Outcome::Yes, Quantity::new(100), Quantity::ZERO);
    state
        .inventory
        .set_holding(&user1, &symbol, Outcome::No, Quantity::new(50), Quantity::ZERO);

    state
}
