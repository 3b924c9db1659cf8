//! Crossing rules
//!
//! Two ways liquidity meets on this exchange: a taker buy crossing the
//! resting asks of its own outcome, and the book-sweep pairing a YES buyer
//! with a NO buyer whose combined bids cover the face value.

use rust_decimal::Decimal;
use types::numeric::Price;

/// A taker buy fills a resting ask when the ask does not exceed the limit.
pub fn taker_can_match(limit: Price, ask: Price) -> bool {
    ask <= limit
}

/// Book-sweep crossing: the highest YES bid and the lowest NO bid pair up
/// when `yes_bid >= no_bid`. A YES/NO pair is a fully covered unit of the
/// face value, so the combined bid of a crossing pair always covers it.
pub fn sweep_can_match(yes_bid: Price, no_bid: Price) -> bool {
    yes_bid >= no_bid
}

/// Settlement price of a book-sweep cross: the half-even midpoint of the
/// two bids at 2 decimal places.
pub fn sweep_trade_price(yes_bid: Price, no_bid: Price) -> Decimal {
    yes_bid.midpoint(no_bid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn price(s: &str) -> Price {
        Price::from_str(s).unwrap()
    }

    #[test]
    fn test_taker_crossing() {
        assert!(taker_can_match(price("9.5"), price("9.5")));
        assert!(taker_can_match(price("9.5"), price("8")));
        assert!(!taker_can_match(price("9.5"), price("9.6")));
    }

    #[test]
    fn test_sweep_crossing() {
        assert!(sweep_can_match(price("6"), price("5")));
        assert!(sweep_can_match(price("5"), price("5")));
        assert!(!sweep_can_match(price("5"), price("6")));
    }

    #[test]
    fn test_sweep_price_is_midpoint() {
        assert_eq!(sweep_trade_price(price("6"), price("5")), dec!(5.5));
        assert_eq!(sweep_trade_price(price("9.5"), price("9.5")), dec!(9.5));
    }
}
