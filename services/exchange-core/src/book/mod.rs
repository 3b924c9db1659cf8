//! Order book infrastructure
//!
//! One `SymbolBook` per market, holding a bid/ask `OutcomeBook` for each
//! of the two outcome tokens.

pub mod outcome_book;
pub mod price_level;
pub mod snapshot;

pub use outcome_book::{BookSide, OutcomeBook};
pub use price_level::{MakerEntry, PriceLevel};
pub use snapshot::{BookSnapshot, LevelSnapshot, MakerView, OutcomeSnapshot};

use types::outcome::Outcome;

/// Both outcome books of one symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolBook {
    pub yes: OutcomeBook,
    pub no: OutcomeBook,
}

impl SymbolBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self, outcome: Outcome) -> &OutcomeBook {
        match outcome {
            Outcome::Yes => &self.yes,
            Outcome::No => &self.no,
        }
    }

    pub fn outcome_mut(&mut self, outcome: Outcome) -> &mut OutcomeBook {
        match outcome {
            Outcome::Yes => &mut self.yes,
            Outcome::No => &mut self.no,
        }
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            yes: self.yes.snapshot(),
            no: self.no.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::UserId;
    use types::numeric::{Price, Quantity};

    #[test]
    fn test_outcome_accessors_are_disjoint() {
        let mut book = SymbolBook::new();
        let price = Price::from_str("5").unwrap();
        book.outcome_mut(Outcome::Yes)
            .add_maker(BookSide::Bid, price, &UserId::new("u1"), Quantity::new(10));

        assert_eq!(book.outcome(Outcome::Yes).best_bid(), Some(price));
        assert_eq!(book.outcome(Outcome::No).best_bid(), None);
    }
}
