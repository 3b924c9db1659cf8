//! Order book for a single outcome of a symbol
//!
//! Two price maps: `bids` hold resting buys (cash-locked reservations),
//! `asks` hold resting sells (inventory-locked tokens). BTreeMap keys give
//! deterministic iteration; the read paths state their sort direction
//! explicitly.

use std::collections::BTreeMap;
use types::errors::ExchangeError;
use types::ids::UserId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;
use super::snapshot::{LevelSnapshot, OutcomeSnapshot};

/// Book side selector for shared code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    Bid,
    Ask,
}

/// Bid and ask levels of one outcome.
#[derive(Debug, Clone, Default)]
pub struct OutcomeBook {
    bids: BTreeMap<Price, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
}

impl OutcomeBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, side: BookSide) -> &BTreeMap<Price, PriceLevel> {
        match side {
            BookSide::Bid => &self.bids,
            BookSide::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, side: BookSide) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            BookSide::Bid => &mut self.bids,
            BookSide::Ask => &mut self.asks,
        }
    }

    /// Grow the level at `price` by `qty` for `user`.
    pub fn add_maker(&mut self, side: BookSide, price: Price, user: &UserId, qty: Quantity) {
        self.side_mut(side)
            .entry(price)
            .or_default()
            .add(user, qty);
    }

    /// Shrink the level at `price`; removes the user entry at zero and the
    /// level when its total reaches zero.
    pub fn reduce_maker(
        &mut self,
        side: BookSide,
        price: Price,
        user: &UserId,
        qty: Quantity,
    ) -> Result<(), ExchangeError> {
        let levels = self.side_mut(side);
        let level = levels.get_mut(&price).ok_or_else(|| {
            ExchangeError::LedgerInconsistency(format!("no price level at {}", price))
        })?;
        level.reduce(user, qty)?;
        if level.total().is_zero() {
            levels.remove(&price);
        }
        Ok(())
    }

    /// Resting quantity for `user` at `price` (zero if absent).
    pub fn maker_qty(&self, side: BookSide, price: Price, user: &UserId) -> Quantity {
        self.side(side)
            .get(&price)
            .map(|level| level.quantity_for(user))
            .unwrap_or(Quantity::ZERO)
    }

    /// Highest bid price.
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    /// Lowest ask price.
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Highest bid inside the tradable [1, 10] range.
    pub fn max_bid_in_range(&self) -> Option<Price> {
        self.bids
            .keys()
            .rev()
            .find(|price| price.in_face_range())
            .copied()
    }

    /// Lowest bid inside the tradable [1, 10] range.
    pub fn min_bid_in_range(&self) -> Option<Price> {
        self.bids
            .keys()
            .find(|price| price.in_face_range())
            .copied()
    }

    /// Level at a bid price.
    pub fn bid_level(&self, price: Price) -> Option<&PriceLevel> {
        self.bids.get(&price)
    }

    /// Level at an ask price.
    pub fn ask_level(&self, price: Price) -> Option<&PriceLevel> {
        self.asks.get(&price)
    }

    /// Ascending walk over ask levels, for the taker scan.
    pub fn asks_ascending(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.asks.iter()
    }

    /// Descending walk over bid levels, for book crossing reads.
    pub fn bids_descending(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.bids.iter().rev()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Point-in-time copy: bids descending, asks ascending.
    pub fn snapshot(&self) -> OutcomeSnapshot {
        OutcomeSnapshot {
            bids: self
                .bids_descending()
                .map(|(price, level)| LevelSnapshot::of(*price, level))
                .collect(),
            asks: self
                .asks_ascending()
                .map(|(price, level)| LevelSnapshot::of(*price, level))
                .collect(),
        }
    }

    fn range_total(levels: &BTreeMap<Price, PriceLevel>) -> Quantity {
        levels
            .values()
            .fold(Quantity::ZERO, |acc, level| acc + level.total())
    }

    /// Aggregate resting bid quantity (all levels).
    pub fn bid_depth(&self) -> Quantity {
        Self::range_total(&self.bids)
    }

    /// Aggregate resting ask quantity (all levels).
    pub fn ask_depth(&self) -> Quantity {
        Self::range_total(&self.asks)
    }
}
