//! Read-time views of book state
//!
//! Snapshots are point-in-time copies taken under the shared lock; they
//! never expose a half-applied trade.

use serde::Serialize;
use types::ids::UserId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;

/// One maker's share of a level, in fill order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakerView {
    pub user: UserId,
    pub quantity: Quantity,
}

/// One price level of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelSnapshot {
    pub price: Price,
    pub total: Quantity,
    pub makers: Vec<MakerView>,
}

impl LevelSnapshot {
    pub(crate) fn of(price: Price, level: &PriceLevel) -> Self {
        Self {
            price,
            total: level.total(),
            makers: level
                .makers()
                .iter()
                .map(|entry| MakerView {
                    user: entry.user.clone(),
                    quantity: entry.quantity,
                })
                .collect(),
        }
    }
}

/// Bid and ask levels of one outcome: bids descending, asks ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeSnapshot {
    pub bids: Vec<LevelSnapshot>,
    pub asks: Vec<LevelSnapshot>,
}

/// Full snapshot of one symbol's book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookSnapshot {
    pub yes: OutcomeSnapshot,
    pub no: OutcomeSnapshot,
}
