//! Price level with insertion-ordered maker entries
//!
//! A level aggregates every resting order at one price. Orders are keyed
//! by user, so each user owns at most one entry per level; repeated
//! placements accumulate into the existing entry. The entry order is the
//! fill order, which keeps repeated runs on identical input producing
//! identical trade sequences.

use types::errors::ExchangeError;
use types::ids::UserId;
use types::numeric::Quantity;

/// One maker's resting quantity at a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakerEntry {
    pub user: UserId,
    pub quantity: Quantity,
}

/// All resting quantity at a single price.
///
/// Invariant: `total` equals the sum of the maker entries; a level with
/// zero total is removed from the book.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceLevel {
    makers: Vec<MakerEntry>,
    total: Quantity,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add resting quantity for a user, accumulating into an existing
    /// entry or appending a new one at the back of the queue.
    pub fn add(&mut self, user: &UserId, qty: Quantity) {
        match self.makers.iter_mut().find(|entry| &entry.user == user) {
            Some(entry) => entry.quantity += qty,
            None => self.makers.push(MakerEntry {
                user: user.clone(),
                quantity: qty,
            }),
        }
        self.total += qty;
    }

    /// Shrink a user's entry by `qty`, dropping the entry at zero.
    ///
    /// The caller clamps `qty` to the owned quantity; asking for more than
    /// is resting indicates corrupted bookkeeping.
    pub fn reduce(&mut self, user: &UserId, qty: Quantity) -> Result<(), ExchangeError> {
        let index = self
            .makers
            .iter()
            .position(|entry| &entry.user == user)
            .ok_or_else(|| {
                ExchangeError::LedgerInconsistency(format!("no resting entry for {}", user))
            })?;

        let entry = &mut self.makers[index];
        let remaining = entry.quantity.checked_sub(qty).ok_or_else(|| {
            ExchangeError::LedgerInconsistency(format!(
                "reduce of {} exceeds resting {} for {}",
                qty, entry.quantity, user
            ))
        })?;

        if remaining.is_zero() {
            self.makers.remove(index);
        } else {
            entry.quantity = remaining;
        }
        self.total -= qty;
        Ok(())
    }

    /// First maker in fill order.
    pub fn front(&self) -> Option<(UserId, Quantity)> {
        self.makers
            .first()
            .map(|entry| (entry.user.clone(), entry.quantity))
    }

    /// Resting quantity owned by `user` at this level (zero if absent).
    pub fn quantity_for(&self, user: &UserId) -> Quantity {
        self.makers
            .iter()
            .find(|entry| &entry.user == user)
            .map(|entry| entry.quantity)
            .unwrap_or(Quantity::ZERO)
    }

    pub fn total(&self) -> Quantity {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    pub fn makers(&self) -> &[MakerEntry] {
        &self.makers
    }

    pub fn maker_count(&self) -> usize {
        self.makers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(200));
        level.add(&user("u2"), Quantity::new(1000));

        assert_eq!(level.total(), Quantity::new(1200));
        assert_eq!(level.makers()[0].user, user("u1"));
        assert_eq!(level.makers()[1].user, user("u2"));
    }

    #[test]
    fn test_add_accumulates_per_user() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(100));
        level.add(&user("u2"), Quantity::new(50));
        level.add(&user("u1"), Quantity::new(25));

        // still one entry per user, in original order
        assert_eq!(level.maker_count(), 2);
        assert_eq!(level.quantity_for(&user("u1")), Quantity::new(125));
        assert_eq!(level.makers()[0].user, user("u1"));
        assert_eq!(level.total(), Quantity::new(175));
    }

    #[test]
    fn test_reduce_drops_empty_entry() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(100));
        level.add(&user("u2"), Quantity::new(50));

        level.reduce(&user("u1"), Quantity::new(100)).unwrap();
        assert_eq!(level.maker_count(), 1);
        assert_eq!(level.front().unwrap().0, user("u2"));
        assert_eq!(level.total(), Quantity::new(50));
    }

    #[test]
    fn test_reduce_partial_keeps_position() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(100));
        level.add(&user("u2"), Quantity::new(50));

        level.reduce(&user("u1"), Quantity::new(40)).unwrap();
        assert_eq!(level.front().unwrap(), (user("u1"), Quantity::new(60)));
        assert_eq!(level.total(), Quantity::new(110));
    }

    #[test]
    fn test_reduce_unknown_user_errors() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(100));

        let err = level.reduce(&user("ghost"), Quantity::new(1)).unwrap_err();
        assert_eq!(err.kind(), "LEDGER_INCONSISTENCY");
    }

    #[test]
    fn test_total_matches_entry_sum() {
        let mut level = PriceLevel::new();
        level.add(&user("u1"), Quantity::new(300));
        level.add(&user("u2"), Quantity::new(300));
        level.add(&user("u3"), Quantity::new(600));
        level.reduce(&user("u2"), Quantity::new(100)).unwrap();

        let sum = level
            .makers()
            .iter()
            .fold(Quantity::ZERO, |acc, e| acc + e.quantity);
        assert_eq!(level.total(), sum);
    }
}
