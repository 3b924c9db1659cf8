//! Per-user cash ledger
//!
//! Each user holds a free and a locked balance. Locking reserves cash
//! against a resting buy; a trade consumes from the locked side while the
//! counterparty is credited on the free side. Every operation is exact
//! decimal arithmetic and every underflow is surfaced as an error instead
//! of mutating state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::errors::ExchangeError;
use types::ids::UserId;

/// Free/locked cash balances of a single user.
///
/// Invariant: both fields are always >= 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CashAccount {
    free: Decimal,
    locked: Decimal,
}

impl CashAccount {
    pub fn new(free: Decimal, locked: Decimal) -> Self {
        Self { free, locked }
    }

    pub fn free(&self) -> Decimal {
        self.free
    }

    pub fn locked(&self) -> Decimal {
        self.locked
    }

    /// Total cash held by this account, free or reserved.
    pub fn total(&self) -> Decimal {
        self.free + self.locked
    }
}

/// Serializable view of a cash balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashBalanceView {
    pub free: Decimal,
    pub locked: Decimal,
}

/// Cash register for all users.
///
/// Users are created on first touch; `BTreeMap` keeps snapshot iteration
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct CashLedger {
    accounts: BTreeMap<UserId, CashAccount>,
}

impl CashLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently create a zero-balance account.
    pub fn ensure_user(&mut self, user: &UserId) {
        self.accounts.entry(user.clone()).or_default();
    }

    /// Seed an account with explicit balances, replacing any prior state.
    pub fn set_balances(&mut self, user: &UserId, free: Decimal, locked: Decimal) {
        self.accounts
            .insert(user.clone(), CashAccount::new(free, locked));
    }

    /// Credit free cash from outside the system. Amount must be positive.
    pub fn deposit(&mut self, user: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::InvalidInput(format!(
                "deposit amount must be positive, got {}",
                amount
            )));
        }
        let account = self.accounts.entry(user.clone()).or_default();
        account.free += amount;
        Ok(())
    }

    /// Move `amount` from free to locked.
    pub fn lock(&mut self, user: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let account = self.accounts.entry(user.clone()).or_default();
        if account.free < amount {
            return Err(ExchangeError::InsufficientCash {
                required: amount,
                available: account.free,
            });
        }
        account.free -= amount;
        account.locked += amount;
        Ok(())
    }

    /// Move `amount` from locked back to free.
    pub fn unlock(&mut self, user: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let account = self.accounts.entry(user.clone()).or_default();
        if account.locked < amount {
            return Err(ExchangeError::LedgerInconsistency(format!(
                "unlock of {} exceeds locked cash {} for {}",
                amount, account.locked, user
            )));
        }
        account.locked -= amount;
        account.free += amount;
        Ok(())
    }

    /// Spend reserved cash; it leaves this account entirely.
    pub fn consume_locked(&mut self, user: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let account = self.accounts.entry(user.clone()).or_default();
        if account.locked < amount {
            return Err(ExchangeError::LedgerInconsistency(format!(
                "consume of {} exceeds locked cash {} for {}",
                amount, account.locked, user
            )));
        }
        account.locked -= amount;
        Ok(())
    }

    /// Spend free cash directly (minting).
    pub fn consume_free(&mut self, user: &UserId, amount: Decimal) -> Result<(), ExchangeError> {
        let account = self.accounts.entry(user.clone()).or_default();
        if account.free < amount {
            return Err(ExchangeError::InsufficientCash {
                required: amount,
                available: account.free,
            });
        }
        account.free -= amount;
        Ok(())
    }

    /// Credit free cash (trade settlement payout).
    pub fn credit_free(&mut self, user: &UserId, amount: Decimal) {
        let account = self.accounts.entry(user.clone()).or_default();
        account.free += amount;
    }

    pub fn contains_user(&self, user: &UserId) -> bool {
        self.accounts.contains_key(user)
    }

    /// Balances of a single user; errors when the user was never created.
    pub fn balances(&self, user: &UserId) -> Result<(Decimal, Decimal), ExchangeError> {
        self.accounts
            .get(user)
            .map(|a| (a.free, a.locked))
            .ok_or_else(|| ExchangeError::UserNotFound(user.to_string()))
    }

    /// Point-in-time copy of every account.
    pub fn snapshot(&self) -> BTreeMap<UserId, CashBalanceView> {
        self.accounts
            .iter()
            .map(|(user, account)| {
                (
                    user.clone(),
                    CashBalanceView {
                        free: account.free,
                        locked: account.locked,
                    },
                )
            })
            .collect()
    }

    /// Sum of free + locked cash across all users (conservation checks).
    pub fn total_cash(&self) -> Decimal {
        self.accounts.values().map(|a| a.total()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    #[test]
    fn test_ensure_user_idempotent() {
        let mut ledger = CashLedger::new();
        ledger.ensure_user(&user("u1"));
        ledger.deposit(&user("u1"), dec!(100)).unwrap();
        ledger.ensure_user(&user("u1"));

        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(100), dec!(0)));
    }

    #[test]
    fn test_deposit_rejects_non_positive() {
        let mut ledger = CashLedger::new();
        assert!(ledger.deposit(&user("u1"), dec!(0)).is_err());
        assert!(ledger.deposit(&user("u1"), dec!(-5)).is_err());
    }

    #[test]
    fn test_lock_and_unlock() {
        let mut ledger = CashLedger::new();
        ledger.deposit(&user("u1"), dec!(1000)).unwrap();

        ledger.lock(&user("u1"), dec!(300)).unwrap();
        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(700), dec!(300)));

        ledger.unlock(&user("u1"), dec!(100)).unwrap();
        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(800), dec!(200)));
    }

    #[test]
    fn test_lock_insufficient_cash() {
        let mut ledger = CashLedger::new();
        ledger.deposit(&user("u1"), dec!(100)).unwrap();

        let err = ledger.lock(&user("u1"), dec!(150)).unwrap_err();
        assert_eq!(err.kind(), "INSUFFICIENT_CASH");
        // state unchanged
        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(100), dec!(0)));
    }

    #[test]
    fn test_unlock_overdraw_is_inconsistency() {
        let mut ledger = CashLedger::new();
        ledger.deposit(&user("u1"), dec!(100)).unwrap();
        ledger.lock(&user("u1"), dec!(50)).unwrap();

        let err = ledger.unlock(&user("u1"), dec!(60)).unwrap_err();
        assert_eq!(err.kind(), "LEDGER_INCONSISTENCY");
        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(50), dec!(50)));
    }

    #[test]
    fn test_consume_locked_removes_cash_from_system() {
        let mut ledger = CashLedger::new();
        ledger.deposit(&user("u1"), dec!(1000)).unwrap();
        ledger.lock(&user("u1"), dec!(950)).unwrap();

        ledger.consume_locked(&user("u1"), dec!(950)).unwrap();
        assert_eq!(ledger.balances(&user("u1")).unwrap(), (dec!(50), dec!(0)));
        assert_eq!(ledger.total_cash(), dec!(50));
    }

    #[test]
    fn test_settlement_conserves_total() {
        let mut ledger = CashLedger::new();
        ledger.deposit(&user("buyer"), dec!(1000)).unwrap();
        ledger.deposit(&user("seller"), dec!(200)).unwrap();
        let before = ledger.total_cash();

        // buyer pays seller 300 out of a 400 reservation
        ledger.lock(&user("buyer"), dec!(400)).unwrap();
        ledger.consume_locked(&user("buyer"), dec!(300)).unwrap();
        ledger.credit_free(&user("seller"), dec!(300));
        ledger.unlock(&user("buyer"), dec!(100)).unwrap();

        assert_eq!(ledger.total_cash(), before);
    }

    #[test]
    fn test_balances_unknown_user() {
        let ledger = CashLedger::new();
        let err = ledger.balances(&user("ghost")).unwrap_err();
        assert_eq!(err.kind(), "USER_NOT_FOUND");
    }
}
