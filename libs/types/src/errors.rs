//! Error taxonomy for the exchange core
//!
//! One variant per error kind. A failing write leaves all ledgers and the
//! book unchanged; the transport layer maps `kind`/`status` onto its own
//! response format.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level exchange error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("symbol already exists: {0}")]
    SymbolExists(String),

    #[error("insufficient cash: required {required}, available {available}")]
    InsufficientCash { required: Decimal, available: Decimal },

    #[error("insufficient inventory: required {required}, available {available}")]
    InsufficientInventory { required: u64, available: u64 },

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("ledger inconsistency: {0}")]
    LedgerInconsistency(String),
}

impl ExchangeError {
    /// Stable machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ExchangeError::InvalidInput(_) => "INVALID_INPUT",
            ExchangeError::UserNotFound(_) => "USER_NOT_FOUND",
            ExchangeError::SymbolNotFound(_) => "SYMBOL_NOT_FOUND",
            ExchangeError::SymbolExists(_) => "SYMBOL_EXISTS",
            ExchangeError::InsufficientCash { .. } => "INSUFFICIENT_CASH",
            ExchangeError::InsufficientInventory { .. } => "INSUFFICIENT_INVENTORY",
            ExchangeError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            ExchangeError::LedgerInconsistency(_) => "LEDGER_INCONSISTENCY",
        }
    }

    /// HTTP-equivalent status code for transport layers.
    pub fn status(&self) -> u16 {
        match self {
            ExchangeError::UserNotFound(_)
            | ExchangeError::SymbolNotFound(_)
            | ExchangeError::OrderNotFound(_) => 404,
            ExchangeError::SymbolExists(_) => 409,
            _ => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExchangeError::InsufficientCash {
            required: Decimal::from(950),
            available: Decimal::from(100),
        };
        assert!(err.to_string().contains("950"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ExchangeError::OrderNotFound("x".into()).kind(),
            "ORDER_NOT_FOUND"
        );
        assert_eq!(
            ExchangeError::LedgerInconsistency("x".into()).kind(),
            "LEDGER_INCONSISTENCY"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ExchangeError::SymbolExists("s".into()).status(), 409);
        assert_eq!(ExchangeError::SymbolNotFound("s".into()).status(), 404);
        assert_eq!(ExchangeError::InvalidInput("q".into()).status(), 400);
    }
}
