//! Event records emitted on the outbound channel
//!
//! Value-typed descriptions of state changes, serialized with the wire
//! field names listeners expect. Numeric fields serialize as strings to
//! preserve decimal precision. Delivery is fire-and-forget; the ledger is
//! the source of truth.

use serde::{Deserialize, Serialize};
use types::ids::{SymbolId, UserId};
use types::numeric::{Price, Quantity};
use types::outcome::Outcome;

use crate::ledger::CashBalanceView;

/// Whether an order event describes a buy or a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Buy,
    Sell,
}

/// A state change of the exchange core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum ExchangeEvent {
    #[serde(rename = "dataReset")]
    DataReset,

    #[serde(rename = "userCreated")]
    UserCreated {
        #[serde(rename = "userId")]
        user_id: UserId,
    },

    #[serde(rename = "symbolCreated")]
    SymbolCreated {
        #[serde(rename = "symbolName")]
        symbol_name: SymbolId,
    },

    #[serde(rename = "balanceUpdated")]
    BalanceUpdated {
        #[serde(rename = "userId")]
        user_id: UserId,
        balance: CashBalanceView,
    },

    #[serde(rename = "orderPlaced")]
    OrderPlaced {
        #[serde(rename = "type")]
        kind: OrderKind,
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "stockSymbol")]
        stock_symbol: SymbolId,
        quantity: Quantity,
        price: Price,
        #[serde(rename = "stockType")]
        stock_type: Outcome,
    },

    #[serde(rename = "orderCanceled")]
    OrderCanceled {
        #[serde(rename = "type")]
        kind: OrderKind,
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "stockSymbol")]
        stock_symbol: SymbolId,
        quantity: Quantity,
        price: Price,
        #[serde(rename = "stockType")]
        stock_type: Outcome,
    },

    #[serde(rename = "tokensMinted")]
    TokensMinted {
        #[serde(rename = "userId")]
        user_id: UserId,
        #[serde(rename = "stockSymbol")]
        stock_symbol: SymbolId,
        quantity: Quantity,
        price: Price,
    },
}

impl ExchangeEvent {
    /// Event type as a string label for logging.
    pub fn event_type_label(&self) -> &'static str {
        match self {
            ExchangeEvent::DataReset => "dataReset",
            ExchangeEvent::UserCreated { .. } => "userCreated",
            ExchangeEvent::SymbolCreated { .. } => "symbolCreated",
            ExchangeEvent::BalanceUpdated { .. } => "balanceUpdated",
            ExchangeEvent::OrderPlaced { .. } => "orderPlaced",
            ExchangeEvent::OrderCanceled { .. } => "orderCanceled",
            ExchangeEvent::TokensMinted { .. } => "tokensMinted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_placed_wire_format() {
        let event = ExchangeEvent::OrderPlaced {
            kind: OrderKind::Buy,
            user_id: UserId::new("user3"),
            stock_symbol: SymbolId::new("BTC_USDT_10_Oct_2024_9_30"),
            quantity: Quantity::new(100),
            price: Price::from_str("9.5").unwrap(),
            stock_type: Outcome::Yes,
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "orderPlaced");
        assert_eq!(json["type"], "buy");
        assert_eq!(json["userId"], "user3");
        assert_eq!(json["stockSymbol"], "BTC_USDT_10_Oct_2024_9_30");
        assert_eq!(json["quantity"], "100");
        assert_eq!(json["price"], "9.5");
        assert_eq!(json["stockType"], "yes");
    }

    #[test]
    fn test_balance_updated_serializes_strings() {
        let event = ExchangeEvent::BalanceUpdated {
            user_id: UserId::new("user1"),
            balance: CashBalanceView {
                free: dec!(9950),
                locked: dec!(0),
            },
        };

        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "balanceUpdated");
        assert_eq!(json["balance"]["free"], "9950");
    }

    #[test]
    fn test_data_reset_tag_only() {
        let json = serde_json::to_string(&ExchangeEvent::DataReset).unwrap();
        assert_eq!(json, "{\"event\":\"dataReset\"}");
    }

    #[test]
    fn test_event_type_label() {
        let event = ExchangeEvent::TokensMinted {
            user_id: UserId::new("user1"),
            stock_symbol: SymbolId::new("M"),
            quantity: Quantity::new(10),
            price: Price::from_str("5").unwrap(),
        };
        assert_eq!(event.event_type_label(), "tokensMinted");
    }
}
