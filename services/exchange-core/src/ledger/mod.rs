//! Balance-keeping registers
//!
//! The cash and inventory ledgers are pure data: the matching engine
//! drives them, and every mutation either succeeds completely or reports
//! an error without touching state.

pub mod cash;
pub mod inventory;

pub use cash::{CashBalanceView, CashLedger};
pub use inventory::{HoldingView, InventoryLedger, InventoryView, PositionView};
