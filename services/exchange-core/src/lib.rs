//! Exchange Core Service
//!
//! Continuous double-auction matching engine for a pair of complementary
//! outcome tokens per market symbol, with the balance-keeping system that
//! guarantees cash and inventory conservation across placement, matching,
//! cancellation, and minting.
//!
//! **Key invariants:**
//! - Cash and inventory are conserved across every match; only onramp,
//!   minting, and sweep settlement move value in or out of the ledgers.
//! - A resting buy reserves its full notional; a resting sell reserves
//!   its tokens. Trades consume reservations, cancels release them.
//! - Deterministic matching: identical inputs produce identical trade
//!   sequences (ordered price levels, insertion-ordered makers).
//! - A failing write leaves all ledgers and the book unchanged.
//!
//! Leaf dependency order: ledgers (pure data) → book (pure data) →
//! matching (transforms the above) → engine (coordination, locking,
//! events).

pub mod book;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod matching;
pub mod outbound;
pub mod seed;

pub use engine::{CancelReceipt, Exchange, ExchangeConfig, MintReceipt, PlaceOutcome};
pub use events::{ExchangeEvent, OrderKind};
pub use outbound::{spawn_fanout, EventOutbox, OutboxConfig};
pub use seed::SEED_SYMBOL;
