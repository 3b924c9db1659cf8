//! Matching passes
//!
//! The taker pass fills an incoming buy against resting asks; the
//! book-sweep pairs YES and NO buyers whose combined bids cover the face
//! value and settles them by minting.

pub mod crossing;
pub mod sweep;
pub mod taker;

pub use sweep::{run_book_sweep, SweepTrade};
pub use taker::{match_buy, TakerFill};
