//! Domain types for holding-time analysis.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TimeMs, Address, Coin, MarketKind, FillSide
//! - Raw and normalized fill types
//! - Lots, holding samples and unmatched closes
//! - Stable chronological ordering helper

pub mod decimal;
pub mod fill;
pub mod holding;
pub mod ordering;
pub mod primitives;

pub use decimal::Decimal;
pub use fill::{FillRecord, RawFill};
pub use holding::{HoldingSample, Lot, UnmatchedClose};
pub use ordering::sort_fills_chronological;
pub use primitives::{Address, Coin, FillSide, MarketKind, TimeMs, MS_PER_HOUR};
