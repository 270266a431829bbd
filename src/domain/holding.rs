//! Lots and the holding-time samples produced by matching closes against them.

use crate::domain::{Coin, Decimal, MarketKind, TimeMs};
use serde::{Deserialize, Serialize};

/// An open position slice created by an opening fill.
///
/// `size` is the remaining, not-yet-closed quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub coin: Coin,
    pub market_kind: MarketKind,
    pub size: Decimal,
    pub opened_at: TimeMs,
    pub open_px: Decimal,
    pub open_fill_key: String,
}

/// One close matched against one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingSample {
    pub coin: Coin,
    pub market_kind: MarketKind,
    pub duration_hours: f64,
    pub matched_size: Decimal,
    pub opened_at: TimeMs,
    pub closed_at: TimeMs,
    pub open_fill_key: String,
    pub close_fill_key: String,
}

/// Close quantity that found no open lot to consume.
///
/// Typically a position opened before the fetched history begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedClose {
    pub coin: Coin,
    pub market_kind: MarketKind,
    pub size: Decimal,
    pub time_ms: TimeMs,
    pub close_fill_key: String,
}
