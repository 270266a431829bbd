//! Domain primitives: TimeMs, Address, Coin, MarketKind, FillSide.

use serde::{Deserialize, Serialize};

/// Milliseconds in one hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Get the underlying milliseconds value.
    pub fn as_ms(&self) -> i64 {
        self.0
    }

    /// Elapsed time from `earlier` to `self`, in fractional hours.
    ///
    /// Exact `f64` division; callers round only for display. Saturates on
    /// timestamps too far apart for `i64`.
    pub fn hours_since(&self, earlier: TimeMs) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / MS_PER_HOUR
    }

    /// UTC rendering for reports, falling back to the raw value when out of range.
    pub fn to_utc_string(&self) -> String {
        chrono::DateTime::<chrono::Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| format!("{}ms", self.0))
    }
}

/// Wallet address (hex string), stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address, normalizing whitespace and hex case.
    pub fn new(addr: impl AsRef<str>) -> Self {
        Address(addr.as_ref().trim().to_ascii_lowercase())
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coin/asset symbol (e.g., "BTC", "@107", "PURR/USDC").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin(pub String);

impl Coin {
    /// Create a Coin from a string.
    pub fn new(coin: impl Into<String>) -> Self {
        Coin(coin.into())
    }

    /// Get the coin as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which market a fill traded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    /// Perpetual/derivative contract.
    Contract,
    /// Spot market.
    Spot,
}

impl MarketKind {
    pub fn is_spot(&self) -> bool {
        matches!(self, MarketKind::Spot)
    }
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketKind::Contract => write!(f, "contract"),
            MarketKind::Spot => write!(f, "spot"),
        }
    }
}

/// Whether a fill opens (adds to) or closes (reduces) a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillSide {
    Open,
    Close,
}

impl FillSide {
    /// Derive the side from the exchange's direction string.
    ///
    /// Anything mentioning "Open" opens. Everything else closes, including
    /// spot "Buy"/"Sell", flips ("Long > Short") and liquidations.
    pub fn from_direction(dir: &str) -> Self {
        if dir.contains("Open") {
            FillSide::Open
        } else {
            FillSide::Close
        }
    }
}

impl std::fmt::Display for FillSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FillSide::Open => write!(f, "open"),
            FillSide::Close => write!(f, "close"),
        }
    }
}
