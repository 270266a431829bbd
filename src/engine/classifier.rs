//! Market-kind classification strategies.
//!
//! Neither strategy consults an instrument registry, so both can mislabel.
//! Mislabeled fills flow into the wrong statistics view without any error.

use crate::domain::{MarketKind, RawFill};
use std::fmt;
use std::str::FromStr;

/// Decides whether a raw fill traded on the spot or contract market.
pub trait MarketClassifier: Send + Sync + fmt::Debug {
    fn classify(&self, fill: &RawFill) -> MarketKind;
}

/// Spot iff the direction is exactly "Buy" or "Sell".
///
/// Perp directions read "Open Long", "Close Short", etc.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionClassifier;

impl MarketClassifier for DirectionClassifier {
    fn classify(&self, fill: &RawFill) -> MarketKind {
        match fill.dir.as_str() {
            "Buy" | "Sell" => MarketKind::Spot,
            _ => MarketKind::Contract,
        }
    }
}

/// Spot iff the coin uses a spot symbol: `@<index>` or `BASE/QUOTE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolClassifier;

impl MarketClassifier for SymbolClassifier {
    fn classify(&self, fill: &RawFill) -> MarketKind {
        let coin = fill.coin.as_str();
        if coin.starts_with('@') || coin.contains('/') {
            MarketKind::Spot
        } else {
            MarketKind::Contract
        }
    }
}

/// Configurable choice of classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Direction,
    Symbol,
}

impl ClassifierKind {
    pub fn build(&self) -> std::sync::Arc<dyn MarketClassifier> {
        match self {
            ClassifierKind::Direction => std::sync::Arc::new(DirectionClassifier),
            ClassifierKind::Symbol => std::sync::Arc::new(SymbolClassifier),
        }
    }
}

impl FromStr for ClassifierKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direction" => Ok(ClassifierKind::Direction),
            "symbol" => Ok(ClassifierKind::Symbol),
            _ => Err(()),
        }
    }
}
