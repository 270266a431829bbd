//! Pure computation: market classification, FIFO lot matching, statistics.

pub mod classifier;
pub mod lot_matcher;
pub mod stats;

pub use classifier::{ClassifierKind, DirectionClassifier, MarketClassifier, SymbolClassifier};
pub use lot_matcher::{LotMatcher, MatchOutcome};
pub use stats::{CoinStatistics, HoldingStatistics, MarketView, OverallStatistics};

/// Default classification threshold, in hours.
pub const DEFAULT_THRESHOLD_HOURS: f64 = 1.0;

/// Whether pooled statistics mark an address as high-frequency.
///
/// No samples means no verdict, so `None` is never flagged. The threshold is
/// inclusive.
pub fn is_high_frequency(combined: Option<&OverallStatistics>, threshold_hours: f64) -> bool {
    combined
        .map(|stats| stats.close_count > 0 && stats.simple_avg_hours <= threshold_hours)
        .unwrap_or(false)
}
