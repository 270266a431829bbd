//! Holding-time statistics over matched samples.

use crate::domain::{Coin, Decimal, HoldingSample, MarketKind};
use serde::Serialize;

/// Which market kinds a statistic pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketView {
    Contract,
    Spot,
    Combined,
}

impl MarketView {
    pub const ALL: [MarketView; 3] = [MarketView::Contract, MarketView::Spot, MarketView::Combined];

    pub fn includes(&self, market_kind: MarketKind) -> bool {
        match self {
            MarketView::Contract => market_kind == MarketKind::Contract,
            MarketView::Spot => market_kind == MarketKind::Spot,
            MarketView::Combined => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketView::Contract => "Contract",
            MarketView::Spot => "Spot",
            MarketView::Combined => "Combined",
        }
    }
}

/// Statistics for one coin on one market kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinStatistics {
    pub coin: Coin,
    pub market_kind: MarketKind,
    pub close_count: usize,
    pub simple_avg_hours: f64,
    pub weighted_avg_hours: f64,
    pub min_hours: f64,
    pub max_hours: f64,
    pub total_size: Decimal,
}

/// Statistics pooled over every sample in a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStatistics {
    pub view: MarketView,
    pub close_count: usize,
    pub simple_avg_hours: f64,
    pub weighted_avg_hours: f64,
    pub min_hours: f64,
    pub max_hours: f64,
    pub total_size: Decimal,
}

struct Summary {
    count: usize,
    simple_avg: f64,
    weighted_avg: f64,
    min: f64,
    max: f64,
    total_size: Decimal,
}

/// Reduce samples to a summary; `None` for an empty set.
///
/// The size weights are the exact decimal sizes converted to `f64`.
fn summarize<'a>(samples: impl Iterator<Item = &'a HoldingSample>) -> Option<Summary> {
    let mut count = 0usize;
    let mut sum_hours = 0.0;
    let mut sum_weighted = 0.0;
    let mut sum_weights = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut total_size = Decimal::zero();

    for sample in samples {
        let weight = sample.matched_size.to_f64();
        count += 1;
        sum_hours += sample.duration_hours;
        sum_weighted += sample.duration_hours * weight;
        sum_weights += weight;
        min = min.min(sample.duration_hours);
        max = max.max(sample.duration_hours);
        total_size += sample.matched_size;
    }

    if count == 0 {
        return None;
    }

    Some(Summary {
        count,
        simple_avg: sum_hours / count as f64,
        weighted_avg: sum_weighted / sum_weights,
        min,
        max,
        total_size,
    })
}

/// Aggregator over the holding samples of one address.
#[derive(Debug, Clone, Default)]
pub struct HoldingStatistics {
    samples: Vec<HoldingSample>,
}

impl HoldingStatistics {
    pub fn new(samples: Vec<HoldingSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[HoldingSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// (coin, market kind) pairs with at least one sample in `view`,
    /// in order of first close.
    pub fn instruments(&self, view: MarketView) -> Vec<(Coin, MarketKind)> {
        let mut seen: Vec<(Coin, MarketKind)> = Vec::new();
        for sample in self.samples.iter().filter(|s| view.includes(s.market_kind)) {
            if !seen
                .iter()
                .any(|(coin, kind)| *coin == sample.coin && *kind == sample.market_kind)
            {
                seen.push((sample.coin.clone(), sample.market_kind));
            }
        }
        seen
    }

    /// Statistics for one coin on one market kind, `None` without samples.
    pub fn coin_statistics(&self, coin: &Coin, market_kind: MarketKind) -> Option<CoinStatistics> {
        let summary = summarize(
            self.samples
                .iter()
                .filter(|s| s.coin == *coin && s.market_kind == market_kind),
        )?;

        Some(CoinStatistics {
            coin: coin.clone(),
            market_kind,
            close_count: summary.count,
            simple_avg_hours: summary.simple_avg,
            weighted_avg_hours: summary.weighted_avg,
            min_hours: summary.min,
            max_hours: summary.max,
            total_size: summary.total_size,
        })
    }

    /// Pooled statistics for a view, `None` without samples.
    pub fn overall(&self, view: MarketView) -> Option<OverallStatistics> {
        let summary = summarize(self.samples.iter().filter(|s| view.includes(s.market_kind)))?;

        Some(OverallStatistics {
            view,
            close_count: summary.count,
            simple_avg_hours: summary.simple_avg,
            weighted_avg_hours: summary.weighted_avg,
            min_hours: summary.min,
            max_hours: summary.max,
            total_size: summary.total_size,
        })
    }
}
