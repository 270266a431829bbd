use crate::domain::{
    Coin, Decimal, FillRecord, FillSide, HoldingSample, Lot, MarketKind, UnmatchedClose,
};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Everything produced by one matching pass.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub samples: Vec<HoldingSample>,
    /// Lots still holding size after the last fill, oldest first per queue.
    pub open_lots: Vec<Lot>,
    pub unmatched: Vec<UnmatchedClose>,
}

/// FIFO matcher of closing fills against open lots.
///
/// One queue per (coin, market kind). Fills must be fed in chronological
/// order; see [`crate::domain::sort_fills_chronological`].
pub struct LotMatcher {
    queues: HashMap<(Coin, MarketKind), VecDeque<Lot>>,
    // First-seen order of queue keys, so open lots come out deterministically.
    queue_order: Vec<(Coin, MarketKind)>,

    samples: Vec<HoldingSample>,
    unmatched: Vec<UnmatchedClose>,
}

impl LotMatcher {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
            queue_order: Vec::new(),
            samples: Vec::new(),
            unmatched: Vec::new(),
        }
    }

    /// Match a full sequence of already-sorted fills.
    pub fn match_fills<'a, I>(fills: I) -> MatchOutcome
    where
        I: IntoIterator<Item = &'a FillRecord>,
    {
        let mut matcher = Self::new();
        for fill in fills {
            matcher.process_fill(fill);
        }
        matcher.into_outcome()
    }

    /// Process a single fill. Zero-size fills are ignored.
    pub fn process_fill(&mut self, fill: &FillRecord) {
        if fill.sz.is_zero() {
            return;
        }
        match fill.side {
            FillSide::Open => self.handle_open(fill),
            FillSide::Close => self.handle_close(fill),
        }
    }

    fn queue_mut(&mut self, coin: &Coin, market_kind: MarketKind) -> &mut VecDeque<Lot> {
        let key = (coin.clone(), market_kind);
        if !self.queues.contains_key(&key) {
            self.queue_order.push(key.clone());
        }
        self.queues.entry(key).or_default()
    }

    fn handle_open(&mut self, fill: &FillRecord) {
        let lot = Lot {
            coin: fill.coin.clone(),
            market_kind: fill.market_kind,
            size: fill.sz,
            opened_at: fill.time_ms,
            open_px: fill.px,
            open_fill_key: fill.fill_key().to_string(),
        };
        self.queue_mut(&fill.coin, fill.market_kind).push_back(lot);
    }

    fn handle_close(&mut self, fill: &FillRecord) {
        let mut remaining = fill.sz;
        let mut emitted = Vec::new();

        let queue = self.queue_mut(&fill.coin, fill.market_kind);
        while remaining.is_positive() {
            let Some(lot) = queue.front_mut() else {
                break;
            };

            let consumed = lot.size.min(remaining);
            emitted.push(HoldingSample {
                coin: fill.coin.clone(),
                market_kind: fill.market_kind,
                duration_hours: fill.time_ms.hours_since(lot.opened_at),
                matched_size: consumed,
                opened_at: lot.opened_at,
                closed_at: fill.time_ms,
                open_fill_key: lot.open_fill_key.clone(),
                close_fill_key: fill.fill_key().to_string(),
            });

            lot.size -= consumed;
            remaining -= consumed;

            if lot.size.is_zero() {
                queue.pop_front();
            }
        }

        self.samples.extend(emitted);

        if remaining.is_positive() {
            debug!(
                "Close {} on {} ({}) has {} with no open lot; discarding",
                fill.fill_key(),
                fill.coin,
                fill.market_kind,
                remaining
            );
            self.unmatched.push(UnmatchedClose {
                coin: fill.coin.clone(),
                market_kind: fill.market_kind,
                size: remaining,
                time_ms: fill.time_ms,
                close_fill_key: fill.fill_key().to_string(),
            });
        }
    }

    /// Lots currently open for a coin and market kind, oldest first.
    pub fn open_lots(&self, coin: &Coin, market_kind: MarketKind) -> impl Iterator<Item = &Lot> {
        self.queues
            .get(&(coin.clone(), market_kind))
            .into_iter()
            .flat_map(|queue| queue.iter())
    }

    /// Total remaining size across every open lot.
    pub fn open_size(&self) -> Decimal {
        self.queues.values().flatten().map(|lot| lot.size).sum()
    }

    /// Get the accumulated outputs.
    pub fn into_outcome(mut self) -> MatchOutcome {
        let mut open_lots = Vec::new();
        for key in &self.queue_order {
            if let Some(queue) = self.queues.remove(key) {
                open_lots.extend(queue);
            }
        }
        MatchOutcome {
            samples: self.samples,
            open_lots,
            unmatched: self.unmatched,
        }
    }
}

impl Default for LotMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, RawFill, TimeMs};

    fn fill(coin: &str, dir: &str, sz: &str, time_ms: i64, tid: i64) -> FillRecord {
        let raw = RawFill {
            coin: Coin::new(coin),
            dir: dir.to_string(),
            sz: Decimal::from_str_canonical(sz).unwrap(),
            px: Decimal::from_str_canonical("100").unwrap(),
            time_ms: TimeMs::new(time_ms),
            tid: Some(tid),
            oid: None,
        };
        FillRecord::from_raw(&Address::new("0x1"), raw, MarketKind::Contract)
    }

    #[test]
    fn test_zero_size_fill_is_ignored() {
        let mut matcher = LotMatcher::new();
        matcher.process_fill(&fill("BTC", "Open Long", "0", 0, 1));
        assert!(matcher.open_size().is_zero());
        let outcome = matcher.into_outcome();
        assert!(outcome.open_lots.is_empty());
    }

    #[test]
    fn test_coins_have_independent_queues() {
        let fills = vec![
            fill("BTC", "Open Long", "1", 0, 1),
            fill("ETH", "Close Long", "1", 3_600_000, 2),
        ];
        let outcome = LotMatcher::match_fills(&fills);

        assert!(outcome.samples.is_empty());
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].coin, Coin::new("ETH"));
        assert_eq!(outcome.open_lots.len(), 1);
        assert_eq!(outcome.open_lots[0].coin, Coin::new("BTC"));
    }

    #[test]
    fn test_open_lots_view() {
        let mut matcher = LotMatcher::new();
        matcher.process_fill(&fill("BTC", "Open Long", "2", 0, 1));
        matcher.process_fill(&fill("BTC", "Open Long", "3", 10, 2));
        matcher.process_fill(&fill("BTC", "Close Long", "1", 20, 3));

        let sizes: Vec<String> = matcher
            .open_lots(&Coin::new("BTC"), MarketKind::Contract)
            .map(|lot| lot.size.to_string())
            .collect();
        assert_eq!(sizes, vec!["1", "3"]);
        assert_eq!(matcher.open_lots(&Coin::new("BTC"), MarketKind::Spot).count(), 0);
    }

    #[test]
    fn test_partial_unmatched_remainder_recorded() {
        let fills = vec![
            fill("BTC", "Open Long", "1", 0, 1),
            fill("BTC", "Close Long", "1.5", 7_200_000, 2),
        ];
        let outcome = LotMatcher::match_fills(&fills);

        assert_eq!(outcome.samples.len(), 1);
        assert_eq!(outcome.samples[0].duration_hours, 2.0);
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.unmatched[0].size.to_string(), "0.5");
        assert_eq!(outcome.unmatched[0].close_fill_key, "tid:2");
    }
}
