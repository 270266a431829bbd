use crate::datasource::DataSource;
use crate::domain::{Address, FillRecord, Lot, UnmatchedClose};
use crate::engine::{
    is_high_frequency, HoldingStatistics, LotMatcher, MarketClassifier, MarketView,
    OverallStatistics, DEFAULT_THRESHOLD_HOURS,
};
use crate::orchestration::ingest::{IngestionError, Ingestor};
use crate::report;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// How much the analyzer prints per address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No reports.
    Quiet,
    /// Full report when flagged, one summary line otherwise.
    #[default]
    Normal,
    /// Full report for every address.
    Verbose,
}

impl FromStr for Verbosity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Verbosity::Quiet),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            _ => Err(()),
        }
    }
}

/// Result of analyzing one address.
#[derive(Debug, Clone)]
pub struct AddressAnalysis {
    pub address: Address,
    pub contract_fills: usize,
    pub spot_fills: usize,
    pub statistics: HoldingStatistics,
    pub open_lots: Vec<Lot>,
    pub unmatched: Vec<UnmatchedClose>,
    pub threshold_hours: f64,
    pub high_frequency: bool,
}

impl AddressAnalysis {
    /// Match and aggregate already-sorted fills.
    pub fn from_fills(
        address: Address,
        fills: &[FillRecord],
        threshold_hours: f64,
    ) -> AddressAnalysis {
        let outcome = LotMatcher::match_fills(fills);
        let statistics = HoldingStatistics::new(outcome.samples);
        let high_frequency =
            is_high_frequency(statistics.overall(MarketView::Combined).as_ref(), threshold_hours);
        let spot_fills = fills.iter().filter(|f| f.market_kind.is_spot()).count();

        AddressAnalysis {
            address,
            contract_fills: fills.len() - spot_fills,
            spot_fills,
            statistics,
            open_lots: outcome.open_lots,
            unmatched: outcome.unmatched,
            threshold_hours,
            high_frequency,
        }
    }

    pub fn fills_fetched(&self) -> usize {
        self.contract_fills + self.spot_fills
    }

    pub fn combined(&self) -> Option<OverallStatistics> {
        self.statistics.overall(MarketView::Combined)
    }

    /// The address when flagged high-frequency.
    pub fn flagged_address(&self) -> Option<&Address> {
        self.high_frequency.then_some(&self.address)
    }
}

/// Runs ingestion, matching, aggregation and classification for one address.
#[derive(Debug, Clone)]
pub struct HoldingTimeAnalyzer {
    ingestor: Ingestor,
    threshold_hours: f64,
    verbosity: Verbosity,
}

impl HoldingTimeAnalyzer {
    pub fn new(datasource: Arc<dyn DataSource>, classifier: Arc<dyn MarketClassifier>) -> Self {
        Self {
            ingestor: Ingestor::new(datasource, classifier),
            threshold_hours: DEFAULT_THRESHOLD_HOURS,
            verbosity: Verbosity::default(),
        }
    }

    pub fn with_threshold_hours(mut self, threshold_hours: f64) -> Self {
        self.threshold_hours = threshold_hours;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn threshold_hours(&self) -> f64 {
        self.threshold_hours
    }

    /// Analyze an address, print its report, and return it if flagged.
    pub async fn analyze(&self, address: &Address) -> Result<Option<Address>, IngestionError> {
        let analysis = self.analyze_detailed(address).await?;
        Ok(analysis.flagged_address().cloned())
    }

    /// Like [`Self::analyze`] but returns the full analysis.
    pub async fn analyze_detailed(
        &self,
        address: &Address,
    ) -> Result<AddressAnalysis, IngestionError> {
        info!("Analyzing {}", address);
        let ingested = self.ingestor.ingest(address).await?;
        let analysis =
            AddressAnalysis::from_fills(address.clone(), &ingested.fills, self.threshold_hours);

        if !analysis.unmatched.is_empty() {
            warn!(
                "{}: {} close(s) had size with no open lot in the fetched history",
                address,
                analysis.unmatched.len()
            );
        }

        self.emit_report(&analysis);
        Ok(analysis)
    }

    fn emit_report(&self, analysis: &AddressAnalysis) {
        match self.verbosity {
            Verbosity::Quiet => {}
            Verbosity::Normal if !analysis.high_frequency => {
                if let Some(line) = report::summary_line(analysis) {
                    println!("{}", line);
                }
            }
            Verbosity::Normal | Verbosity::Verbose => {
                println!("{}", report::render_report(analysis));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_str() {
        assert_eq!("quiet".parse(), Ok(Verbosity::Quiet));
        assert_eq!("NORMAL".parse(), Ok(Verbosity::Normal));
        assert_eq!("verbose".parse(), Ok(Verbosity::Verbose));
        assert!("loud".parse::<Verbosity>().is_err());
    }

    #[test]
    fn test_empty_fills_not_flagged() {
        let analysis = AddressAnalysis::from_fills(Address::new("0x1"), &[], 1.0);
        assert!(!analysis.high_frequency);
        assert!(analysis.flagged_address().is_none());
        assert!(analysis.combined().is_none());
        assert_eq!(analysis.fills_fetched(), 0);
    }
}
