use crate::domain::Address;
use crate::orchestration::analyzer::{AddressAnalysis, HoldingTimeAnalyzer};
use crate::orchestration::ingest::IngestionError;
use futures::future;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Batch driver: analyzes every non-blacklisted candidate.
#[derive(Debug, Clone)]
pub struct Scanner {
    analyzer: Arc<HoldingTimeAnalyzer>,
    blacklist: HashSet<Address>,
    concurrency: usize,
}

/// An address whose analysis failed.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub address: Address,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Flagged addresses, in candidate order.
    pub flagged: Vec<Address>,
    pub analyses: Vec<AddressAnalysis>,
    pub failures: Vec<ScanFailure>,
    pub blacklisted: usize,
    /// Set when shutdown arrived before every eligible address finished.
    pub interrupted: bool,
}

impl ScanOutcome {
    fn record(&mut self, address: &Address, result: Result<AddressAnalysis, IngestionError>) {
        match result {
            Ok(analysis) => {
                if let Some(flagged) = analysis.flagged_address() {
                    info!("Flagged {}", flagged);
                    self.flagged.push(flagged.clone());
                }
                self.analyses.push(analysis);
            }
            Err(e) => {
                warn!("Failed to analyze {}: {}", address, e);
                self.failures.push(ScanFailure {
                    address: address.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

impl Scanner {
    pub fn new(analyzer: Arc<HoldingTimeAnalyzer>, blacklist: HashSet<Address>) -> Self {
        Self {
            analyzer,
            blacklist,
            concurrency: 1,
        }
    }

    /// Analyze up to `concurrency` addresses at once. Output order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn is_blacklisted(&self, address: &Address) -> bool {
        self.blacklist.contains(address)
    }

    /// Run the batch. A failing address is logged and skipped.
    pub async fn scan(&self, candidates: &[Address]) -> ScanOutcome {
        self.scan_until(candidates, future::pending::<()>()).await
    }

    /// Like [`Self::scan`], but stops taking results once `shutdown`
    /// resolves. Addresses finished by then are kept in the outcome.
    pub async fn scan_until<F: Future>(&self, candidates: &[Address], shutdown: F) -> ScanOutcome {
        let (eligible, excluded): (Vec<&Address>, Vec<&Address>) = candidates
            .iter()
            .partition(|address| !self.is_blacklisted(address));

        for address in &excluded {
            info!("Skipping blacklisted address {}", address);
        }

        let total = eligible.len();
        let mut outcome = ScanOutcome {
            blacklisted: excluded.len(),
            ..Default::default()
        };

        stream::iter(eligible)
            .map(|address| {
                let analyzer = self.analyzer.clone();
                async move { (address, analyzer.analyze_detailed(address).await) }
            })
            .buffered(self.concurrency)
            .take_until(shutdown)
            .for_each(|(address, result)| {
                outcome.record(address, result);
                future::ready(())
            })
            .await;

        let processed = outcome.analyses.len() + outcome.failures.len();
        if processed < total {
            outcome.interrupted = true;
            warn!("Scan interrupted after {} of {} addresses", processed, total);
        }

        info!(
            "Scan finished: {} analyzed, {} flagged, {} failed, {} blacklisted",
            outcome.analyses.len(),
            outcome.flagged.len(),
            outcome.failures.len(),
            outcome.blacklisted
        );

        outcome
    }
}
