use crate::datasource::{DataSource, DataSourceError};
use crate::domain::{sort_fills_chronological, Address, FillRecord, MarketKind};
use crate::engine::MarketClassifier;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Fetches a user's fills and normalizes them for matching.
#[derive(Debug, Clone)]
pub struct Ingestor {
    datasource: Arc<dyn DataSource>,
    classifier: Arc<dyn MarketClassifier>,
}

impl Ingestor {
    pub fn new(datasource: Arc<dyn DataSource>, classifier: Arc<dyn MarketClassifier>) -> Self {
        Self {
            datasource,
            classifier,
        }
    }

    /// Fetch, classify and chronologically sort every fill for `user`.
    ///
    /// One remote call per invocation.
    pub async fn ingest(&self, user: &Address) -> Result<IngestionResult, IngestionError> {
        let raw_fills = self.datasource.fetch_user_fills(user.as_str()).await?;

        let mut fills: Vec<FillRecord> = raw_fills
            .into_iter()
            .map(|raw| {
                let market_kind = self.classifier.classify(&raw);
                FillRecord::from_raw(user, raw, market_kind)
            })
            .collect();
        sort_fills_chronological(&mut fills);

        let spot_fills = fills
            .iter()
            .filter(|f| f.market_kind == MarketKind::Spot)
            .count();
        let contract_fills = fills.len() - spot_fills;

        info!(
            "Fetched {} fills for {} ({} contract, {} spot)",
            fills.len(),
            user,
            contract_fills,
            spot_fills
        );

        Ok(IngestionResult { fills })
    }
}

#[derive(Debug)]
pub struct IngestionResult {
    /// Sorted by time, ties in fetch order.
    pub fills: Vec<FillRecord>,
}

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}
