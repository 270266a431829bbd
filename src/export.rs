//! CSV export of per-address scan results.

use crate::engine::MarketView;
use crate::orchestration::AddressAnalysis;
use serde::Serialize;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    address: &'a str,
    high_frequency: bool,
    contract_fills: usize,
    spot_fills: usize,
    close_count: usize,
    combined_simple_avg_hours: Option<f64>,
    combined_weighted_avg_hours: Option<f64>,
    contract_simple_avg_hours: Option<f64>,
    spot_simple_avg_hours: Option<f64>,
    open_lots: usize,
    unmatched_closes: usize,
}

impl<'a> From<&'a AddressAnalysis> for ExportRow<'a> {
    fn from(analysis: &'a AddressAnalysis) -> Self {
        let combined = analysis.statistics.overall(MarketView::Combined);
        let simple = |view: MarketView| {
            analysis
                .statistics
                .overall(view)
                .map(|stats| stats.simple_avg_hours)
        };

        ExportRow {
            address: analysis.address.as_str(),
            high_frequency: analysis.high_frequency,
            contract_fills: analysis.contract_fills,
            spot_fills: analysis.spot_fills,
            close_count: combined.as_ref().map(|s| s.close_count).unwrap_or(0),
            combined_simple_avg_hours: combined.as_ref().map(|s| s.simple_avg_hours),
            combined_weighted_avg_hours: combined.as_ref().map(|s| s.weighted_avg_hours),
            contract_simple_avg_hours: simple(MarketView::Contract),
            spot_simple_avg_hours: simple(MarketView::Spot),
            open_lots: analysis.open_lots.len(),
            unmatched_closes: analysis.unmatched.len(),
        }
    }
}

/// Write one row per analysis, with a header.
pub fn write_csv<W: io::Write>(writer: W, analyses: &[AddressAnalysis]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for analysis in analyses {
        csv_writer.serialize(ExportRow::from(analysis))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv(path: impl AsRef<Path>, analyses: &[AddressAnalysis]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(file, analyses)
}
