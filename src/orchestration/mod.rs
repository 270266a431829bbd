//! Per-address analysis and the batch scan driving it.

pub mod analyzer;
pub mod ingest;
pub mod scanner;

pub use analyzer::{AddressAnalysis, HoldingTimeAnalyzer, Verbosity};
pub use ingest::{IngestionError, IngestionResult, Ingestor};
pub use scanner::{ScanFailure, ScanOutcome, Scanner};
