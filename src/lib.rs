pub mod addresses;
pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod orchestration;
pub mod report;

pub use config::Config;
pub use datasource::{DataSource, DataSourceError, HyperliquidDataSource, MockDataSource};
pub use domain::{
    Address, Coin, Decimal, FillRecord, FillSide, HoldingSample, Lot, MarketKind, RawFill, TimeMs,
};
pub use engine::{HoldingStatistics, LotMatcher, MarketView};
pub use error::AppError;
pub use orchestration::{AddressAnalysis, HoldingTimeAnalyzer, Scanner};
