//! Data source abstraction for fetching a user's fills from the exchange.

use crate::domain::RawFill;
use async_trait::async_trait;
use std::fmt;

pub mod hyperliquid;
pub mod mock;
pub mod rate_limit;

pub use hyperliquid::HyperliquidDataSource;
pub use mock::MockDataSource;
pub use rate_limit::RateLimiter;

/// Data source trait for fetching fills.
///
/// Implementations own retry/backoff and rate limiting.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch every fill the exchange reports for a user.
    ///
    /// # Arguments
    /// * `user` - User address
    ///
    /// # Returns
    /// Fills in whatever order the exchange returned them. A payload that is
    /// not an array, or any entry missing a required field, is a `ParseError`.
    async fn fetch_user_fills(&self, user: &str) -> Result<Vec<RawFill>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    HttpError { status: u16, message: String },
    /// Parsing error (invalid JSON or malformed response)
    ParseError(String),
    /// Rate limit exceeded after retries
    RateLimited,
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DataSourceError::HttpError { status, message } => {
                write!(f, "HTTP error {}: {}", status, message)
            }
            DataSourceError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DataSourceError::RateLimited => write!(f, "Rate limited"),
        }
    }
}

impl std::error::Error for DataSourceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasource_error_display() {
        let err = DataSourceError::NetworkError("connection timeout".to_string());
        assert_eq!(err.to_string(), "Network error: connection timeout");

        let err = DataSourceError::HttpError {
            status: 429,
            message: "Too many requests".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error 429: Too many requests");

        let err = DataSourceError::ParseError("invalid JSON".to_string());
        assert_eq!(err.to_string(), "Parse error: invalid JSON");

        let err = DataSourceError::RateLimited;
        assert_eq!(err.to_string(), "Rate limited");
    }
}
