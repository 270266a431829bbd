//! Mock data source for testing without network calls.

use super::{DataSource, DataSourceError};
use crate::domain::{Address, RawFill};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock data source that returns predefined fills per user.
///
/// Records every user it was asked about.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    fills: HashMap<Address, Vec<RawFill>>,
    failures: HashMap<Address, DataSourceError>,
    requests: Arc<Mutex<Vec<Address>>>,
    delay: Option<Duration>,
}

impl MockDataSource {
    /// Create a new mock data source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fill for a user.
    pub fn with_fill(mut self, user: &str, fill: RawFill) -> Self {
        self.fills.entry(Address::new(user)).or_default().push(fill);
        self
    }

    /// Add multiple fills for a user.
    pub fn with_fills(mut self, user: &str, fills: Vec<RawFill>) -> Self {
        self.fills.entry(Address::new(user)).or_default().extend(fills);
        self
    }

    /// Make every fetch for `user` fail with `error`.
    pub fn with_failure(mut self, user: &str, error: DataSourceError) -> Self {
        self.failures.insert(Address::new(user), error);
        self
    }

    /// Sleep for `delay` before answering each fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Users fetched so far, in call order.
    pub fn requested_users(&self) -> Vec<Address> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_user_fills(&self, user: &str) -> Result<Vec<RawFill>, DataSourceError> {
        let user_addr = Address::new(user);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(user_addr.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.failures.get(&user_addr) {
            return Err(error.clone());
        }

        Ok(self.fills.get(&user_addr).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coin, Decimal, TimeMs};

    fn make_test_fill() -> RawFill {
        RawFill {
            coin: Coin::new("BTC"),
            dir: "Open Long".to_string(),
            sz: Decimal::from_str_canonical("1").unwrap(),
            px: Decimal::from_str_canonical("50000").unwrap(),
            time_ms: TimeMs::new(1000),
            tid: Some(1),
            oid: None,
        }
    }

    #[tokio::test]
    async fn test_mock_datasource_fetch_fills() {
        let fill = make_test_fill();
        let mock = MockDataSource::new().with_fill("0x123", fill.clone());
        let fills = mock.fetch_user_fills("0x123").await.unwrap();
        assert_eq!(fills, vec![fill]);
    }

    #[tokio::test]
    async fn test_mock_datasource_unknown_user_is_empty() {
        let mock = MockDataSource::new().with_fill("0x123", make_test_fill());
        let fills = mock.fetch_user_fills("0x456").await.unwrap();
        assert!(fills.is_empty());
    }

    #[tokio::test]
    async fn test_mock_datasource_failure_and_recording() {
        let mock = MockDataSource::new().with_failure("0xbad", DataSourceError::RateLimited);
        assert!(mock.fetch_user_fills("0xBAD").await.is_err());
        assert!(mock.fetch_user_fills("0x123").await.is_ok());
        assert_eq!(
            mock.requested_users(),
            vec![Address::new("0xbad"), Address::new("0x123")]
        );
    }
}
