//! Hyperliquid API client implementation.

use super::{DataSource, DataSourceError, RateLimiter};
use crate::domain::{Coin, Decimal, RawFill, TimeMs};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Hyperliquid data source using the public Info API.
///
/// Clones share one rate limiter.
#[derive(Debug, Clone)]
pub struct HyperliquidDataSource {
    client: Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
    max_elapsed: Duration,
}

impl HyperliquidDataSource {
    /// Create a new Hyperliquid data source.
    ///
    /// `request_timeout` bounds each attempt; `max_elapsed` bounds all
    /// retries of one call.
    pub fn new(
        base_url: String,
        rate_limiter: Arc<RateLimiter>,
        request_timeout: Duration,
        max_elapsed: Duration,
    ) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
            max_elapsed,
        })
    }

    async fn post_info(
        &self,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, DataSourceError> {
        let url = format!("{}/info", self.base_url);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        };

        retry(backoff, || async {
            self.rate_limiter.acquire().await;

            let response = self
                .client
                .post(&url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| {
                    backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
                })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl DataSource for HyperliquidDataSource {
    async fn fetch_user_fills(&self, user: &str) -> Result<Vec<RawFill>, DataSourceError> {
        debug!("Fetching fills for user={}", user);

        let payload = serde_json::json!({
            "aggregateByTime": true,
            "type": "userFills",
            "user": user
        });

        let response = self.post_info(payload).await?;
        parse_user_fills(&response)
    }
}

/// Parse a `userFills` response. Any malformed entry fails the whole payload.
pub fn parse_user_fills(response: &serde_json::Value) -> Result<Vec<RawFill>, DataSourceError> {
    let fills_json = response
        .as_array()
        .ok_or_else(|| DataSourceError::ParseError("Expected array response".to_string()))?;

    fills_json
        .iter()
        .enumerate()
        .map(|(index, fill_json)| {
            parse_fill(fill_json).map_err(|e| match e {
                DataSourceError::ParseError(msg) => {
                    DataSourceError::ParseError(format!("fill #{}: {}", index, msg))
                }
                other => other,
            })
        })
        .collect()
}

fn parse_decimal_field(
    fill_json: &serde_json::Value,
    field: &str,
) -> Result<Decimal, DataSourceError> {
    let value = fill_json
        .get(field)
        .ok_or_else(|| DataSourceError::ParseError(format!("Missing {} field", field)))?;

    // Hyperliquid sends decimals as strings; accept bare numbers too.
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => {
            return Err(DataSourceError::ParseError(format!(
                "Invalid {}: {}",
                field, value
            )))
        }
    };

    Decimal::from_str_canonical(&text)
        .map_err(|e| DataSourceError::ParseError(format!("Invalid {}: {}", field, e)))
}

fn parse_fill(fill_json: &serde_json::Value) -> Result<RawFill, DataSourceError> {
    let coin = fill_json
        .get("coin")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing coin field".to_string()))?;

    let dir = fill_json
        .get("dir")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DataSourceError::ParseError("Missing dir field".to_string()))?;

    let time_ms = fill_json
        .get("time")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| DataSourceError::ParseError("Missing time field".to_string()))?;

    let sz = parse_decimal_field(fill_json, "sz")?;
    let px = parse_decimal_field(fill_json, "px")?;

    let tid = fill_json.get("tid").and_then(|v| v.as_i64());
    let oid = fill_json.get("oid").and_then(|v| v.as_i64());

    Ok(RawFill {
        coin: Coin::new(coin),
        dir: dir.to_string(),
        sz,
        px,
        time_ms: TimeMs::new(time_ms),
        tid,
        oid,
    })
}
