use crate::engine::{ClassifierKind, DEFAULT_THRESHOLD_HOURS};
use crate::orchestration::Verbosity;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub hyperliquid_api_url: String,
    pub address_list_path: String,
    pub blacklist_path: Option<String>,
    pub threshold_hours: f64,
    pub max_requests_per_second: u32,
    pub retry_max_elapsed_secs: u64,
    pub request_timeout_secs: u64,
    pub scan_concurrency: usize,
    pub verbosity: Verbosity,
    pub classifier: ClassifierKind,
    pub export_csv_path: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
    expected: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), expected.to_string()))
}

fn optional_path(env_map: &HashMap<String, String>, key: &str) -> Option<String> {
    env_map
        .get(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let hyperliquid_api_url = env_map
            .get("HYPERLIQUID_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://api.hyperliquid.xyz".to_string());

        let address_list_path = optional_path(&env_map, "ADDRESS_LIST_PATH")
            .ok_or_else(|| ConfigError::MissingEnv("ADDRESS_LIST_PATH".to_string()))?;

        let blacklist_path = optional_path(&env_map, "BLACKLIST_PATH");

        let threshold_hours: f64 = parse_or(
            &env_map,
            "HFT_THRESHOLD_HOURS",
            &DEFAULT_THRESHOLD_HOURS.to_string(),
            "must be a positive number of hours",
        )?;
        if !threshold_hours.is_finite() || threshold_hours <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "HFT_THRESHOLD_HOURS".to_string(),
                "must be a positive number of hours".to_string(),
            ));
        }

        let max_requests_per_second: u32 = parse_or(
            &env_map,
            "MAX_REQUESTS_PER_SECOND",
            "2",
            "must be a positive u32",
        )?;
        if max_requests_per_second == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_REQUESTS_PER_SECOND".to_string(),
                "must be a positive u32".to_string(),
            ));
        }

        let retry_max_elapsed_secs =
            parse_or(&env_map, "RETRY_MAX_ELAPSED_SECS", "30", "must be a valid u64")?;

        let request_timeout_secs: u64 =
            parse_or(&env_map, "REQUEST_TIMEOUT_SECS", "10", "must be a positive u64")?;
        if request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "REQUEST_TIMEOUT_SECS".to_string(),
                "must be a positive u64".to_string(),
            ));
        }

        let scan_concurrency: usize =
            parse_or(&env_map, "SCAN_CONCURRENCY", "1", "must be a positive integer")?;
        if scan_concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "SCAN_CONCURRENCY".to_string(),
                "must be a positive integer".to_string(),
            ));
        }

        let verbosity = match env_map.get("REPORT_VERBOSITY") {
            Some(value) => value.parse::<Verbosity>().map_err(|_| {
                ConfigError::InvalidValue(
                    "REPORT_VERBOSITY".to_string(),
                    format!("must be quiet, normal, or verbose, got {}", value),
                )
            })?,
            None => Verbosity::default(),
        };

        let classifier = match env_map.get("MARKET_CLASSIFIER") {
            Some(value) => value.parse::<ClassifierKind>().map_err(|_| {
                ConfigError::InvalidValue(
                    "MARKET_CLASSIFIER".to_string(),
                    format!("must be direction or symbol, got {}", value),
                )
            })?,
            None => ClassifierKind::default(),
        };

        let export_csv_path = optional_path(&env_map, "EXPORT_CSV_PATH");

        Ok(Config {
            hyperliquid_api_url,
            address_list_path,
            blacklist_path,
            threshold_hours,
            max_requests_per_second,
            retry_max_elapsed_secs,
            request_timeout_secs,
            scan_concurrency,
            verbosity,
            classifier,
            export_csv_path,
        })
    }
}
