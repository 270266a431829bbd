//! Loaders for the candidate address document and the blacklist file.

use crate::domain::Address;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid address list {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct CandidateDocument {
    #[serde(default)]
    data: CandidateData,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateData {
    #[serde(default)]
    trades: Vec<CandidateTrade>,
}

#[derive(Debug, Deserialize)]
struct CandidateTrade {
    #[serde(default)]
    address: Option<String>,
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Extract `data.trades[].address` from a JSON document.
///
/// Entries without an address are logged and skipped; duplicates keep the
/// first occurrence.
pub fn parse_candidates(json: &str) -> Result<Vec<Address>, serde_json::Error> {
    let document: CandidateDocument = serde_json::from_str(json)?;

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for (index, trade) in document.data.trades.into_iter().enumerate() {
        match trade.address.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let address = Address::new(raw);
                if seen.insert(address.clone()) {
                    candidates.push(address);
                }
            }
            _ => warn!("Address is empty for trade #{}", index),
        }
    }
    Ok(candidates)
}

pub fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<Address>, InputError> {
    let path = path.as_ref();
    let content = read(path)?;
    parse_candidates(&content).map_err(|source| InputError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// One address per line; blank lines and `#` comments are ignored.
pub fn parse_blacklist(content: &str) -> HashSet<Address> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Address::new)
        .collect()
}

pub fn load_blacklist(path: impl AsRef<Path>) -> Result<HashSet<Address>, InputError> {
    Ok(parse_blacklist(&read(path.as_ref())?))
}
