//! Fill types: the raw entry as the exchange reports it and the normalized record.

use crate::domain::{Address, Coin, Decimal, FillSide, MarketKind, TimeMs};
use serde::{Deserialize, Serialize};

/// A fill as returned by the exchange, before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFill {
    pub coin: Coin,
    /// Direction string, e.g. "Open Long", "Close Short", "Buy".
    pub dir: String,
    /// Size as reported; may be signed.
    pub sz: Decimal,
    pub px: Decimal,
    pub time_ms: TimeMs,
    /// Trade ID (preferred stable key).
    pub tid: Option<i64>,
    pub oid: Option<i64>,
}

/// A normalized fill, tagged with market kind and open/close side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillRecord {
    /// Stable unique identifier for this fill.
    pub fill_key: String,
    pub user: Address,
    pub coin: Coin,
    pub dir: String,
    pub side: FillSide,
    pub market_kind: MarketKind,
    /// Unsigned size.
    pub sz: Decimal,
    pub px: Decimal,
    pub time_ms: TimeMs,
}

impl FillRecord {
    /// Normalize a raw fill for `user`.
    ///
    /// The side comes from the direction string alone; `market_kind` only
    /// picks the queue the fill is matched in.
    pub fn from_raw(user: &Address, raw: RawFill, market_kind: MarketKind) -> Self {
        let side = FillSide::from_direction(&raw.dir);
        let sz = raw.sz.abs();
        let fill_key = Self::compute_fill_key(user, &raw);
        FillRecord {
            fill_key,
            user: user.clone(),
            coin: raw.coin,
            dir: raw.dir,
            side,
            market_kind,
            sz,
            px: raw.px,
            time_ms: raw.time_ms,
        }
    }

    /// Generate a stable unique key for a fill.
    ///
    /// Priority: `tid` (if present) > hash of deterministic fields.
    pub fn compute_fill_key(user: &Address, raw: &RawFill) -> String {
        if let Some(tid) = raw.tid {
            return format!("tid:{}", tid);
        }

        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(user.as_str());
        hasher.update(raw.coin.as_str());
        hasher.update(raw.time_ms.as_ms().to_le_bytes());
        hasher.update(raw.dir.as_bytes());
        hasher.update(raw.px.to_canonical_string());
        hasher.update(raw.sz.to_canonical_string());
        if let Some(oid) = raw.oid {
            hasher.update(oid.to_le_bytes());
        }
        let hash = hasher.finalize();
        format!("hash:{}", hex::encode(&hash[..16]))
    }

    pub fn fill_key(&self) -> &str {
        &self.fill_key
    }

    pub fn is_open(&self) -> bool {
        self.side == FillSide::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(dir: &str, sz: &str, tid: Option<i64>) -> RawFill {
        RawFill {
            coin: Coin::new("BTC"),
            dir: dir.to_string(),
            sz: Decimal::from_str_canonical(sz).unwrap(),
            px: Decimal::from_str_canonical("50000").unwrap(),
            time_ms: TimeMs::new(1000),
            tid,
            oid: Some(7),
        }
    }

    #[test]
    fn test_from_raw_normalizes_side_and_size() {
        let user = Address::new("0xabc");
        let fill =
            FillRecord::from_raw(&user, raw("Open Short", "-1.5", Some(1)), MarketKind::Contract);

        assert_eq!(fill.side, FillSide::Open);
        assert_eq!(fill.sz, Decimal::from_str_canonical("1.5").unwrap());
        assert_eq!(fill.market_kind, MarketKind::Contract);
        assert_eq!(fill.user, user);
        assert!(fill.is_open());
    }

    #[test]
    fn test_from_raw_spot_buy_is_a_close() {
        let user = Address::new("0xabc");
        let fill = FillRecord::from_raw(&user, raw("Buy", "2", Some(1)), MarketKind::Spot);

        assert_eq!(fill.side, FillSide::Close);
        assert_eq!(fill.market_kind, MarketKind::Spot);
    }

    #[test]
    fn test_fill_key_with_tid() {
        let user = Address::new("0xabc");
        assert_eq!(FillRecord::compute_fill_key(&user, &raw("Buy", "1", Some(12345))), "tid:12345");
    }

    #[test]
    fn test_fill_key_without_tid_uses_hash() {
        let user = Address::new("0xabc");
        let key = FillRecord::compute_fill_key(&user, &raw("Buy", "1", None));
        assert!(key.starts_with("hash:"));
        assert_eq!(key.len(), 5 + 32);
    }

    #[test]
    fn test_fill_key_deterministic_and_distinct() {
        let user = Address::new("0xabc");
        let a = FillRecord::compute_fill_key(&user, &raw("Buy", "1", None));
        let b = FillRecord::compute_fill_key(&user, &raw("Buy", "1", None));
        let c = FillRecord::compute_fill_key(&user, &raw("Sell", "1", None));
        assert_eq!(a, b, "Same inputs must produce same key");
        assert_ne!(a, c);
    }
}
