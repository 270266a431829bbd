use hypehold::engine::{DirectionClassifier, SymbolClassifier};
use hypehold::orchestration::Verbosity;
use hypehold::{
    Address, Coin, DataSourceError, Decimal, HoldingTimeAnalyzer, MarketView, MockDataSource,
    RawFill, Scanner, TimeMs,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const HOUR_MS: i64 = 3_600_000;
const FAST: &str = "0x00000000000000000000000000000000000000aa";
const SLOW: &str = "0x00000000000000000000000000000000000000bb";
const BROKEN: &str = "0x00000000000000000000000000000000000000cc";
const BANNED: &str = "0x00000000000000000000000000000000000000dd";

fn raw(coin: &str, dir: &str, sz: &str, time_ms: i64, tid: i64) -> RawFill {
    RawFill {
        coin: Coin::new(coin),
        dir: dir.to_string(),
        sz: Decimal::from_str_canonical(sz).unwrap(),
        px: Decimal::from_str_canonical("100").unwrap(),
        time_ms: TimeMs::new(time_ms),
        tid: Some(tid),
        oid: None,
    }
}

/// One contract round trip held for `hold_ms`.
fn round_trip(hold_ms: i64) -> Vec<RawFill> {
    vec![
        raw("BTC", "Close Long", "1", 1000 + hold_ms, 2),
        raw("BTC", "Open Long", "1", 1000, 1),
    ]
}

fn analyzer(mock: MockDataSource) -> HoldingTimeAnalyzer {
    HoldingTimeAnalyzer::new(Arc::new(mock), Arc::new(DirectionClassifier))
        .with_verbosity(Verbosity::Quiet)
}

#[tokio::test]
async fn test_exactly_one_hour_is_flagged() {
    let mock = MockDataSource::new().with_fills(FAST, round_trip(HOUR_MS));
    let result = analyzer(mock).analyze(&Address::new(FAST)).await.unwrap();
    assert_eq!(result, Some(Address::new(FAST)));
}

#[tokio::test]
async fn test_just_over_one_hour_is_not_flagged() {
    let mock = MockDataSource::new().with_fills(SLOW, round_trip(3_600_360));
    let result = analyzer(mock).analyze(&Address::new(SLOW)).await.unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_custom_threshold() {
    let mock = MockDataSource::new().with_fills(SLOW, round_trip(2 * HOUR_MS));
    let analyzer = analyzer(mock).with_threshold_hours(2.0);
    assert_eq!(analyzer.threshold_hours(), 2.0);
    assert!(analyzer.analyze(&Address::new(SLOW)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_no_fills_is_not_flagged() {
    let result = analyzer(MockDataSource::new())
        .analyze(&Address::new(FAST))
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_only_unmatched_closes_is_not_flagged() {
    let mock = MockDataSource::new().with_fill(FAST, raw("BTC", "Close Short", "5", 1000, 1));
    let analysis = analyzer(mock)
        .analyze_detailed(&Address::new(FAST))
        .await
        .unwrap();

    assert!(!analysis.high_frequency);
    assert!(analysis.statistics.is_empty());
    assert_eq!(analysis.unmatched.len(), 1);
}

#[tokio::test]
async fn test_ingestion_error_is_reported() {
    let mock = MockDataSource::new().with_failure(
        BROKEN,
        DataSourceError::HttpError {
            status: 500,
            message: "Server error".to_string(),
        },
    );
    let err = analyzer(mock).analyze(&Address::new(BROKEN)).await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error 500: Server error");
}

#[tokio::test]
async fn test_spot_and_contract_views() {
    let fills = vec![
        raw("BTC", "Open Short", "1", 0, 1),
        raw("BTC", "Close Short", "1", HOUR_MS / 2, 2),
        raw("@107", "Open Long", "10", 0, 3),
        raw("@107", "Close Long", "10", 3 * HOUR_MS, 4),
    ];
    let mock = MockDataSource::new().with_fills(FAST, fills);
    let analysis = HoldingTimeAnalyzer::new(Arc::new(mock), Arc::new(SymbolClassifier))
        .with_verbosity(Verbosity::Quiet)
        .analyze_detailed(&Address::new(FAST))
        .await
        .unwrap();

    assert_eq!(analysis.contract_fills, 2);
    assert_eq!(analysis.spot_fills, 2);
    let stats = &analysis.statistics;
    assert_eq!(stats.overall(MarketView::Contract).unwrap().simple_avg_hours, 0.5);
    assert_eq!(stats.overall(MarketView::Spot).unwrap().simple_avg_hours, 3.0);
    assert_eq!(stats.overall(MarketView::Combined).unwrap().simple_avg_hours, 1.75);
    assert!(!analysis.high_frequency);
}

#[tokio::test]
async fn test_spot_buy_then_sell_produces_no_samples() {
    let fills = vec![
        raw("@107", "Buy", "1", 0, 1),
        raw("@107", "Sell", "1", HOUR_MS / 2, 2),
    ];
    let mock = MockDataSource::new().with_fills(FAST, fills);
    let analysis = analyzer(mock)
        .analyze_detailed(&Address::new(FAST))
        .await
        .unwrap();

    assert_eq!(analysis.spot_fills, 2);
    assert!(analysis.statistics.is_empty());
    assert_eq!(analysis.unmatched.len(), 2);
    assert!(analysis.flagged_address().is_none());
}

#[tokio::test]
async fn test_classifier_strategy_is_swappable() {
    // "@107" traded with perp-style directions: only the symbol rule sees spot.
    let fills = vec![
        raw("@107", "Open Long", "1", 0, 1),
        raw("@107", "Close Long", "1", HOUR_MS, 2),
    ];
    let mock = MockDataSource::new().with_fills(FAST, fills);

    let by_direction = analyzer(mock.clone())
        .analyze_detailed(&Address::new(FAST))
        .await
        .unwrap();
    let by_symbol = HoldingTimeAnalyzer::new(Arc::new(mock), Arc::new(SymbolClassifier))
        .with_verbosity(Verbosity::Quiet)
        .analyze_detailed(&Address::new(FAST))
        .await
        .unwrap();

    assert!(by_direction.statistics.overall(MarketView::Spot).is_none());
    assert!(by_symbol.statistics.overall(MarketView::Contract).is_none());
    assert_eq!(
        by_symbol.statistics.overall(MarketView::Spot).unwrap().close_count,
        1
    );
}

#[tokio::test]
async fn test_blacklisted_address_never_fetched() {
    let mock = MockDataSource::new()
        .with_fills(FAST, round_trip(HOUR_MS / 4))
        .with_fills(BANNED, round_trip(HOUR_MS / 4));
    let analyzer = Arc::new(analyzer(mock.clone()));

    let blacklist: HashSet<Address> = [Address::new(BANNED.to_uppercase().replace("0X", "0x"))]
        .into_iter()
        .collect();
    let scanner = Scanner::new(analyzer, blacklist);

    let outcome = scanner
        .scan(&[Address::new(BANNED), Address::new(FAST)])
        .await;

    assert_eq!(outcome.flagged, vec![Address::new(FAST)]);
    assert_eq!(outcome.blacklisted, 1);
    assert_eq!(mock.requested_users(), vec![Address::new(FAST)]);
}

#[tokio::test]
async fn test_failing_address_does_not_stop_batch() {
    let mock = MockDataSource::new()
        .with_fills(FAST, round_trip(HOUR_MS / 2))
        .with_fills(SLOW, round_trip(5 * HOUR_MS))
        .with_failure(BROKEN, DataSourceError::RateLimited);
    let scanner = Scanner::new(Arc::new(analyzer(mock)), HashSet::new());

    let outcome = scanner
        .scan(&[Address::new(BROKEN), Address::new(SLOW), Address::new(FAST)])
        .await;

    assert_eq!(outcome.flagged, vec![Address::new(FAST)]);
    assert_eq!(outcome.analyses.len(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].address, Address::new(BROKEN));
    assert_eq!(outcome.failures[0].error, "Rate limited");
}

#[tokio::test]
async fn test_concurrent_scan_keeps_candidate_order() {
    let candidates: Vec<Address> = (0..8)
        .map(|i| Address::new(format!("0x{:040x}", i)))
        .collect();
    let mut mock = MockDataSource::new();
    for address in &candidates {
        mock = mock.with_fills(address.as_str(), round_trip(HOUR_MS / 10));
    }

    let scanner =
        Scanner::new(Arc::new(analyzer(mock)), HashSet::new()).with_concurrency(4);
    let outcome = scanner.scan(&candidates).await;

    assert_eq!(outcome.flagged, candidates);
}

#[tokio::test(start_paused = true)]
async fn test_interrupted_scan_keeps_finished_addresses() {
    let mock = MockDataSource::new()
        .with_fills(FAST, round_trip(HOUR_MS / 2))
        .with_fills(SLOW, round_trip(5 * HOUR_MS))
        .with_fills(BROKEN, round_trip(HOUR_MS / 2))
        .with_delay(Duration::from_secs(10));
    let scanner = Scanner::new(Arc::new(analyzer(mock)), HashSet::new());

    // Two fetches finish at 10s and 20s; the third would finish at 30s.
    let outcome = scanner
        .scan_until(
            &[Address::new(FAST), Address::new(SLOW), Address::new(BROKEN)],
            tokio::time::sleep(Duration::from_secs(25)),
        )
        .await;

    assert!(outcome.interrupted);
    assert_eq!(outcome.analyses.len(), 2);
    assert_eq!(outcome.flagged, vec![Address::new(FAST)]);
    assert!(outcome.failures.is_empty());
}

#[tokio::test]
async fn test_complete_scan_is_not_interrupted() {
    let mock = MockDataSource::new().with_fills(FAST, round_trip(HOUR_MS / 2));
    let scanner = Scanner::new(Arc::new(analyzer(mock)), HashSet::new());

    let outcome = scanner.scan(&[Address::new(FAST)]).await;

    assert!(!outcome.interrupted);
    assert_eq!(outcome.flagged, vec![Address::new(FAST)]);
}
