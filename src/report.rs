//! Human-readable holding-time reports.

use crate::domain::{Coin, Decimal, MarketKind};
use crate::engine::{CoinStatistics, MarketView, OverallStatistics};
use crate::orchestration::AddressAnalysis;
use std::collections::BTreeMap;
use std::fmt::Write;

const RULE_WIDTH: usize = 80;

/// Render hours as minutes, hours or days, one decimal place.
pub fn format_hours(hours: f64) -> String {
    if hours < 1.0 {
        format!("{:.1} min", hours * 60.0)
    } else if hours < 24.0 {
        format!("{:.1} h", hours)
    } else {
        format!("{:.1} d", hours / 24.0)
    }
}

/// One line for an address that was analyzed but not flagged.
///
/// `None` when there were no closed positions to measure.
pub fn summary_line(analysis: &AddressAnalysis) -> Option<String> {
    analysis.combined().map(|combined| {
        format!(
            "{}: overall simple average holding time {} h over {} closes (threshold {} h)",
            analysis.address,
            combined.simple_avg_hours,
            combined.close_count,
            analysis.threshold_hours
        )
    })
}

/// The figures shared by per-instrument and per-view statistics.
struct StatsBlock {
    close_count: usize,
    simple_avg_hours: f64,
    weighted_avg_hours: f64,
    min_hours: f64,
    max_hours: f64,
    total_size: Decimal,
}

impl From<&CoinStatistics> for StatsBlock {
    fn from(stats: &CoinStatistics) -> Self {
        StatsBlock {
            close_count: stats.close_count,
            simple_avg_hours: stats.simple_avg_hours,
            weighted_avg_hours: stats.weighted_avg_hours,
            min_hours: stats.min_hours,
            max_hours: stats.max_hours,
            total_size: stats.total_size,
        }
    }
}

impl From<&OverallStatistics> for StatsBlock {
    fn from(stats: &OverallStatistics) -> Self {
        StatsBlock {
            close_count: stats.close_count,
            simple_avg_hours: stats.simple_avg_hours,
            weighted_avg_hours: stats.weighted_avg_hours,
            min_hours: stats.min_hours,
            max_hours: stats.max_hours,
            total_size: stats.total_size,
        }
    }
}

fn write_stats(out: &mut String, stats: StatsBlock) {
    let _ = writeln!(out, "  Closes:                 {}", stats.close_count);
    let _ = writeln!(
        out,
        "  Simple average:         {}",
        format_hours(stats.simple_avg_hours)
    );
    let _ = writeln!(
        out,
        "  Weighted average:       {} (by size)",
        format_hours(stats.weighted_avg_hours)
    );
    let _ = writeln!(out, "  Shortest:               {}", format_hours(stats.min_hours));
    let _ = writeln!(out, "  Longest:                {}", format_hours(stats.max_hours));
    let _ = writeln!(out, "  Closed size:            {:.4}", stats.total_size.to_f64());
}

/// Full report: per-instrument and overall statistics for each market view,
/// then still-open lots and discarded close volume.
pub fn render_report(analysis: &AddressAnalysis) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let thin = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "Holding time report for {}", analysis.address);
    let _ = writeln!(
        out,
        "Fills: {} ({} contract, {} spot)",
        analysis.fills_fetched(),
        analysis.contract_fills,
        analysis.spot_fills
    );
    let _ = writeln!(out, "{}", rule);

    if analysis.statistics.is_empty() {
        let _ = writeln!(out, "\nNo closed positions found");
    }

    for view in [MarketView::Contract, MarketView::Spot] {
        let instruments = analysis.statistics.instruments(view);
        if instruments.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n[{}]", view.label());
        for (coin, market_kind) in instruments {
            let Some(stats) = analysis.statistics.coin_statistics(&coin, market_kind) else {
                continue;
            };
            let _ = writeln!(out, "\n  {}", coin);
            let _ = writeln!(out, "  {}", &thin[..RULE_WIDTH - 2]);
            write_stats(&mut out, StatsBlock::from(&stats));
        }
    }

    for view in MarketView::ALL {
        if let Some(stats) = analysis.statistics.overall(view) {
            let _ = writeln!(out, "\n{}", rule);
            let _ = writeln!(out, "[Overall: {}]", view.label());
            let _ = writeln!(out, "{}", thin);
            write_stats(&mut out, StatsBlock::from(&stats));
        }
    }

    if !analysis.open_lots.is_empty() {
        let mut open: BTreeMap<(MarketKind, Coin), (Decimal, usize)> = BTreeMap::new();
        for lot in &analysis.open_lots {
            let entry = open
                .entry((lot.market_kind, lot.coin.clone()))
                .or_insert((Decimal::zero(), 0));
            entry.0 += lot.size;
            entry.1 += 1;
        }

        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(out, "[Open positions]");
        let _ = writeln!(out, "{}", thin);
        for ((market_kind, coin), (size, lots)) in open {
            let _ = writeln!(
                out,
                "  {} ({}): {:.4} across {} open lot(s)",
                coin,
                market_kind,
                size.to_f64(),
                lots
            );
        }
    }

    if !analysis.unmatched.is_empty() {
        let total: Decimal = analysis.unmatched.iter().map(|u| u.size).sum();
        let _ = writeln!(out, "\n{}", rule);
        let _ = writeln!(
            out,
            "[Unmatched closes] {} close(s), {:.4} total size with no open lot in history",
            analysis.unmatched.len(),
            total.to_f64()
        );
    }

    let verdict = if analysis.high_frequency {
        "HIGH-FREQUENCY"
    } else {
        "not high-frequency"
    };
    let _ = writeln!(out, "\n{}", rule);
    let _ = write!(
        out,
        "Verdict: {} (threshold {} h)",
        verdict, analysis.threshold_hours
    );

    out
}
