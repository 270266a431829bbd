use anyhow::Context;
use hypehold::addresses::{load_blacklist, load_candidates};
use hypehold::datasource::{HyperliquidDataSource, RateLimiter};
use hypehold::export::export_csv;
use hypehold::{config::Config, AppError, DataSource, HoldingTimeAnalyzer, Scanner};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("scan", %run_id);

    match run(config).instrument(span).await {
        Ok(ScanStatus::Complete) => {}
        Ok(ScanStatus::Interrupted) => std::process::exit(130),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

enum ScanStatus {
    Complete,
    Interrupted,
}

async fn run(config: Config) -> anyhow::Result<ScanStatus> {
    let candidates = load_candidates(&config.address_list_path)
        .map_err(AppError::from)
        .context("loading candidate addresses")?;

    let blacklist = match &config.blacklist_path {
        Some(path) => load_blacklist(path)
            .map_err(AppError::from)
            .context("loading blacklist")?,
        None => HashSet::new(),
    };

    tracing::info!(
        "Loaded {} candidate addresses, {} blacklisted",
        candidates.len(),
        blacklist.len()
    );

    let rate_limiter = Arc::new(RateLimiter::per_second(config.max_requests_per_second));
    let datasource: Arc<dyn DataSource> = Arc::new(
        HyperliquidDataSource::new(
            config.hyperliquid_api_url.clone(),
            rate_limiter,
            Duration::from_secs(config.request_timeout_secs),
            Duration::from_secs(config.retry_max_elapsed_secs),
        )
        .context("building HTTP client")?,
    );

    let analyzer = HoldingTimeAnalyzer::new(datasource, config.classifier.build())
        .with_threshold_hours(config.threshold_hours)
        .with_verbosity(config.verbosity);
    let scanner = Scanner::new(Arc::new(analyzer), blacklist)
        .with_concurrency(config.scan_concurrency);

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted; reporting addresses finished so far");
        } else {
            std::future::pending::<()>().await;
        }
    };
    let outcome = scanner.scan_until(&candidates, shutdown).await;

    if let Some(path) = &config.export_csv_path {
        export_csv(path, &outcome.analyses)
            .map_err(AppError::from)
            .with_context(|| format!("exporting results to {}", path))?;
        tracing::info!("Wrote {} rows to {}", outcome.analyses.len(), path);
    }

    println!("High-frequency addresses ({}):", outcome.flagged.len());
    for address in &outcome.flagged {
        println!("{}", address);
    }
    if !outcome.failures.is_empty() {
        println!("Failed addresses ({}):", outcome.failures.len());
        for failure in &outcome.failures {
            println!("{}: {}", failure.address, failure.error);
        }
    }

    Ok(if outcome.interrupted {
        ScanStatus::Interrupted
    } else {
        ScanStatus::Complete
    })
}
