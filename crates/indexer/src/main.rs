use std::time::Duration;

use redbank_common::config::AppConfig;
use redbank_decoders::{KeyLayout, LengthPrefix, MapKeyDecoder};
use redbank_engine::{CrCalculator, FixedPriceOracle, PriceOracle, TablePriceOracle};
use redbank_indexer::fetcher::PositionFetcher;
use redbank_indexer::monitor::Monitor;
use redbank_indexer::report::{AccountReport, ScanSummary};
use redbank_indexer::rest::RestClient;
use redbank_indexer::rpc::TendermintRpc;
use redbank_indexer::scanner::StateScanner;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "redbank_indexer=info,redbank_decoders=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Red Bank indexer starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    let prefix = LengthPrefix::from_width(config.key_length_prefix).ok_or_else(|| {
        anyhow::anyhow!("unsupported key length prefix: {}", config.key_length_prefix)
    })?;
    let decoder = MapKeyDecoder::new(KeyLayout {
        prefix,
        min_len: config.min_key_len,
    });

    let rpc = TendermintRpc::new(
        &config.rpc_endpoint,
        Duration::from_secs(config.rpc_timeout_secs),
    )?;
    let scanner = StateScanner::new(rpc, decoder).with_page_limit(config.state_page_limit);

    let rest = RestClient::new(&config.rest_endpoint, &config.redbank_contract)?;
    let fetcher = PositionFetcher::new(rest);

    let oracle: Box<dyn PriceOracle> = match &config.price_table {
        Some(table) => {
            let oracle = TablePriceOracle::parse(table)?;
            tracing::info!(denoms = oracle.len(), "Using configured price table");
            Box::new(oracle)
        }
        None => Box::new(FixedPriceOracle::default()),
    };

    let monitor = Monitor::new(
        config.redbank_contract.clone(),
        scanner,
        fetcher,
        CrCalculator::new(oracle),
    );

    let contract = config.redbank_contract.as_str();

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = monitor.run(
            |scan| println!("{}", ScanSummary { contract, scan }),
            |position, ratio| println!("{}", AccountReport::new(position, ratio)),
        ) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Monitoring pass failed");
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping...");
        }
    }

    tracing::info!("Red Bank indexer stopped.");
    Ok(())
}
