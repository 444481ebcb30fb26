pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::dashboard::DashboardSources;
use crate::providers::coinpaprika::CoinPaprikaProvider;
use crate::providers::cryptocompare::CryptoCompareProvider;
use crate::providers::metrics::RemoteMetricsSource;
use crate::providers::twelve_data::TwelveDataProvider;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Dashboard {
        json: bool,
    },
    Watch {
        interval_secs: Option<u64>,
        cycles: Option<usize>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Treasury dashboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let sources = Arc::new(build_sources(&config)?);

    match command {
        AppCommand::Dashboard { json } => cli::dashboard::run(&sources, json).await,
        AppCommand::Watch {
            interval_secs,
            cycles,
        } => {
            let secs = interval_secs
                .unwrap_or(config.refresh_interval_secs)
                .max(1);
            cli::watch::run(sources, Duration::from_secs(secs), cycles).await
        }
    }
}

/// Wires the configured HTTP providers into a set of dashboard sources.
pub fn build_sources(config: &AppConfig) -> Result<DashboardSources> {
    let coinpaprika_url = config
        .providers
        .coinpaprika
        .as_ref()
        .map_or("https://api.coinpaprika.com", |p| &p.base_url);
    let twelve_data_url = config
        .providers
        .twelve_data
        .as_ref()
        .map_or("https://api.twelvedata.com", |p| &p.base_url);
    let cryptocompare_url = config
        .providers
        .cryptocompare
        .as_ref()
        .map_or("https://min-api.cryptocompare.com", |p| &p.base_url);

    let metrics = RemoteMetricsSource::new(&config.metrics_url, &config.http)
        .context("Failed to create metrics source")?;
    let crypto = CoinPaprikaProvider::new(coinpaprika_url, &config.http)
        .context("Failed to create CoinPaprika provider")?;
    let equity = Arc::new(
        TwelveDataProvider::new(twelve_data_url, &config.twelve_data_api_key(), &config.http)
            .context("Failed to create Twelve Data provider")?,
    );
    let crypto_history = CryptoCompareProvider::new(cryptocompare_url, &config.http)
        .context("Failed to create CryptoCompare provider")?;

    Ok(DashboardSources {
        metrics: Arc::new(metrics),
        crypto_quotes: Arc::new(crypto),
        equity_quotes: equity.clone(),
        crypto_history: Arc::new(crypto_history),
        equity_history: equity,
        primary_coin_id: config.assets.primary.coin_id.clone(),
        reference_coin_id: config.assets.reference.coin_id.clone(),
        history_days: config.history_days,
    })
}
