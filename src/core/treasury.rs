//! Treasury configuration: static defaults overlaid with a remote metrics file.
//!
//! The remote file is plain text, one `KEY=value` or `KEY: value` pair per
//! line. Only keys in [`MetricKey`] are accepted; everything else is ignored.

use crate::core::market::FetchError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryConfig {
    pub stock_symbol: String,
    pub crypto_symbol: String,
    pub fully_diluted_shares: f64,
    /// Circulating supply of the treasury token.
    pub token_supply: f64,
    /// Average acquisition cost per token.
    pub avg_cost: f64,
    pub outstanding_shares: f64,
    pub cash_reserves: f64,
    pub btc_holdings: f64,
    /// Units of the treasury token held.
    pub holdings: f64,
    pub airdrop_revenue: f64,
    pub converted_airdrops: f64,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        TreasuryConfig {
            stock_symbol: "BNC".to_string(),
            crypto_symbol: "BNB".to_string(),
            fully_diluted_shares: 62_336_940.0,
            token_supply: 170_532_785.0,
            avg_cost: 855.0,
            outstanding_shares: 0.0,
            cash_reserves: 21_500_000.0,
            btc_holdings: 54.7575,
            holdings: 515_054.0,
            airdrop_revenue: 6_500_000.0,
            converted_airdrops: 6_500.0,
        }
    }
}

/// Keys accepted from the remote metrics file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    StockSymbol,
    CryptoSymbol,
    FullyDilutedShares,
    TokenSupply,
    AvgCost,
    OutstandingShares,
    CashReserves,
    BtcHoldings,
    Holdings,
    AirdropRevenue,
    ConvertedAirdrops,
}

impl FromStr for MetricKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STOCK_SYMBOL" => Ok(MetricKey::StockSymbol),
            "CRYPTO_SYMBOL" => Ok(MetricKey::CryptoSymbol),
            "FULLY_DILUTED_SHARES" => Ok(MetricKey::FullyDilutedShares),
            "BNB_SUPPLY" => Ok(MetricKey::TokenSupply),
            "AVG_COST" => Ok(MetricKey::AvgCost),
            "OUTSTANDING_SHARES" => Ok(MetricKey::OutstandingShares),
            "CASH_RESERVES" => Ok(MetricKey::CashReserves),
            "BTC_HOLDINGS" => Ok(MetricKey::BtcHoldings),
            "BNB_HOLDINGS" => Ok(MetricKey::Holdings),
            "AIRDROP_REVENUE" => Ok(MetricKey::AirdropRevenue),
            "CONVERTED_AIRDROPS" => Ok(MetricKey::ConvertedAirdrops),
            _ => Err(anyhow::anyhow!("Unknown metric key: {}", s)),
        }
    }
}

/// Parses a metrics blob into safelisted `(key, raw value)` pairs, in file order.
///
/// A line is split on its first `=`, or on its first `:` when it has no `=`.
/// Lines without either separator and lines with unknown keys are dropped.
pub fn parse_metrics(raw: &str) -> Vec<(MetricKey, String)> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (key, value) = line.split_once('=').or_else(|| line.split_once(':'))?;
            let key = key.trim();
            match key.parse::<MetricKey>() {
                Ok(metric) => Some((metric, value.trim().to_string())),
                Err(_) => {
                    debug!("Ignoring unrecognized metrics key '{}'", key);
                    None
                }
            }
        })
        .collect()
}

/// Parses a number that may carry `,` thousands separators. Non-finite
/// results are rejected.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

impl TreasuryConfig {
    /// Applies the recognized entries of a metrics blob on top of `self`.
    pub fn apply_metrics(&mut self, raw: &str) {
        for (key, value) in parse_metrics(raw) {
            match key {
                MetricKey::StockSymbol => self.stock_symbol = value,
                MetricKey::CryptoSymbol => self.crypto_symbol = value,
                _ => {
                    let Some(slot) = self.numeric_field(key) else {
                        continue;
                    };
                    // An empty value clears the field to zero.
                    let parsed = if value.is_empty() {
                        Some(0.0)
                    } else {
                        parse_number(&value)
                    };
                    match parsed {
                        Some(number) => *slot = number,
                        None => warn!(
                            ?key,
                            value = %value,
                            "Non-numeric value in metrics file, keeping default"
                        ),
                    }
                }
            }
        }
    }

    /// Builds the configuration from defaults plus whatever `source` yields.
    /// A failed fetch leaves the defaults untouched.
    pub async fn load(source: &(dyn MetricsSource + Send + Sync)) -> TreasuryConfig {
        let mut config = TreasuryConfig::default();
        match source.fetch_metrics().await {
            Ok(raw) => {
                debug!("Received metrics file ({} bytes)", raw.len());
                config.apply_metrics(&raw);
            }
            Err(e) => warn!(error = %e, "Failed to load remote metrics, using defaults"),
        }
        config
    }

    fn numeric_field(&mut self, key: MetricKey) -> Option<&mut f64> {
        match key {
            MetricKey::FullyDilutedShares => Some(&mut self.fully_diluted_shares),
            MetricKey::TokenSupply => Some(&mut self.token_supply),
            MetricKey::AvgCost => Some(&mut self.avg_cost),
            MetricKey::OutstandingShares => Some(&mut self.outstanding_shares),
            MetricKey::CashReserves => Some(&mut self.cash_reserves),
            MetricKey::BtcHoldings => Some(&mut self.btc_holdings),
            MetricKey::Holdings => Some(&mut self.holdings),
            MetricKey::AirdropRevenue => Some(&mut self.airdrop_revenue),
            MetricKey::ConvertedAirdrops => Some(&mut self.converted_airdrops),
            MetricKey::StockSymbol | MetricKey::CryptoSymbol => None,
        }
    }
}

/// Source of the raw metrics text.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    async fn fetch_metrics(&self) -> Result<String, FetchError>;
}
