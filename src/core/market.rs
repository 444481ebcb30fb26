//! Live market quotes and the provider abstractions that fetch them

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tracing::warn;

/// Errors raised by a single fetcher. These never escape the dashboard
/// orchestrator: each one is logged and replaced with a fallback value.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request error for {source_name}: {error}")]
    Transport {
        source_name: String,
        #[source]
        error: reqwest::Error,
    },

    #[error("HTTP error: {status} from {source_name}")]
    Status {
        source_name: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse response from {source_name}: {message}")]
    Malformed {
        source_name: String,
        message: String,
    },

    #[error("No {what} in response from {source_name}")]
    MissingData { source_name: String, what: String },

    #[error("{source_name} returned an error: {message}")]
    Upstream {
        source_name: String,
        message: String,
    },

    #[error("Invalid request URL for {source_name}: {message}")]
    InvalidUrl {
        source_name: String,
        message: String,
    },
}

impl FetchError {
    pub fn transport(source_name: &str, error: reqwest::Error) -> Self {
        FetchError::Transport {
            source_name: source_name.to_string(),
            error,
        }
    }

    pub fn malformed(source_name: &str, message: impl Display) -> Self {
        FetchError::Malformed {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    pub fn missing(source_name: &str, what: &str) -> Self {
        FetchError::MissingData {
            source_name: source_name.to_string(),
            what: what.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityQuote {
    pub price: f64,
    pub change_pct: f64,
    pub volume: u64,
}

impl Quote {
    pub const PRIMARY_FALLBACK: Quote = Quote {
        price: 910.0,
        change_pct: 1.67,
    };

    pub const REFERENCE_FALLBACK: Quote = Quote {
        price: 95_000.0,
        change_pct: 0.5,
    };
}

impl EquityQuote {
    pub const FALLBACK: EquityQuote = EquityQuote {
        price: 0.48,
        change_pct: 4.35,
        volume: 250_000,
    };
}

/// Live quotes for every tracked asset, as used by one dashboard cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// The treasury token itself.
    pub primary: Quote,
    /// The company's listed equity.
    pub equity: EquityQuote,
    /// Secondary reserve asset (bitcoin).
    pub reference: Quote,
}

impl Default for MarketSnapshot {
    fn default() -> Self {
        MarketSnapshot {
            primary: Quote::PRIMARY_FALLBACK,
            equity: EquityQuote::FALLBACK,
            reference: Quote::REFERENCE_FALLBACK,
        }
    }
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_quote(&self, asset_id: &str) -> Result<Quote, FetchError>;
}

#[async_trait]
pub trait EquityQuoteProvider: Send + Sync {
    async fn fetch_equity_quote(&self, symbol: &str) -> Result<EquityQuote, FetchError>;
}

/// Daily closing prices, oldest first.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_daily_closes(&self, symbol: &str, days: usize)
    -> Result<Vec<f64>, FetchError>;
}

/// Unwraps a fetcher result, logging and substituting `fallback` on failure.
pub fn resolve_with_fallback<T: std::fmt::Debug>(
    label: &str,
    result: Result<T, FetchError>,
    fallback: T,
) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, ?fallback, "{label} fetch failed, using fallback");
            fallback
        }
    }
}

/// Rounds to two decimal places, the precision equity prices are tracked at.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
