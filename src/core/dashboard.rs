//! One dashboard cycle: treasury config first, then every market fetch at
//! once, then fallbacks and derived metrics.

use crate::core::history::{HistoricalSeries, flat_series};
use crate::core::market::{
    EquityQuote, EquityQuoteProvider, HistoryProvider, MarketSnapshot, Quote, QuoteProvider,
    resolve_with_fallback, round_cents,
};
use crate::core::treasury::{MetricsSource, TreasuryConfig};
use crate::core::valuation::{DerivedMetrics, compute_metrics};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// The providers a dashboard cycle reads from.
pub struct DashboardSources {
    pub metrics: Arc<dyn MetricsSource + Send + Sync>,
    pub crypto_quotes: Arc<dyn QuoteProvider + Send + Sync>,
    pub equity_quotes: Arc<dyn EquityQuoteProvider + Send + Sync>,
    pub crypto_history: Arc<dyn HistoryProvider + Send + Sync>,
    pub equity_history: Arc<dyn HistoryProvider + Send + Sync>,
    pub primary_coin_id: String,
    pub reference_coin_id: String,
    pub history_days: usize,
}

/// Everything one cycle produced. Built fresh every cycle.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardContext {
    pub generated_at: DateTime<Utc>,
    pub treasury: TreasuryConfig,
    pub market: MarketSnapshot,
    pub history: HistoricalSeries,
    pub metrics: DerivedMetrics,
}

pub async fn load_dashboard(sources: &DashboardSources) -> DashboardContext {
    let treasury = TreasuryConfig::load(sources.metrics.as_ref()).await;
    debug!(?treasury, "Treasury configuration resolved");

    let days = sources.history_days;
    let (primary, equity, reference, primary_history, equity_history) = futures::join!(
        sources.crypto_quotes.fetch_quote(&sources.primary_coin_id),
        sources
            .equity_quotes
            .fetch_equity_quote(&treasury.stock_symbol),
        sources.crypto_quotes.fetch_quote(&sources.reference_coin_id),
        sources
            .crypto_history
            .fetch_daily_closes(&treasury.crypto_symbol, days),
        sources
            .equity_history
            .fetch_daily_closes(&treasury.stock_symbol, days),
    );

    let market = MarketSnapshot {
        primary: resolve_with_fallback(
            &treasury.crypto_symbol,
            primary,
            Quote::PRIMARY_FALLBACK,
        ),
        equity: resolve_with_fallback(&treasury.stock_symbol, equity, EquityQuote::FALLBACK),
        reference: resolve_with_fallback(
            &sources.reference_coin_id,
            reference,
            Quote::REFERENCE_FALLBACK,
        ),
    };

    // History fallbacks track the resolved price, so they wait for the quotes.
    let history = HistoricalSeries {
        primary: resolve_with_fallback(
            "crypto history",
            primary_history,
            flat_series(market.primary.price, days),
        ),
        equity: resolve_with_fallback(
            "equity history",
            equity_history,
            flat_series(round_cents(market.equity.price), days),
        ),
    };

    let metrics = compute_metrics(&treasury, &market, &history);
    info!(nav = metrics.nav, mnav = ?metrics.mnav, "Dashboard cycle complete");

    DashboardContext {
        generated_at: Utc::now(),
        treasury,
        market,
        history,
        metrics,
    }
}
