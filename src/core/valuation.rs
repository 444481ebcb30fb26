//! Provides the valuation figures derived from treasury holdings and live quotes.
//!
//! Everything here is a pure calculation. Ratios whose denominator is zero
//! are reported as `None` rather than as infinities or NaN. Weekly change is
//! the exception: it keeps its documented zero fallback.
use crate::core::history::{HistoricalSeries, weekly_change};
use crate::core::market::MarketSnapshot;
use crate::core::treasury::TreasuryConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Market value of the treasury token holdings.
    pub holdings_value: f64,
    pub cost_basis_total: f64,
    pub unrealized_pl: f64,
    pub unrealized_pl_pct: Option<f64>,
    /// Market value of the reference (bitcoin) holdings.
    pub reference_value: f64,
    pub nav: f64,
    pub navps: Option<f64>,
    pub fully_diluted_navps: Option<f64>,
    pub market_cap: f64,
    pub mnav: Option<f64>,
    pub enterprise_value: f64,
    /// Share of the token's circulating supply held by the treasury.
    pub supply_share_pct: Option<f64>,
    pub weekly_change_primary: f64,
    pub weekly_change_equity: f64,
}

/// `numerator / denominator`, or `None` when the result is not a finite number.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|r| r.is_finite())
}

pub fn compute_metrics(
    config: &TreasuryConfig,
    market: &MarketSnapshot,
    history: &HistoricalSeries,
) -> DerivedMetrics {
    let holdings_value = config.holdings * market.primary.price;
    let cost_basis_total = config.holdings * config.avg_cost;
    let unrealized_pl = holdings_value - cost_basis_total;

    let reference_value = config.btc_holdings * market.reference.price;
    let nav = holdings_value + config.cash_reserves + reference_value;
    let market_cap = config.outstanding_shares * market.equity.price;

    DerivedMetrics {
        holdings_value,
        cost_basis_total,
        unrealized_pl,
        unrealized_pl_pct: ratio(unrealized_pl, cost_basis_total).map(|r| r * 100.0),
        reference_value,
        nav,
        navps: ratio(nav, config.outstanding_shares),
        fully_diluted_navps: ratio(nav, config.fully_diluted_shares),
        market_cap,
        mnav: ratio(market_cap, nav),
        enterprise_value: market_cap - config.cash_reserves,
        supply_share_pct: ratio(config.holdings, config.token_supply).map(|r| r * 100.0),
        weekly_change_primary: weekly_change(&history.primary),
        weekly_change_equity: weekly_change(&history.equity),
    }
}
