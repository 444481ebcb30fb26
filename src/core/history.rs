//! Daily price history used for charts and weekly performance.

use serde::{Deserialize, Serialize};

/// Number of daily closes requested for each chart.
pub const DEFAULT_HISTORY_DAYS: usize = 30;

/// Offset from the latest close to the close one week earlier.
const WEEK_OFFSET: usize = 7;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    /// Treasury token daily closes, oldest first.
    pub primary: Vec<f64>,
    /// Equity daily closes rounded to cents, oldest first.
    pub equity: Vec<f64>,
}

/// A flat series of `days` copies of `price`, used when history is unavailable.
pub fn flat_series(price: f64, days: usize) -> Vec<f64> {
    vec![price; days]
}

/// Percent change between the latest close and the close seven entries
/// before it. Returns 0 when the series is shorter than eight entries or
/// either endpoint is zero or not finite.
pub fn weekly_change(series: &[f64]) -> f64 {
    if series.len() <= WEEK_OFFSET {
        return 0.0;
    }
    let latest = series[series.len() - 1];
    let week_ago = series[series.len() - 1 - WEEK_OFFSET];

    if latest == 0.0 || week_ago == 0.0 || !latest.is_finite() || !week_ago.is_finite() {
        return 0.0;
    }
    ((latest - week_ago) / week_ago) * 100.0
}
