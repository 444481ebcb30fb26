//! Twelve Data adapter for the company's equity: latest quote and daily history.
//!
//! Both come from the `time_series` endpoint, which lists daily bars newest
//! first with every number encoded as a string. Closes are rounded to cents
//! as they are read.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::config::HttpConfig;
use crate::core::market::{
    EquityQuote, EquityQuoteProvider, FetchError, HistoryProvider, round_cents,
};
use crate::providers::util::{endpoint_url, get_json, http_client};

const SOURCE: &str = "Twelve Data";

pub struct TwelveDataProvider {
    base_url: String,
    api_key: String,
    client: Client,
    http: HttpConfig,
}

impl TwelveDataProvider {
    pub fn new(base_url: &str, api_key: &str, http: &HttpConfig) -> Result<Self, FetchError> {
        Ok(TwelveDataProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: http_client(http)?,
            http: http.clone(),
        })
    }

    /// Daily bars for `symbol`, newest first, as returned by the API.
    async fn daily_bars(&self, symbol: &str, count: usize) -> Result<Vec<DailyBar>, FetchError> {
        let outputsize = count.to_string();
        let url = endpoint_url(
            &self.base_url,
            "/time_series",
            &[
                ("symbol", symbol),
                ("interval", "1day"),
                ("outputsize", &outputsize),
                ("apikey", &self.api_key),
            ],
            SOURCE,
        )?;
        let data: TimeSeriesResponse = get_json(&self.client, &url, &self.http, SOURCE).await?;

        if data.status.as_deref() == Some("error") {
            return Err(FetchError::Upstream {
                source_name: SOURCE.to_string(),
                message: data.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let values = data
            .values
            .filter(|v| !v.is_empty())
            .ok_or_else(|| FetchError::missing(SOURCE, "time series values"))?;
        debug!("Received {} daily bars for {}", values.len(), symbol);
        Ok(values)
    }
}

#[derive(Deserialize, Debug)]
struct TimeSeriesResponse {
    status: Option<String>,
    message: Option<String>,
    values: Option<Vec<DailyBar>>,
}

#[derive(Deserialize, Debug)]
struct DailyBar {
    close: String,
    volume: Option<String>,
}

impl DailyBar {
    fn close_cents(&self) -> Result<f64, FetchError> {
        self.close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .map(round_cents)
            .ok_or_else(|| FetchError::malformed(SOURCE, format!("invalid close '{}'", self.close)))
    }

    fn volume(&self) -> u64 {
        self.volume
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(0, |v| v as u64)
    }
}

#[async_trait]
impl EquityQuoteProvider for TwelveDataProvider {
    #[instrument(name = "TwelveDataQuoteFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_equity_quote(&self, symbol: &str) -> Result<EquityQuote, FetchError> {
        let bars = self.daily_bars(symbol, 2).await?;
        let [latest, previous, ..] = bars.as_slice() else {
            return Err(FetchError::missing(SOURCE, "previous close"));
        };

        let price = latest.close_cents()?;
        let previous_close = previous.close_cents()?;
        if previous_close == 0.0 {
            return Err(FetchError::malformed(SOURCE, "previous close is zero"));
        }

        Ok(EquityQuote {
            price,
            change_pct: ((price - previous_close) / previous_close) * 100.0,
            volume: latest.volume(),
        })
    }
}

#[async_trait]
impl HistoryProvider for TwelveDataProvider {
    #[instrument(name = "TwelveDataHistoryFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<f64>, FetchError> {
        let bars = self.daily_bars(symbol, days).await?;
        bars.iter().rev().map(DailyBar::close_cents).collect()
    }
}
