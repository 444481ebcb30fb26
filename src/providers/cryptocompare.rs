use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::config::HttpConfig;
use crate::core::market::{FetchError, HistoryProvider};
use crate::providers::util::{endpoint_url, get_json, http_client};

const SOURCE: &str = "CryptoCompare";

/// Daily USD closes for a crypto symbol from the `histoday` endpoint.
pub struct CryptoCompareProvider {
    base_url: String,
    client: Client,
    http: HttpConfig,
}

impl CryptoCompareProvider {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, FetchError> {
        Ok(CryptoCompareProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(http)?,
            http: http.clone(),
        })
    }
}

#[derive(Deserialize, Debug)]
struct HistodayResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Message")]
    message: Option<String>,
    #[serde(rename = "Data")]
    data: Option<HistodayData>,
}

#[derive(Deserialize, Debug)]
struct HistodayData {
    #[serde(rename = "Data", default)]
    data: Vec<HistodayBar>,
}

#[derive(Deserialize, Debug)]
struct HistodayBar {
    close: f64,
}

#[async_trait]
impl HistoryProvider for CryptoCompareProvider {
    #[instrument(name = "CryptoCompareHistoryFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        days: usize,
    ) -> Result<Vec<f64>, FetchError> {
        let limit = days.to_string();
        let url = endpoint_url(
            &self.base_url,
            "/data/v2/histoday",
            &[("fsym", symbol), ("tsym", "USD"), ("limit", &limit)],
            SOURCE,
        )?;
        let data: HistodayResponse = get_json(&self.client, &url, &self.http, SOURCE).await?;

        if data.response.as_deref() == Some("Error") {
            return Err(FetchError::Upstream {
                source_name: SOURCE.to_string(),
                message: data.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        let closes: Vec<f64> = data
            .data
            .map(|d| d.data.into_iter().map(|bar| bar.close).collect())
            .unwrap_or_default();

        // histoday returns `limit + 1` bars; keep the most recent `days`.
        let skip = closes.len().saturating_sub(days);
        debug!("Received {} daily closes, keeping {}", closes.len(), closes.len() - skip);
        let kept: Vec<f64> = closes.into_iter().skip(skip).collect();
        if kept.is_empty() {
            return Err(FetchError::missing(SOURCE, "daily closes"));
        }
        Ok(kept)
    }
}
