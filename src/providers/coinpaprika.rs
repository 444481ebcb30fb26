use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::config::HttpConfig;
use crate::core::market::{FetchError, Quote, QuoteProvider};
use crate::providers::util::{get_json, http_client};

const SOURCE: &str = "CoinPaprika";

/// Spot price and 24h change for a crypto asset, keyed by CoinPaprika ticker id.
pub struct CoinPaprikaProvider {
    base_url: String,
    client: Client,
    http: HttpConfig,
}

impl CoinPaprikaProvider {
    pub fn new(base_url: &str, http: &HttpConfig) -> Result<Self, FetchError> {
        Ok(CoinPaprikaProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(http)?,
            http: http.clone(),
        })
    }
}

#[derive(Deserialize, Debug)]
struct TickerResponse {
    #[serde(default)]
    quotes: HashMap<String, TickerQuote>,
}

#[derive(Deserialize, Debug)]
struct TickerQuote {
    price: Option<f64>,
    percent_change_24h: Option<f64>,
}

#[async_trait]
impl QuoteProvider for CoinPaprikaProvider {
    #[instrument(name = "CoinPaprikaQuoteFetch", skip(self), fields(asset_id = %asset_id))]
    async fn fetch_quote(&self, asset_id: &str) -> Result<Quote, FetchError> {
        let url = format!("{}/v1/tickers/{}", self.base_url, asset_id);
        let data: TickerResponse = get_json(&self.client, &url, &self.http, SOURCE).await?;

        let usd = data
            .quotes
            .get("USD")
            .ok_or_else(|| FetchError::missing(SOURCE, "USD quote"))?;
        let price = usd
            .price
            .ok_or_else(|| FetchError::missing(SOURCE, "USD price"))?;
        let change_pct = usd
            .percent_change_24h
            .ok_or_else(|| FetchError::missing(SOURCE, "24h change"))?;

        debug!(price, change_pct, "Parsed CoinPaprika quote");
        Ok(Quote { price, change_pct })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(coin_id: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/v1/tickers/{coin_id}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_quote_fetch() {
        let mock_response = r#"{
            "id": "bnb-binance-coin",
            "symbol": "BNB",
            "quotes": {
                "USD": {
                    "price": 612.34,
                    "volume_24h": 1500000000.5,
                    "percent_change_24h": -1.25
                }
            }
        }"#;
        let mock_server = create_mock_server("bnb-binance-coin", 200, mock_response).await;

        let provider = CoinPaprikaProvider::new(&mock_server.uri(), &HttpConfig::default()).unwrap();
        let quote = provider.fetch_quote("bnb-binance-coin").await.unwrap();
        assert_eq!(quote.price, 612.34);
        assert_eq!(quote.change_pct, -1.25);
    }

    #[tokio::test]
    async fn test_missing_usd_quote() {
        let mock_response = r#"{"id": "btc-bitcoin", "quotes": {"EUR": {"price": 1.0, "percent_change_24h": 0.1}}}"#;
        let mock_server = create_mock_server("btc-bitcoin", 200, mock_response).await;

        let provider = CoinPaprikaProvider::new(&mock_server.uri(), &HttpConfig::default()).unwrap();
        let result = provider.fetch_quote("btc-bitcoin").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No USD quote in response from CoinPaprika"
        );
    }

    #[tokio::test]
    async fn test_api_error_response() {
        let mock_server = create_mock_server("btc-bitcoin", 500, "").await;

        let provider = CoinPaprikaProvider::new(&mock_server.uri(), &HttpConfig::default()).unwrap();
        let result = provider.fetch_quote("btc-bitcoin").await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from CoinPaprika"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server("btc-bitcoin", 200, r#"{"quotes": []}"#).await;

        let provider = CoinPaprikaProvider::new(&mock_server.uri(), &HttpConfig::default()).unwrap();
        let result = provider.fetch_quote("btc-bitcoin").await;
        assert!(matches!(result, Err(FetchError::Malformed { .. })));
    }
}
