use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

use crate::core::config::HttpConfig;
use crate::core::market::FetchError;
use crate::core::treasury::MetricsSource;
use crate::providers::util::{get_text, http_client};

const SOURCE: &str = "metrics file";

/// Fetches the treasury metrics text file from object storage.
pub struct RemoteMetricsSource {
    url: String,
    client: Client,
    http: HttpConfig,
}

impl RemoteMetricsSource {
    pub fn new(url: &str, http: &HttpConfig) -> Result<Self, FetchError> {
        Ok(RemoteMetricsSource {
            url: url.to_string(),
            client: http_client(http)?,
            http: http.clone(),
        })
    }
}

#[async_trait]
impl MetricsSource for RemoteMetricsSource {
    #[instrument(name = "MetricsFetch", skip(self), fields(url = %self.url))]
    async fn fetch_metrics(&self) -> Result<String, FetchError> {
        get_text(&self.client, &self.url, &self.http, SOURCE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::treasury::TreasuryConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/metrics.txt"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_remote_metrics_overlay_defaults() {
        let body = "OUTSTANDING_SHARES=55,933,901\nCASH_RESERVES: 24250000\nNOTES=ignored\n";
        let mock_server = create_mock_server(200, body).await;
        let url = format!("{}/metrics.txt", mock_server.uri());

        let source = RemoteMetricsSource::new(&url, &HttpConfig::default()).unwrap();
        let config = TreasuryConfig::load(&source).await;
        assert_eq!(config.outstanding_shares, 55_933_901.0);
        assert_eq!(config.cash_reserves, 24_250_000.0);
        assert_eq!(config.holdings, TreasuryConfig::default().holdings);
    }

    #[tokio::test]
    async fn test_missing_metrics_file_keeps_defaults() {
        let mock_server = create_mock_server(403, "AccessDenied").await;
        let url = format!("{}/metrics.txt", mock_server.uri());

        let source = RemoteMetricsSource::new(&url, &HttpConfig::default()).unwrap();
        assert!(source.fetch_metrics().await.is_err());
        assert_eq!(TreasuryConfig::load(&source).await, TreasuryConfig::default());
    }
}
