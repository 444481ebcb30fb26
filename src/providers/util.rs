use crate::core::config::HttpConfig;
use crate::core::market::FetchError;
use reqwest::{Client, Response, Url};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Builds the shared HTTP client used by every provider.
pub fn http_client(http: &HttpConfig) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(concat!("navboard/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .map_err(|e| FetchError::transport("http client", e))
}

/// Joins `base_url` and `path`, then appends `params` percent-encoded.
pub fn endpoint_url(
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
    source_name: &str,
) -> Result<String, FetchError> {
    Url::parse_with_params(&format!("{base_url}{path}"), params)
        .map(String::from)
        .map_err(|e| FetchError::InvalidUrl {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
}

/// Retries an async operation with configurable attempts and delays
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds between retry attempts
///
/// # Returns
/// Either the successful result or the error after all attempts
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
) -> Result<T, reqwest::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {}. Retrying...",
                    attempt, retries, err
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

/// GETs `url` with retries and returns the body of a successful response.
pub async fn get_text(
    client: &Client,
    url: &str,
    http: &HttpConfig,
    source_name: &str,
) -> Result<String, FetchError> {
    debug!("Requesting {} data from {}", source_name, url);
    let response: Response = with_retry(
        move || async move {
            client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
        },
        http.retries,
        http.retry_delay_ms,
    )
    .await
    .map_err(|e| match e.status() {
        Some(status) => FetchError::Status {
            source_name: source_name.to_string(),
            status,
        },
        None => FetchError::transport(source_name, e),
    })?;

    response
        .text()
        .await
        .map_err(|e| FetchError::transport(source_name, e))
}

/// GETs `url` and parses the body as JSON into `T`.
pub async fn get_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
    http: &HttpConfig,
    source_name: &str,
) -> Result<T, FetchError> {
    let body = get_text(client, url, http, source_name).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::malformed(source_name, e))
}
