use crate::core::history::DEFAULT_HISTORY_DAYS;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

const DEFAULT_METRICS_URL: &str = "https://misc-asl.sfo3.digitaloceanspaces.com/metrics.txt";
const TWELVE_DATA_KEY_ENV: &str = "TWELVE_DATA_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetConfig {
    /// CoinPaprika ticker id, e.g. `bnb-binance-coin`.
    pub coin_id: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetsConfig {
    #[serde(default = "AssetsConfig::default_primary")]
    pub primary: AssetConfig,
    #[serde(default = "AssetsConfig::default_reference")]
    pub reference: AssetConfig,
}

impl AssetsConfig {
    fn default_primary() -> AssetConfig {
        AssetConfig {
            coin_id: "bnb-binance-coin".to_string(),
        }
    }

    fn default_reference() -> AssetConfig {
        AssetConfig {
            coin_id: "btc-bitcoin".to_string(),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            primary: Self::default_primary(),
            reference: Self::default_reference(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoinPaprikaProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TwelveDataProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CryptoCompareProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub coinpaprika: Option<CoinPaprikaProviderConfig>,
    pub twelve_data: Option<TwelveDataProviderConfig>,
    pub cryptocompare: Option<CryptoCompareProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coinpaprika: Some(CoinPaprikaProviderConfig {
                base_url: "https://api.coinpaprika.com".to_string(),
            }),
            twelve_data: Some(TwelveDataProviderConfig {
                base_url: "https://api.twelvedata.com".to_string(),
                api_key: None,
            }),
            cryptocompare: Some(CryptoCompareProviderConfig {
                base_url: "https://min-api.cryptocompare.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HttpConfig {
    /// Extra attempts after the first failed request.
    #[serde(default)]
    pub retries: usize,
    #[serde(default = "HttpConfig::default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "HttpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn default_retry_delay_ms() -> u64 {
        500
    }

    fn default_timeout_secs() -> u64 {
        10
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            retries: 0,
            retry_delay_ms: Self::default_retry_delay_ms(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default = "AppConfig::default_metrics_url")]
    pub metrics_url: String,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "AppConfig::default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "AppConfig::default_history_days")]
    pub history_days: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metrics_url: Self::default_metrics_url(),
            assets: AssetsConfig::default(),
            providers: ProvidersConfig::default(),
            http: HttpConfig::default(),
            refresh_interval_secs: Self::default_refresh_interval_secs(),
            history_days: Self::default_history_days(),
        }
    }
}

impl AppConfig {
    fn default_metrics_url() -> String {
        DEFAULT_METRICS_URL.to_string()
    }

    fn default_refresh_interval_secs() -> u64 {
        60
    }

    fn default_history_days() -> usize {
        DEFAULT_HISTORY_DAYS
    }

    /// Loads the config from the default location, or defaults when no file
    /// has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "navboard", "navboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Twelve Data key from the config file, then the environment, then the
    /// public `demo` key.
    pub fn twelve_data_api_key(&self) -> String {
        self.providers
            .twelve_data
            .as_ref()
            .and_then(|p| p.api_key.clone())
            .or_else(|| std::env::var(TWELVE_DATA_KEY_ENV).ok())
            .unwrap_or_else(|| "demo".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.history_days, 30);
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.assets.primary.coin_id, "bnb-binance-coin");
        assert_eq!(config.http.retries, 0);
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
metrics_url: "http://example.com/metrics.txt"
assets:
  primary:
    coin_id: "eth-ethereum"
providers:
  coinpaprika:
    base_url: "http://example.com/paprika"
  twelve_data:
    base_url: "http://example.com/twelve"
    api_key: "secret"
http:
  retries: 2
refresh_interval_secs: 15
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.metrics_url, "http://example.com/metrics.txt");
        assert_eq!(config.assets.primary.coin_id, "eth-ethereum");
        assert_eq!(config.assets.reference.coin_id, "btc-bitcoin");
        assert_eq!(
            config.providers.coinpaprika.unwrap().base_url,
            "http://example.com/paprika"
        );
        assert!(config.providers.cryptocompare.is_none());
        assert_eq!(config.http.retries, 2);
        assert_eq!(config.http.retry_delay_ms, 500);
        assert_eq!(config.refresh_interval_secs, 15);
        assert_eq!(config.history_days, 30);
    }

    #[test]
    fn test_api_key_from_config_wins() {
        let mut config = AppConfig::default();
        config.providers.twelve_data = Some(TwelveDataProviderConfig {
            base_url: "http://localhost".to_string(),
            api_key: Some("from-config".to_string()),
        });
        assert_eq!(config.twelve_data_api_key(), "from-config");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
