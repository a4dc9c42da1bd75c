use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::data_source::{QuoteSource, SectorSource};
use crate::http_client::{HttpClient, DEFAULT_TIMEOUT_MS};
use crate::orchestrator::{RefreshConfig, DEFAULT_SECTOR_POLL_INTERVAL};
use crate::quote_source::{AlphaVantageQuoteSource, OfflineQuoteSource};
use crate::sector_source::{HttpSectorSource, StaticSectorSource, DEFAULT_SECTOR_URL};
use crate::{InstrumentCatalog, ValidationError};

pub const DEFAULT_API_KEY: &str = "demo";
pub const DEFAULT_SESSION_FILE: &str = ".tickerboard/session.json";

/// Runtime configuration for the dashboard services.
///
/// # Environment Variables
///
/// | Setting | Env Var | Default |
/// |---------|---------|---------|
/// | Alpha Vantage key | `TICKERBOARD_ALPHAVANTAGE_API_KEY` | `demo` |
/// | Sector key | `TICKERBOARD_SECTOR_API_KEY` | `demo` |
/// | Sector endpoint | `TICKERBOARD_SECTOR_URL` | FMP sectors-performance |
/// | Sector poll period (s) | `TICKERBOARD_SECTOR_POLL_SECS` | `60` |
/// | Request timeout (ms) | `TICKERBOARD_TIMEOUT_MS` | `5000` |
/// | Session file | `TICKERBOARD_SESSION_FILE` | `.tickerboard/session.json` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub alphavantage_api_key: String,
    pub sector_api_key: String,
    pub sector_url: String,
    pub sector_poll_interval: Duration,
    pub request_timeout_ms: u64,
    pub session_file: PathBuf,
    /// Use local quote and sector data instead of the network.
    pub offline: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            alphavantage_api_key: String::from(DEFAULT_API_KEY),
            sector_api_key: String::from(DEFAULT_API_KEY),
            sector_url: String::from(DEFAULT_SECTOR_URL),
            sector_poll_interval: DEFAULT_SECTOR_POLL_INTERVAL,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            offline: false,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup. Unset or
    /// blank variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(key) = var("TICKERBOARD_ALPHAVANTAGE_API_KEY") {
            config.alphavantage_api_key = key;
        }
        if let Some(key) = var("TICKERBOARD_SECTOR_API_KEY") {
            config.sector_api_key = key;
        }
        if let Some(url) = var("TICKERBOARD_SECTOR_URL") {
            config.sector_url = url;
        }
        if let Some(raw) = var("TICKERBOARD_SECTOR_POLL_SECS") {
            let secs = parse_positive("TICKERBOARD_SECTOR_POLL_SECS", &raw)?;
            config.sector_poll_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = var("TICKERBOARD_TIMEOUT_MS") {
            config.request_timeout_ms = parse_positive("TICKERBOARD_TIMEOUT_MS", &raw)?;
        }
        if let Some(path) = var("TICKERBOARD_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn refresh_config(&self) -> RefreshConfig {
        RefreshConfig {
            sector_poll_interval: self.sector_poll_interval,
            ..RefreshConfig::default()
        }
    }

    pub fn quote_source(
        &self,
        http_client: Arc<dyn HttpClient>,
        catalog: Arc<InstrumentCatalog>,
    ) -> Arc<dyn QuoteSource> {
        if self.offline {
            return Arc::new(OfflineQuoteSource::new(catalog));
        }
        Arc::new(
            AlphaVantageQuoteSource::new(http_client, catalog, &self.alphavantage_api_key)
                .with_timeout_ms(self.request_timeout_ms),
        )
    }

    pub fn sector_source(&self, http_client: Arc<dyn HttpClient>) -> Arc<dyn SectorSource> {
        if self.offline {
            return Arc::new(StaticSectorSource);
        }
        Arc::new(
            HttpSectorSource::new(http_client, &self.sector_api_key)
                .with_url(&self.sector_url)
                .with_timeout_ms(self.request_timeout_ms),
        )
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ValidationError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| ValidationError::InvalidEnvValue {
            name,
            value: raw.to_owned(),
        })
}
