use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::data_source::{SectorSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::normalize::normalize_percent;
use crate::SectorReading;

pub const DEFAULT_SECTOR_URL: &str =
    "https://financialmodelingprep.com/api/v3/sectors-performance";

/// Label used when an entry carries no usable sector name.
pub const UNKNOWN_SECTOR: &str = "Unknown sector";

const NAME_KEYS: [&str; 2] = ["sector", "name"];
const CHANGE_KEYS: [&str; 3] = ["changesPercentage", "changePercent", "change"];

/// Sector performance from a single remote aggregate endpoint.
///
/// The whole list succeeds or fails together.
#[derive(Clone)]
pub struct HttpSectorSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    api_key: String,
    timeout_ms: u64,
}

impl HttpSectorSource {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            url: String::from(DEFAULT_SECTOR_URL),
            api_key: api_key.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch(&self) -> Result<Vec<SectorReading>, SourceError> {
        let request = HttpRequest::get(&self.url)
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("sector transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "sector endpoint returned status {}",
                response.status
            )));
        }

        let body: Value = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::malformed(format!("failed to parse sector response: {e}")))?;

        let readings = parse_sector_list(&body)?;
        debug!(count = readings.len(), "sector performance received");
        Ok(readings)
    }
}

impl SectorSource for HttpSectorSource {
    fn sectors<'a>(&'a self) -> SourceFuture<'a, Vec<SectorReading>> {
        Box::pin(self.fetch())
    }
}

/// Normalizes a JSON array of `{sector, changesPercentage}` records.
pub fn parse_sector_list(body: &Value) -> Result<Vec<SectorReading>, SourceError> {
    let entries = body.as_array().ok_or_else(|| {
        SourceError::malformed("sector response is not a JSON array")
    })?;

    Ok(entries
        .iter()
        .map(|entry| {
            let name = NAME_KEYS
                .iter()
                .find_map(|key| entry.get(key).and_then(Value::as_str))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_SECTOR);
            let change = CHANGE_KEYS.iter().find_map(|key| entry.get(key));
            SectorReading::new(name, normalize_percent(change))
        })
        .collect())
}

/// Fixed readings used when no sector endpoint is available.
#[derive(Debug, Clone, Default)]
pub struct StaticSectorSource;

impl StaticSectorSource {
    pub fn readings() -> Vec<SectorReading> {
        [
            ("Technology", 1.23),
            ("Energy", -0.57),
            ("Healthcare", 0.89),
            ("Financials", -1.12),
            ("Consumer Discretionary", 0.25),
            ("Industrials", -0.91),
            ("Materials", 1.45),
            ("Utilities", 0.04),
        ]
        .into_iter()
        .map(|(name, change)| SectorReading::new(name, change))
        .collect()
    }
}

impl SectorSource for StaticSectorSource {
    fn sectors<'a>(&'a self) -> SourceFuture<'a, Vec<SectorReading>> {
        Box::pin(async { Ok(Self::readings()) })
    }
}
