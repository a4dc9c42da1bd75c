use std::sync::Arc;

use futures_util::future::join_all;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::data_source::{QuoteSource, SourceError, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::normalize::{normalize_decimal, normalize_percent};
use crate::{Instrument, InstrumentCatalog, Quote};

pub const ALPHAVANTAGE_QUERY_URL: &str = "https://www.alphavantage.co/query";

/// Live quotes from Alpha Vantage `GLOBAL_QUOTE`, one request per instrument.
///
/// All requests run concurrently and every one is awaited. A failing
/// instrument is logged and replaced by [`Quote::placeholder`]; the others
/// are unaffected.
#[derive(Clone)]
pub struct AlphaVantageQuoteSource {
    http_client: Arc<dyn HttpClient>,
    catalog: Arc<InstrumentCatalog>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageQuoteSource {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        catalog: Arc<InstrumentCatalog>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            catalog,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_QUERY_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn quote_or_placeholder(&self, instrument: &Instrument) -> Quote {
        match self.fetch_quote(instrument).await {
            Ok(quote) => quote,
            Err(error) => {
                warn!(
                    instrument = %instrument.name,
                    symbol = %instrument.symbol,
                    code = error.code(),
                    "quote fetch degraded to placeholder: {}",
                    error.message()
                );
                Quote::placeholder(instrument)
            }
        }
    }

    async fn fetch_quote(&self, instrument: &Instrument) -> Result<Quote, SourceError> {
        let request = HttpRequest::get(&self.base_url)
            .with_query("function", "GLOBAL_QUOTE")
            .with_query("symbol", instrument.symbol.as_str())
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            SourceError::unavailable(format!("alphavantage transport error: {}", e.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let payload: GlobalQuoteResponse = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::malformed(format!("failed to parse alphavantage response: {e}"))
        })?;

        debug!(symbol = %instrument.symbol, "alphavantage quote received");
        normalize_quote(instrument, payload)
    }
}

impl QuoteSource for AlphaVantageQuoteSource {
    fn quotes<'a>(&'a self) -> SourceFuture<'a, Vec<Quote>> {
        Box::pin(async move {
            let fetches = self
                .catalog
                .iter()
                .map(|instrument| self.quote_or_placeholder(instrument));
            Ok(join_all(fetches).await)
        })
    }
}

/// Local fallback: every instrument quoted at its base value with no change.
#[derive(Debug, Clone)]
pub struct OfflineQuoteSource {
    catalog: Arc<InstrumentCatalog>,
}

impl OfflineQuoteSource {
    pub fn new(catalog: Arc<InstrumentCatalog>) -> Self {
        Self { catalog }
    }
}

impl QuoteSource for OfflineQuoteSource {
    fn quotes<'a>(&'a self) -> SourceFuture<'a, Vec<Quote>> {
        Box::pin(async move {
            Ok(self
                .catalog
                .iter()
                .map(|instrument| Quote {
                    value: instrument.base_value,
                    placeholder: false,
                    ..Quote::placeholder(instrument)
                })
                .collect())
        })
    }
}

// Alpha Vantage answers throttled calls with 200 and a "Note" or
// "Information" message instead of a quote.
#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<Map<String, Value>>,
    #[serde(rename = "Note", default)]
    note: Option<String>,
    #[serde(rename = "Information", default)]
    information: Option<String>,
}

fn normalize_quote(
    instrument: &Instrument,
    payload: GlobalQuoteResponse,
) -> Result<Quote, SourceError> {
    let Some(fields) = payload.quote.filter(|fields| !fields.is_empty()) else {
        return Err(match payload.note.or(payload.information) {
            Some(notice) => SourceError::rate_limited(notice),
            None => SourceError::malformed("no quote data in alphavantage response"),
        });
    };

    let price = fields.get("05. price");
    let has_price = match price {
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    };
    if !has_price {
        return Err(SourceError::malformed("alphavantage quote is missing '05. price'"));
    }

    Ok(Quote {
        name: instrument.name.clone(),
        display_name: instrument.display_name.clone(),
        value: normalize_decimal(price).unwrap_or(0.0),
        change: normalize_decimal(fields.get("09. change")).unwrap_or(0.0),
        change_percent: normalize_percent(fields.get("10. change percent")),
        placeholder: false,
    })
}
