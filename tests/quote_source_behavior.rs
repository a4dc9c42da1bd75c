//! Behavior tests for the quote fan-out.
//!
//! A scripted HTTP client stands in for Alpha Vantage so each instrument's
//! outcome can be chosen independently.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickerboard_core::{
    AlphaVantageQuoteSource, HttpClient, HttpError, HttpRequest, HttpResponse, InstrumentCatalog,
    QuoteSource,
};

enum Scripted {
    Respond(HttpResponse),
    Fail(HttpError),
    Delay(Duration, HttpResponse),
}

#[derive(Default)]
struct ScriptedHttpClient {
    by_symbol: HashMap<String, Scripted>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn with(mut self, symbol: &str, outcome: Scripted) -> Self {
        self.by_symbol.insert(symbol.to_owned(), outcome);
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let symbol = request.query_param("symbol").unwrap_or_default().to_owned();
            self.requests.lock().expect("requests lock").push(request);

            match self.by_symbol.get(&symbol) {
                Some(Scripted::Respond(response)) => Ok(response.clone()),
                Some(Scripted::Fail(error)) => Err(error.clone()),
                Some(Scripted::Delay(delay, response)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(response.clone())
                }
                None => Ok(global_quote("100.00", "1.00", "1.0000%")),
            }
        })
    }
}

fn global_quote(price: &str, change: &str, percent: &str) -> HttpResponse {
    HttpResponse::ok_json(format!(
        r#"{{"Global Quote": {{"05. price": "{price}", "09. change": "{change}", "10. change percent": "{percent}"}}}}"#
    ))
}

fn source(client: Arc<ScriptedHttpClient>) -> AlphaVantageQuoteSource {
    AlphaVantageQuoteSource::new(client, Arc::new(InstrumentCatalog::builtin()), "test-key")
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn when_one_instrument_fails_others_still_return_live_quotes() {
    // Given: Nine instruments where only gold's request fails
    let client = Arc::new(
        ScriptedHttpClient::default()
            .with("GLD", Scripted::Fail(HttpError::new("connection reset"))),
    );

    // When: Quotes are fetched
    let quotes = source(Arc::clone(&client))
        .quotes()
        .await
        .expect("fan-out never fails as a whole");

    // Then: Nine quotes come back and only gold is a placeholder
    assert_eq!(quotes.len(), 9);
    let placeholders: Vec<&str> = quotes
        .iter()
        .filter(|q| q.is_placeholder())
        .map(|q| q.name.as_str())
        .collect();
    assert_eq!(placeholders, vec!["Gold"]);

    let gold = quotes.iter().find(|q| q.name == "Gold").expect("gold present");
    assert_eq!(gold.value, 0.0);
    assert_eq!(gold.change, 0.0);
    assert_eq!(gold.change_percent, 0.0);
    assert_eq!(gold.display_name, "SPDR Gold Shares");
}

#[tokio::test]
async fn quotes_keep_catalog_order() {
    // Given: A client that answers every symbol
    let client = Arc::new(ScriptedHttpClient::default());

    // When: Quotes are fetched
    let quotes = source(client).quotes().await.expect("quotes");

    // Then: Results follow catalog order
    let catalog = InstrumentCatalog::builtin();
    let names: Vec<&str> = quotes.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, catalog.names());
}

#[tokio::test(start_paused = true)]
async fn when_one_request_is_slow_every_quote_still_waits_for_it() {
    // Given: Bitcoin answers after two seconds, everything else immediately
    let client = Arc::new(ScriptedHttpClient::default().with(
        "BTC-USD",
        Scripted::Delay(
            Duration::from_secs(2),
            global_quote("67000.00", "-120.50", "-0.1795%"),
        ),
    ));
    let started = tokio::time::Instant::now();

    // When: Quotes are fetched
    let quotes = source(client).quotes().await.expect("quotes");

    // Then: The batch resolves once, after the slowest request, with real data
    assert!(started.elapsed() >= Duration::from_secs(2));
    let bitcoin = quotes.iter().find(|q| q.name == "Bitcoin").expect("bitcoin");
    assert_eq!(bitcoin.value, 67_000.0);
    assert_eq!(bitcoin.change, -120.5);
    assert_eq!(bitcoin.change_percent, -0.1795);
}

// =============================================================================
// Request shape and degraded responses
// =============================================================================

#[tokio::test]
async fn each_instrument_is_requested_with_its_symbol_and_key() {
    let client = Arc::new(ScriptedHttpClient::default());
    source(Arc::clone(&client)).quotes().await.expect("quotes");

    let requests = client.requests();
    assert_eq!(requests.len(), 9);
    for request in &requests {
        assert_eq!(request.query_param("function"), Some("GLOBAL_QUOTE"));
        assert_eq!(request.query_param("apikey"), Some("test-key"));
        assert_eq!(request.timeout_ms, 5_000);
    }

    let mut symbols: Vec<&str> = requests
        .iter()
        .filter_map(|r| r.query_param("symbol"))
        .collect();
    symbols.sort_unstable();
    assert_eq!(
        symbols,
        vec!["BTC-USD", "DIA", "GLD", "IWM", "QQQ", "SLV", "SPY", "TLT", "USO"]
    );
}

#[tokio::test]
async fn when_upstream_throttles_or_errors_quotes_degrade_to_placeholders() {
    // Given: A throttle notice, a server error and an unparseable body
    let client = Arc::new(
        ScriptedHttpClient::default()
            .with(
                "SPY",
                Scripted::Respond(HttpResponse::ok_json(
                    r#"{"Note": "Thank you for using Alpha Vantage!"}"#,
                )),
            )
            .with(
                "QQQ",
                Scripted::Respond(HttpResponse::with_status(503, "unavailable")),
            )
            .with("DIA", Scripted::Respond(HttpResponse::ok_json("<html>"))),
    );

    // When: Quotes are fetched
    let quotes = source(client).quotes().await.expect("quotes");

    // Then: Those three are placeholders, the rest are live
    let placeholders: Vec<&str> = quotes
        .iter()
        .filter(|q| q.is_placeholder())
        .map(|q| q.name.as_str())
        .collect();
    assert_eq!(placeholders, vec!["S&P 500", "Nasdaq", "Dow Jones"]);
    assert_eq!(quotes.iter().filter(|q| q.value == 100.0).count(), 6);
}

#[tokio::test]
async fn percent_strings_are_normalized() {
    let client = Arc::new(
        ScriptedHttpClient::default()
            .with("TLT", Scripted::Respond(global_quote("93.10", "0.44", "47.39%"))),
    );
    let quotes = source(client).quotes().await.expect("quotes");

    let bond = quotes.iter().find(|q| q.name == "10-Year Bond").expect("bond");
    assert_eq!(bond.change_percent, 47.39);
}
