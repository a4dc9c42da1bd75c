use std::sync::Arc;

use serde::Serialize;
use tickerboard_core::{EnvelopeError, Quote};

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    quotes: Vec<Quote>,
}

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    let source = context
        .config
        .quote_source(Arc::clone(&context.http_client), Arc::clone(&context.catalog));

    match source.quotes().await {
        Ok(quotes) => {
            let warnings = if context.config.offline {
                Vec::new()
            } else {
                quotes
                    .iter()
                    .filter(|quote| quote.is_placeholder())
                    .map(|quote| {
                        format!("quote for '{}' unavailable, showing placeholder", quote.name)
                    })
                    .collect()
            };
            let data = serde_json::to_value(QuoteResponseData { quotes })?;
            Ok(CommandResult::ok(data).with_warnings(warnings))
        }
        Err(error) => {
            let data = serde_json::to_value(QuoteResponseData { quotes: Vec::new() })?;
            Ok(CommandResult::ok(data).with_error(EnvelopeError::from(&error)))
        }
    }
}
