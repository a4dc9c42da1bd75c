//! `watch`: mounts the dashboard and streams every state change as NDJSON
//! until the duration elapses or Ctrl-C is pressed.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tickerboard_core::{
    ChartState, NdjsonStreamWriter, RandomWalkGenerator, RefreshConfig, RefreshOrchestrator,
    StreamEventType,
};
use tokio::sync::watch;
use tracing::info;

use crate::cli::WatchArgs;
use crate::error::CliError;

use super::Context;

pub async fn run(args: &WatchArgs, context: &Context) -> Result<(), CliError> {
    let config = &context.config;
    let orchestrator = RefreshOrchestrator::new(
        config.quote_source(Arc::clone(&context.http_client), Arc::clone(&context.catalog)),
        config.sector_source(Arc::clone(&context.http_client)),
        Arc::new(RandomWalkGenerator::new(Arc::clone(&context.catalog))),
        RefreshConfig {
            default_range: args.range,
            ..config.refresh_config()
        },
    );

    let stdout = io::stdout();
    let mut writer = NdjsonStreamWriter::new(stdout.lock());
    let result = stream(&orchestrator, args, &mut writer).await;
    orchestrator.teardown();
    result
}

async fn stream<W: Write>(
    orchestrator: &RefreshOrchestrator,
    args: &WatchArgs,
    writer: &mut NdjsonStreamWriter<W>,
) -> Result<(), CliError> {
    let mut quotes = orchestrator.subscribe_quotes();
    let mut chart = orchestrator.subscribe_chart();
    let mut sectors = orchestrator.subscribe_sectors();

    let deadline = tokio::time::sleep(Duration::from_secs(args.duration_secs));
    tokio::pin!(deadline);

    orchestrator.mount().await;
    for instrument in &args.select {
        orchestrator.select_instrument(instrument.as_str());
    }

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            changed = quotes.changed() => {
                if changed.is_err() {
                    break;
                }
                emit(writer, StreamEventType::Quotes, &mut quotes)?;
            }
            changed = chart.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = chart.borrow_and_update().clone();
                let event = ChartEvent {
                    current: state.is_current(),
                    state: &state,
                };
                writer.emit(StreamEventType::Chart, &event)?;
            }
            changed = sectors.changed() => {
                if changed.is_err() {
                    break;
                }
                emit(writer, StreamEventType::Sectors, &mut sectors)?;
            }
        }
    }

    Ok(())
}

/// Chart payload with a flag telling whether the series matches the selection.
#[derive(Serialize)]
struct ChartEvent<'a> {
    #[serde(flatten)]
    state: &'a ChartState,
    current: bool,
}

fn emit<W: Write, T: Serialize + Clone>(
    writer: &mut NdjsonStreamWriter<W>,
    event: StreamEventType,
    receiver: &mut watch::Receiver<T>,
) -> Result<(), CliError> {
    let state = receiver.borrow_and_update().clone();
    writer.emit(event, &state)?;
    Ok(())
}
