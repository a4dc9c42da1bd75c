use std::sync::Arc;

use serde::Serialize;
use tickerboard_core::{ChangeDirection, EnvelopeError, SectorReading};

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct SectorRow {
    name: String,
    #[serde(rename = "changePercent")]
    change_percent: f64,
    formatted: String,
    direction: ChangeDirection,
}

impl From<SectorReading> for SectorRow {
    fn from(reading: SectorReading) -> Self {
        Self {
            formatted: reading.format_change(),
            direction: reading.direction(),
            name: reading.name,
            change_percent: reading.change_percent,
        }
    }
}

#[derive(Debug, Serialize)]
struct SectorResponseData {
    sectors: Vec<SectorRow>,
}

pub async fn run(context: &Context) -> Result<CommandResult, CliError> {
    let source = context
        .config
        .sector_source(Arc::clone(&context.http_client));

    match source.sectors().await {
        Ok(readings) => {
            let sectors = readings.into_iter().map(SectorRow::from).collect();
            Ok(CommandResult::ok(serde_json::to_value(SectorResponseData {
                sectors,
            })?))
        }
        Err(error) => {
            let data = serde_json::to_value(SectorResponseData {
                sectors: Vec::new(),
            })?;
            Ok(CommandResult::ok(data).with_error(EnvelopeError::from(&error)))
        }
    }
}
