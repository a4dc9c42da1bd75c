use std::sync::Arc;

use serde::Serialize;
use tickerboard_core::{
    ChartPoint, EnvelopeError, RandomWalkGenerator, SourceError, TimeRange, ValidationError,
};

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct ChartResponseData {
    instrument: String,
    range: String,
    points: Vec<ChartPoint>,
}

pub fn run(args: &ChartArgs, context: &Context) -> Result<CommandResult, CliError> {
    let instrument = args.instrument.trim();
    if instrument.is_empty() {
        return Err(ValidationError::EmptyInstrumentName.into());
    }

    let mut generator = RandomWalkGenerator::new(Arc::clone(&context.catalog));
    if let Some(seed) = args.seed {
        generator = generator.with_seed(seed);
    }

    let label = args.range.trim();
    let range = label.parse::<TimeRange>().ok();
    let mut result = match generate(&generator, instrument, label, range) {
        Ok(data) => CommandResult::ok(serde_json::to_value(data)?),
        Err(error) => {
            CommandResult::ok(serde_json::Value::Null).with_error(EnvelopeError::from(&error))
        }
    };

    if range.is_none() {
        result = result.with_warning(format!(
            "range '{label}' is not recognised, generating the default point count"
        ));
    }
    if context.catalog.get(instrument).is_none() {
        result = result.with_warning(format!(
            "'{instrument}' is not in the catalog, using default simulation parameters"
        ));
    }
    Ok(result)
}

fn generate(
    generator: &RandomWalkGenerator,
    instrument: &str,
    label: &str,
    range: Option<TimeRange>,
) -> Result<ChartResponseData, SourceError> {
    match range {
        Some(range) => {
            let series = generator.generate(instrument, range)?;
            Ok(ChartResponseData {
                instrument: series.instrument,
                range: range.to_string(),
                points: series.points,
            })
        }
        None => Ok(ChartResponseData {
            instrument: instrument.to_owned(),
            range: label.to_owned(),
            points: generator.generate_for_label(instrument, label)?,
        }),
    }
}
