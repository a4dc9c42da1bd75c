use serde::Serialize;
use tickerboard_core::Instrument;

use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct CatalogResponseData<'a> {
    instruments: Vec<&'a Instrument>,
}

pub fn run(context: &Context) -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(CatalogResponseData {
        instruments: context.catalog.iter().collect(),
    })?;
    Ok(CommandResult::ok(data))
}
