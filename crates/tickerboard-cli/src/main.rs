mod cli;
mod commands;
mod error;
mod output;
mod telemetry;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::{Cli, Command};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.log_level.as_deref())?;

    let context = Context::from_cli(&cli)?;

    if let Command::Watch(args) = &cli.command {
        commands::watch::run(args, &context).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let envelope = commands::run(&cli, &context).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if !envelope.errors.is_empty() {
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
