mod catalog;
mod chart;
mod quotes;
mod sectors;
mod session;
pub mod watch;

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tickerboard_core::{
    DashboardConfig, Envelope, EnvelopeError, EnvelopeMeta, HttpClient, InstrumentCatalog,
    ReqwestHttpClient,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Shared services for one CLI invocation.
pub struct Context {
    pub config: DashboardConfig,
    pub catalog: Arc<InstrumentCatalog>,
    pub http_client: Arc<dyn HttpClient>,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = DashboardConfig::from_env()?.with_offline(cli.offline);
        if let Some(timeout_ms) = cli.timeout_ms {
            if timeout_ms == 0 {
                return Err(CliError::Command(String::from("--timeout-ms must be greater than zero")));
            }
            config = config.with_timeout_ms(timeout_ms);
        }

        Ok(Self {
            config,
            catalog: Arc::new(InstrumentCatalog::builtin()),
            http_client: Arc::new(ReqwestHttpClient::new()),
        })
    }
}

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }
}

/// Runs every command except `watch`, which streams instead of returning
/// one envelope.
pub async fn run(cli: &Cli, context: &Context) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();

    let result = match &cli.command {
        Command::Catalog => catalog::run(context)?,
        Command::Quotes => quotes::run(context).await?,
        Command::Chart(args) => chart::run(args, context)?,
        Command::Sectors => sectors::run(context).await?,
        Command::Signup(args) => session::signup(args, context)?,
        Command::Login(args) => session::login(args, context)?,
        Command::Logout => session::logout(context)?,
        Command::Whoami => session::whoami(context)?,
        Command::Watch(_) => {
            return Err(CliError::Command(String::from(
                "watch streams events and has no envelope",
            )))
        }
    };

    let CommandResult {
        data,
        warnings,
        errors,
    } = result;

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let mut meta = EnvelopeMeta::generate(latency_ms);
    if context.config.offline {
        meta.push_warning("offline mode: quotes and sectors come from built-in data");
    }
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
