use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::CliError;

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs go to stderr so stdout stays
/// machine-readable. `--log-level` wins over `RUST_LOG`.
pub fn init_tracing(log_level: Option<&str>) -> Result<(), CliError> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).map_err(|e| CliError::Telemetry(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(stderr_layer)
        .try_init()
        .map_err(|e| CliError::Telemetry(e.to_string()))
}
