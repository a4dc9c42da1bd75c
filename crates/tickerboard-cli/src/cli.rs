//! CLI argument definitions for tickerboard.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `catalog` | List catalog instruments and simulation parameters |
//! | `quotes` | Fetch one quote per catalog instrument |
//! | `chart` | Generate a chart series for an instrument and range |
//! | `sectors` | Fetch sector performance once |
//! | `watch` | Run the live dashboard and print NDJSON state events |
//! | `signup` / `login` / `logout` / `whoami` | Local session management |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--offline` | `false` | Use built-in quote and sector data |
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | env or `5000` | Per-request timeout in ms |
//! | `--log-level` | `RUST_LOG` or `warn` | Diagnostics filter, written to stderr |
//!
//! # Examples
//!
//! ```bash
//! tickerboard quotes --format table
//! tickerboard chart Gold --range 3M --seed 7 --pretty
//! tickerboard watch --select Nasdaq --range 1Y --duration-secs 120
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use tickerboard_core::TimeRange;

/// Market dashboard data from the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "tickerboard",
    author,
    version,
    about = "Market dashboard data: quotes, charts, sector performance"
)]
pub struct Cli {
    /// Use built-in data instead of calling remote APIs.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds. Overrides TICKERBOARD_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log filter, e.g. `debug` or `tickerboard_core=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON envelope.
    Json,
    /// Human-readable summary.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List catalog instruments.
    Catalog,
    /// Fetch one quote per catalog instrument.
    Quotes,
    /// Generate a simulated chart series.
    Chart(ChartArgs),
    /// Fetch sector performance once.
    Sectors,
    /// Run the dashboard refresh loop and stream state changes as NDJSON.
    Watch(WatchArgs),
    /// Register a local user and log in.
    Signup(CredentialArgs),
    /// Log in as a registered user.
    Login(CredentialArgs),
    /// Clear the logged-in user.
    Logout,
    /// Show the logged-in user and greeting.
    Whoami,
}

#[derive(Debug, Args)]
pub struct ChartArgs {
    /// Instrument name as listed by `catalog`, e.g. "Gold".
    pub instrument: String,

    /// Chart range: 1D, 1W, 1M, 3M, 1Y or All. Other labels get 30 daily points.
    #[arg(long, default_value = "1D")]
    pub range: String,

    /// Seed for a reproducible series.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Range for the initial selection.
    #[arg(long, default_value = "1D")]
    pub range: TimeRange,

    /// Instruments to select in order after mount; the last one wins.
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Stop after this many seconds.
    #[arg(long, default_value_t = 180)]
    pub duration_secs: u64,
}

#[derive(Debug, Args)]
pub struct CredentialArgs {
    pub username: String,
    pub password: String,
}
