//! # tickerboard-core
//!
//! Data services behind a market dashboard: an instrument catalog, live and
//! offline quote sources, a sector-performance source, a simulated chart
//! generator, the refresh orchestrator that keeps all three streams current,
//! and a local session store.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌──────────────────────┐
//!                   │  RefreshOrchestrator │
//!                   └──────────┬───────────┘
//!        ┌─────────────────────┼──────────────────────┐
//!        ▼                     ▼                      ▼
//!  QuoteSource           ChartSource            SectorSource
//!  (join_all over        (token-guarded,        (interval poller,
//!   the catalog)          latest wins)           Loading/Ready/Failed)
//!        │                     │                      │
//!        ▼                     ▼                      ▼
//!   HttpClient        RandomWalkGenerator         HttpClient
//! ```
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`domain`] | Instruments, quotes, chart points, time ranges, sector readings |
//! | [`catalog`] | Built-in instrument list and simulation parameters |
//! | [`generator`] | Random walk with trailing moving average |
//! | [`quote_source`] | Alpha Vantage `GLOBAL_QUOTE` fan-out and offline fallback |
//! | [`sector_source`] | Sector-performance endpoint and static fallback |
//! | [`orchestrator`] | Stream lifecycle, selection tokens, sector polling |
//! | [`session`] | Signup, login and greeting over a pluggable backend |
//! | [`config`] | Environment-driven configuration |
//! | [`envelope`] / [`stream`] | Machine-readable output shapes |

pub mod catalog;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod generator;
pub mod http_client;
pub mod normalize;
pub mod orchestrator;
pub mod quote_source;
pub mod sector_source;
pub mod session;
pub mod stream;

pub use catalog::InstrumentCatalog;
pub use config::DashboardConfig;
pub use data_source::{
    ChartSource, QuoteSource, SectorSource, SourceError, SourceErrorKind, SourceFuture,
};
pub use domain::{
    point_count_for, AssetClass, ChangeDirection, ChartPoint, ChartSeries, Instrument, Quote,
    SectorReading, SimulationParams, Symbol, TimeRange, UtcDateTime, DEFAULT_POINT_COUNT,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use generator::{
    generate_series, generate_series_for_label, trailing_moving_average, RandomWalkGenerator,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use orchestrator::{
    ChartState, QuoteState, RefreshConfig, RefreshOrchestrator, SectorState, Selection,
};
pub use quote_source::{AlphaVantageQuoteSource, OfflineQuoteSource};
pub use sector_source::{HttpSectorSource, StaticSectorSource};
pub use session::{
    FileBackend, MemoryBackend, SessionBackend, SessionError, SessionSnapshot, SessionStore, User,
};
pub use stream::{NdjsonStreamWriter, StreamError, StreamEvent, StreamEventType};
