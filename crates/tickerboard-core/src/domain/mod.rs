//! # Domain Models
//!
//! Canonical types shared by every tickerboard data stream.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Instrument`] | Catalog entry with simulation parameters and quote symbol |
//! | [`Quote`] | Current value and change snapshot for an instrument |
//! | [`ChartPoint`] | One labelled (price, moving average) sample |
//! | [`ChartSeries`] | Full series for an (instrument, range) selection |
//! | [`TimeRange`] | Chart window: `1D`, `1W`, `1M`, `3M`, `1Y`, `All` |
//! | [`SectorReading`] | Sector name with percent change |
//! | [`Symbol`] | Validated quote-source ticker |
//! | [`UtcDateTime`] | UTC timestamp for metadata |
//!
//! Construction validates invariants; quotes, series and sector readings are
//! plain snapshots with no identity across fetches.

mod models;
mod symbol;
mod time_range;
mod timestamp;

pub use models::{
    AssetClass, ChangeDirection, ChartPoint, ChartSeries, Instrument, Quote, SectorReading,
    SimulationParams,
};
pub use symbol::Symbol;
pub use time_range::{point_count_for, TimeRange, DEFAULT_POINT_COUNT};
pub use timestamp::UtcDateTime;
