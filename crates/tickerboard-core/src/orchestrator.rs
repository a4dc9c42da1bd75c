//! # Refresh Orchestration
//!
//! Owns the lifecycle of the three dashboard data streams:
//!
//! | Stream | States | Trigger |
//! |--------|--------|---------|
//! | quotes | `Loading → Ready` | once per [`mount`](RefreshOrchestrator::mount) |
//! | chart | token-guarded series | every [`set_selection`](RefreshOrchestrator::set_selection) |
//! | sectors | `Loading → Ready / Failed` | background poller, every `sector_poll_interval` |
//!
//! Each stream publishes through its own `tokio::sync::watch` channel and is
//! written by exactly one task at a time. Failures never propagate to the
//! caller; they are logged and published as a degraded state.
//!
//! ## Stale chart results
//!
//! `set_selection` bumps a monotonically increasing token stored next to the
//! selection. A finished fetch applies its series only if its token is still
//! the current one, so an older request finishing late cannot overwrite a
//! newer selection.
//!
//! ## Poller lifetime
//!
//! The sector poller is a spawned task owned by the orchestrator. Starting it
//! twice is a no-op, [`teardown`](RefreshOrchestrator::teardown) aborts it,
//! and dropping the orchestrator tears it down as well.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::data_source::{ChartSource, QuoteSource, SectorSource};
use crate::{ChartSeries, Quote, SectorReading, TimeRange};

pub const DEFAULT_SECTOR_POLL_INTERVAL: Duration = Duration::from_secs(60);

const MIN_SECTOR_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timing and defaults for a [`RefreshOrchestrator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshConfig {
    pub sector_poll_interval: Duration,
    /// Range selected together with the first instrument after mount.
    pub default_range: TimeRange,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            sector_poll_interval: DEFAULT_SECTOR_POLL_INTERVAL,
            default_range: TimeRange::OneDay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "quotes", rename_all = "snake_case")]
pub enum QuoteState {
    Loading,
    Ready(Vec<Quote>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectorState {
    Loading,
    Ready { sectors: Vec<SectorReading> },
    Failed { message: String },
}

/// The (instrument, range) pair that keys chart requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub instrument: String,
    pub range: TimeRange,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    /// Token of the most recent selection.
    pub token: u64,
    pub selection: Option<Selection>,
    /// Last applied series. May still belong to the previous selection while
    /// the current one is in flight.
    pub series: Option<ChartSeries>,
}

impl ChartState {
    /// Whether the displayed series belongs to the current selection.
    pub fn is_current(&self) -> bool {
        match (&self.selection, &self.series) {
            (Some(selection), Some(series)) => {
                selection.instrument == series.instrument && selection.range == series.range
            }
            _ => false,
        }
    }
}

pub struct RefreshOrchestrator {
    quote_source: Arc<dyn QuoteSource>,
    sector_source: Arc<dyn SectorSource>,
    chart_source: Arc<dyn ChartSource>,
    config: RefreshConfig,
    quotes: watch::Sender<QuoteState>,
    sectors: Arc<watch::Sender<SectorState>>,
    chart: Arc<watch::Sender<ChartState>>,
    sector_poller: Mutex<Option<JoinHandle<()>>>,
    chart_task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshOrchestrator {
    pub fn new(
        quote_source: Arc<dyn QuoteSource>,
        sector_source: Arc<dyn SectorSource>,
        chart_source: Arc<dyn ChartSource>,
        config: RefreshConfig,
    ) -> Self {
        let (quotes, _) = watch::channel(QuoteState::Loading);
        let (sectors, _) = watch::channel(SectorState::Loading);
        let (chart, _) = watch::channel(ChartState::default());

        Self {
            quote_source,
            sector_source,
            chart_source,
            config,
            quotes,
            sectors: Arc::new(sectors),
            chart: Arc::new(chart),
            sector_poller: Mutex::new(None),
            chart_task: Mutex::new(None),
        }
    }

    pub const fn config(&self) -> RefreshConfig {
        self.config
    }

    /// Starts the sector poller, loads quotes once, then selects the first
    /// returned instrument with the default range. Returns that selection's
    /// token, or `None` when no quotes came back.
    pub async fn mount(&self) -> Option<u64> {
        self.start_sector_poll();

        let quotes = self.load_quotes().await;
        let first = quotes.first()?;
        Some(self.set_selection(first.name.clone(), self.config.default_range))
    }

    /// Runs the quote source and publishes `Ready`. A source error is logged
    /// and published as an empty list.
    pub async fn load_quotes(&self) -> Vec<Quote> {
        self.quotes.send_replace(QuoteState::Loading);

        let quotes = match self.quote_source.quotes().await {
            Ok(quotes) => quotes,
            Err(error) => {
                warn!(
                    code = error.code(),
                    "quote load failed, publishing empty list: {}",
                    error.message()
                );
                Vec::new()
            }
        };

        info!(count = quotes.len(), "quotes ready");
        self.quotes.send_replace(QuoteState::Ready(quotes.clone()));
        quotes
    }

    /// Records a new selection and starts fetching its series. Returns the
    /// request token; only the latest token's result is ever applied.
    pub fn set_selection(&self, instrument: impl Into<String>, range: TimeRange) -> u64 {
        let selection = Selection {
            instrument: instrument.into(),
            range,
        };

        let mut token = 0;
        self.chart.send_modify(|state| {
            state.token += 1;
            token = state.token;
            state.selection = Some(selection.clone());
        });
        debug!(token, instrument = %selection.instrument, range = %range, "chart selection changed");

        let chart = Arc::clone(&self.chart);
        let source = Arc::clone(&self.chart_source);
        let task = tokio::spawn(async move {
            match source.series(&selection.instrument, selection.range).await {
                Ok(series) => {
                    apply_series(&chart, token, series);
                }
                Err(error) => warn!(
                    token,
                    instrument = %selection.instrument,
                    code = error.code(),
                    "chart fetch failed, keeping previous series: {}",
                    error.message()
                ),
            }
        });
        if let Some(previous) = lock(&self.chart_task).replace(task) {
            previous.abort();
        }

        token
    }

    /// Switches instrument, keeping the current range.
    pub fn select_instrument(&self, instrument: impl Into<String>) -> u64 {
        let range = self
            .chart
            .borrow()
            .selection
            .as_ref()
            .map_or(self.config.default_range, |s| s.range);
        self.set_selection(instrument, range)
    }

    /// Switches range, keeping the current instrument. `None` before any
    /// instrument has been selected.
    pub fn select_range(&self, range: TimeRange) -> Option<u64> {
        let instrument = self
            .chart
            .borrow()
            .selection
            .as_ref()
            .map(|s| s.instrument.clone())?;
        Some(self.set_selection(instrument, range))
    }

    /// Spawns the sector poller unless one is already running. The first
    /// fetch happens immediately, then once per interval.
    pub fn start_sector_poll(&self) -> bool {
        let mut poller = lock(&self.sector_poller);
        if poller.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        let source = Arc::clone(&self.sector_source);
        let sectors = Arc::clone(&self.sectors);
        let period = self.config.sector_poll_interval.max(MIN_SECTOR_POLL_INTERVAL);

        *poller = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                refresh_sectors(source.as_ref(), &sectors).await;
            }
        }));
        info!(period_secs = period.as_secs_f64(), "sector poller started");
        true
    }

    pub fn is_polling(&self) -> bool {
        lock(&self.sector_poller)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the sector poller and any in-flight chart fetch.
    pub fn teardown(&self) {
        if let Some(handle) = lock(&self.sector_poller).take() {
            handle.abort();
            info!("sector poller stopped");
        }
        if let Some(handle) = lock(&self.chart_task).take() {
            handle.abort();
        }
    }

    pub fn subscribe_quotes(&self) -> watch::Receiver<QuoteState> {
        self.quotes.subscribe()
    }

    pub fn subscribe_sectors(&self) -> watch::Receiver<SectorState> {
        self.sectors.subscribe()
    }

    pub fn subscribe_chart(&self) -> watch::Receiver<ChartState> {
        self.chart.subscribe()
    }

    pub fn quote_state(&self) -> QuoteState {
        self.quotes.borrow().clone()
    }

    pub fn sector_state(&self) -> SectorState {
        self.sectors.borrow().clone()
    }

    pub fn chart_state(&self) -> ChartState {
        self.chart.borrow().clone()
    }
}

impl Drop for RefreshOrchestrator {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn apply_series(chart: &watch::Sender<ChartState>, token: u64, series: ChartSeries) -> bool {
    let applied = chart.send_if_modified(|state| {
        if state.token != token {
            return false;
        }
        state.series = Some(series);
        true
    });

    if !applied {
        debug!(token, "discarding stale chart series");
    }
    applied
}

async fn refresh_sectors(source: &dyn SectorSource, sectors: &watch::Sender<SectorState>) {
    match source.sectors().await {
        Ok(readings) => {
            debug!(count = readings.len(), "sector readings replaced");
            sectors.send_replace(SectorState::Ready { sectors: readings });
        }
        Err(err) => {
            error!(code = err.code(), "sector refresh failed: {}", err.message());
            sectors.send_replace(SectorState::Failed {
                message: err.to_string(),
            });
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(instrument: &str, range: TimeRange) -> ChartSeries {
        ChartSeries {
            instrument: instrument.to_owned(),
            range,
            points: Vec::new(),
        }
    }

    #[test]
    fn stale_token_is_not_applied() {
        let (chart, _) = watch::channel(ChartState {
            token: 2,
            ..ChartState::default()
        });

        assert!(!apply_series(&chart, 1, series("Gold", TimeRange::OneDay)));
        assert!(chart.borrow().series.is_none());

        assert!(apply_series(&chart, 2, series("Gold", TimeRange::OneYear)));
        assert_eq!(
            chart.borrow().series.as_ref().map(|s| s.range),
            Some(TimeRange::OneYear)
        );
    }

    #[test]
    fn chart_state_is_current_only_for_matching_series() {
        let mut state = ChartState {
            token: 1,
            selection: Some(Selection {
                instrument: String::from("Gold"),
                range: TimeRange::OneYear,
            }),
            series: Some(series("Gold", TimeRange::OneDay)),
        };
        assert!(!state.is_current());

        state.series = Some(series("Gold", TimeRange::OneYear));
        assert!(state.is_current());
    }

    #[test]
    fn sector_state_serializes_with_status_tag() {
        let json = serde_json::to_value(SectorState::Failed {
            message: String::from("down"),
        })
        .expect("serialize");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "down");
    }

    #[test]
    fn default_config_polls_every_minute() {
        let config = RefreshConfig::default();
        assert_eq!(config.sector_poll_interval, Duration::from_secs(60));
        assert_eq!(config.default_range, TimeRange::OneDay);
    }
}
