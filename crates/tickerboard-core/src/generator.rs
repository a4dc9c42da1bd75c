//! Random-walk chart series with a trailing moving-average overlay.
//!
//! [`generate_series`] is the pure core: parameters, range, anchor time and a
//! seeded RNG fully determine the output. [`RandomWalkGenerator`] wraps it
//! behind [`ChartSource`] so a historical-data source can replace it without
//! touching callers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::data_source::{ChartSource, SourceError, SourceFuture};
use crate::{
    point_count_for, ChartPoint, ChartSeries, InstrumentCatalog, SimulationParams, TimeRange,
};

/// Prices never fall below this fraction of the base value.
pub const PRICE_FLOOR_RATIO: f64 = 0.7;

const MIN_MOVING_AVERAGE_WINDOW: usize = 5;
const SESSION_OPEN_HOUR: usize = 9;
const SESSION_MINUTES: usize = 7 * 60;

/// Trailing window size: `max(5, count / 10)`.
pub const fn moving_average_window(count: usize) -> usize {
    let scaled = count / 10;
    if scaled > MIN_MOVING_AVERAGE_WINDOW {
        scaled
    } else {
        MIN_MOVING_AVERAGE_WINDOW
    }
}

/// Generates `range.point_count()` points ending at `anchor`.
pub fn generate_series(
    params: SimulationParams,
    range: TimeRange,
    anchor: OffsetDateTime,
    rng: &mut fastrand::Rng,
) -> Vec<ChartPoint> {
    build_points(params, range.point_count(), Some(range), anchor, rng)
}

/// Same as [`generate_series`] for a raw range label. Unrecognised labels get
/// [`DEFAULT_POINT_COUNT`](crate::DEFAULT_POINT_COUNT) points with daily labels.
pub fn generate_series_for_label(
    params: SimulationParams,
    label: &str,
    anchor: OffsetDateTime,
    rng: &mut fastrand::Rng,
) -> Vec<ChartPoint> {
    let range = label.parse::<TimeRange>().ok();
    build_points(params, point_count_for(label), range, anchor, rng)
}

fn build_points(
    params: SimulationParams,
    count: usize,
    range: Option<TimeRange>,
    anchor: OffsetDateTime,
    rng: &mut fastrand::Rng,
) -> Vec<ChartPoint> {
    let prices = random_walk(params, count, rng);
    let averages = trailing_moving_average(&prices, moving_average_window(count));

    prices
        .into_iter()
        .zip(averages)
        .enumerate()
        .map(|(index, (price, moving_average))| ChartPoint {
            date: point_label(index, count, range, anchor),
            price,
            moving_average,
        })
        .collect()
}

fn random_walk(params: SimulationParams, count: usize, rng: &mut fastrand::Rng) -> Vec<f64> {
    let floor = params.base_value * PRICE_FLOOR_RATIO;
    let mut current = params.base_value;

    (0..count)
        .map(|_| {
            let step = (rng.f64() - 0.5) * params.volatility;
            current = (current + step).max(floor);
            current
        })
        .collect()
}

/// Average of the last `min(i + 1, window)` prices ending at each index.
pub fn trailing_moving_average(prices: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..prices.len())
        .map(|index| {
            let start = (index + 1).saturating_sub(window);
            let slice = &prices[start..=index];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

fn point_label(
    index: usize,
    count: usize,
    range: Option<TimeRange>,
    anchor: OffsetDateTime,
) -> String {
    match range {
        Some(TimeRange::OneDay) => {
            let offset = index * SESSION_MINUTES / count.max(1);
            format!(
                "{:02}:{:02}",
                SESSION_OPEN_HOUR + offset / 60,
                offset % 60
            )
        }
        Some(TimeRange::All) => {
            let date = days_before(anchor.date(), count - index - 1);
            date.format(format_description!("[month repr:short] [year]"))
                .unwrap_or_else(|_| date.to_string())
        }
        Some(
            TimeRange::OneWeek | TimeRange::OneMonth | TimeRange::ThreeMonths | TimeRange::OneYear,
        )
        | None => {
            let date = days_before(anchor.date(), count - index - 1);
            date.format(format_description!("[month repr:short] [day padding:none]"))
                .unwrap_or_else(|_| date.to_string())
        }
    }
}

fn days_before(date: Date, days: usize) -> Date {
    date.checked_sub(time::Duration::days(days as i64))
        .unwrap_or(date)
}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Simulated chart source driven by the instrument catalog.
pub struct RandomWalkGenerator {
    catalog: Arc<InstrumentCatalog>,
    rng: Mutex<fastrand::Rng>,
    latency: Duration,
    anchor: Option<OffsetDateTime>,
}

impl RandomWalkGenerator {
    pub fn new(catalog: Arc<InstrumentCatalog>) -> Self {
        Self {
            catalog,
            rng: Mutex::new(fastrand::Rng::new()),
            latency: Duration::ZERO,
            anchor: None,
        }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(fastrand::Rng::with_seed(seed)),
            ..self
        }
    }

    /// Simulated response delay before each series is produced.
    pub fn with_latency(self, latency: Duration) -> Self {
        Self { latency, ..self }
    }

    /// Pins "now" so labels are reproducible.
    pub fn with_anchor(self, anchor: OffsetDateTime) -> Self {
        Self {
            anchor: Some(anchor),
            ..self
        }
    }

    /// Produces a series immediately, without the simulated delay.
    pub fn generate(&self, instrument: &str, range: TimeRange) -> Result<ChartSeries, SourceError> {
        let points = self.with_rng(instrument, |params, anchor, rng| {
            generate_series(params, range, anchor, rng)
        })?;

        Ok(ChartSeries {
            instrument: instrument.to_owned(),
            range,
            points,
        })
    }

    /// Produces points for a raw range label such as `"3M"` or `"5Y"`.
    pub fn generate_for_label(
        &self,
        instrument: &str,
        label: &str,
    ) -> Result<Vec<ChartPoint>, SourceError> {
        self.with_rng(instrument, |params, anchor, rng| {
            generate_series_for_label(params, label, anchor, rng)
        })
    }

    fn with_rng<T>(
        &self,
        instrument: &str,
        build: impl FnOnce(SimulationParams, OffsetDateTime, &mut fastrand::Rng) -> T,
    ) -> Result<T, SourceError> {
        let params = self.catalog.simulation_params(instrument);
        let anchor = self.anchor.unwrap_or_else(local_now);

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SourceError::internal("chart generator rng lock poisoned"))?;
        Ok(build(params, anchor, &mut *rng))
    }
}

impl ChartSource for RandomWalkGenerator {
    fn series<'a>(
        &'a self,
        instrument: &'a str,
        range: TimeRange,
    ) -> SourceFuture<'a, ChartSeries> {
        Box::pin(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.generate(instrument, range)
        })
    }
}
