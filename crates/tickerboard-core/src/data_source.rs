//! Source traits and the shared error type.
//!
//! Each data stream the dashboard consumes sits behind one trait so a live
//! source, an offline fallback and a test fake are interchangeable:
//!
//! | Trait | Output | Implementations |
//! |-------|--------|-----------------|
//! | [`QuoteSource`] | one [`Quote`] per catalog instrument | [`AlphaVantageQuoteSource`](crate::AlphaVantageQuoteSource), [`OfflineQuoteSource`](crate::OfflineQuoteSource) |
//! | [`SectorSource`] | list of [`SectorReading`] | [`HttpSectorSource`](crate::HttpSectorSource), [`StaticSectorSource`](crate::StaticSectorSource) |
//! | [`ChartSource`] | [`ChartSeries`] for a selection | [`RandomWalkGenerator`](crate::RandomWalkGenerator) |
//!
//! # Example
//!
//! ```rust,ignore
//! use tickerboard_core::{ChartSource, RandomWalkGenerator, TimeRange};
//!
//! async fn show(generator: &RandomWalkGenerator) {
//!     let series = generator.series("Gold", TimeRange::OneMonth).await?;
//!     for point in &series.points {
//!         println!("{} {:.2} {:.2}", point.date, point.price, point.moving_average);
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{ChartSeries, Quote, SectorReading, TimeRange};

/// Boxed future returned by every source trait method.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Source-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success HTTP status.
    Unavailable,
    /// Upstream answered with a throttle notice.
    RateLimited,
    /// Payload was not in the expected shape.
    Malformed,
    InvalidRequest,
    Internal,
}

/// Structured error carried by source futures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Produces a quote for every catalog instrument.
///
/// Per-instrument failures must degrade to [`Quote::placeholder`] inside the
/// implementation; an `Err` means the whole source could not run.
pub trait QuoteSource: Send + Sync {
    fn quotes<'a>(&'a self) -> SourceFuture<'a, Vec<Quote>>;
}

/// Produces the current sector-performance list in a single request.
pub trait SectorSource: Send + Sync {
    fn sectors<'a>(&'a self) -> SourceFuture<'a, Vec<SectorReading>>;
}

/// Produces a chart series for an (instrument, range) selection.
pub trait ChartSource: Send + Sync {
    fn series<'a>(&'a self, instrument: &'a str, range: TimeRange)
        -> SourceFuture<'a, ChartSeries>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(SourceError::unavailable("x").code(), "source.unavailable");
        assert_eq!(SourceError::rate_limited("x").code(), "source.rate_limited");
        assert_eq!(SourceError::malformed("x").code(), "source.malformed");
        assert_eq!(SourceError::internal("x").code(), "source.internal");
    }

    #[test]
    fn transport_failures_are_retryable_but_bad_payloads_are_not() {
        assert!(SourceError::unavailable("down").retryable());
        assert!(!SourceError::malformed("garbage").retryable());
    }

    #[test]
    fn display_includes_code() {
        let error = SourceError::malformed("missing price");
        assert_eq!(error.to_string(), "missing price (source.malformed)");
    }
}
