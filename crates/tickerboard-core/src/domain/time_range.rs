use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Point count used when a range label is not recognised.
pub const DEFAULT_POINT_COUNT: usize = 30;

/// Chart window selector. Fixes both the sample count and the label format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "All")]
    All,
}

impl TimeRange {
    pub const ALL: [Self; 6] = [
        Self::OneDay,
        Self::OneWeek,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::OneYear,
        Self::All,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::All => "All",
        }
    }

    /// Number of chart points generated for this range.
    pub const fn point_count(self) -> usize {
        match self {
            Self::OneDay => 24,
            Self::OneWeek => 35,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::OneYear => 252,
            Self::All => 1000,
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::OneDay
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ValidationError::InvalidTimeRange {
                value: trimmed.to_owned(),
            })
    }
}

/// Point count for a raw range label, falling back to [`DEFAULT_POINT_COUNT`].
pub fn point_count_for(label: &str) -> usize {
    label
        .parse::<TimeRange>()
        .map(TimeRange::point_count)
        .unwrap_or(DEFAULT_POINT_COUNT)
}
