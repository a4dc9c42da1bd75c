use serde::{Deserialize, Serialize};

use crate::{Symbol, TimeRange, ValidationError};

/// Broad category an instrument belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Index,
    Commodity,
    Bond,
    Crypto,
}

impl AssetClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Commodity => "commodity",
            Self::Bond => "bond",
            Self::Crypto => "crypto",
        }
    }
}

/// Random-walk parameters for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub base_value: f64,
    /// Full width of the per-step uniform perturbation.
    pub volatility: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            base_value: 100.0,
            volatility: 1.0,
        }
    }
}

/// A tracked instrument. `name` is the catalog key ("Bitcoin", "S&P 500").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub display_name: String,
    pub symbol: Symbol,
    pub asset_class: AssetClass,
    pub base_value: f64,
    pub volatility: f64,
}

impl Instrument {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        symbol: Symbol,
        asset_class: AssetClass,
        base_value: f64,
        volatility: f64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyInstrumentName);
        }

        validate_finite("base_value", base_value)?;
        if base_value <= 0.0 {
            return Err(ValidationError::NonPositiveValue {
                field: "base_value",
            });
        }
        validate_finite("volatility", volatility)?;
        if volatility < 0.0 {
            return Err(ValidationError::NegativeValue {
                field: "volatility",
            });
        }

        Ok(Self {
            name,
            display_name: display_name.into(),
            symbol,
            asset_class,
            base_value,
            volatility,
        })
    }

    pub const fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            base_value: self.base_value,
            volatility: self.volatility,
        }
    }
}

/// Point-in-time value snapshot for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub name: String,
    pub display_name: String,
    pub value: f64,
    pub change: f64,
    pub change_percent: f64,
    /// Set when the instrument could not be fetched and the values are stand-ins.
    #[serde(default)]
    pub placeholder: bool,
}

impl Quote {
    /// Zero-valued stand-in used when an instrument could not be fetched.
    pub fn placeholder(instrument: &Instrument) -> Self {
        Self {
            name: instrument.name.clone(),
            display_name: instrument.display_name.clone(),
            value: 0.0,
            change: 0.0,
            change_percent: 0.0,
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// One sample of a rendered series. `date` is already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
    pub moving_average: f64,
}

/// A complete series for one (instrument, range) selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub instrument: String,
    pub range: TimeRange,
    pub points: Vec<ChartPoint>,
}

/// Sign of a percent change, with a case for values that could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
    Unknown,
}

/// Percent change for one market sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorReading {
    pub name: String,
    pub change_percent: f64,
}

impl SectorReading {
    pub fn new(name: impl Into<String>, change_percent: f64) -> Self {
        Self {
            name: name.into(),
            change_percent,
        }
    }

    pub fn direction(&self) -> ChangeDirection {
        let change = self.change_percent;
        if !change.is_finite() {
            ChangeDirection::Unknown
        } else if change > 0.0 {
            ChangeDirection::Up
        } else if change < 0.0 {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        }
    }

    /// `+1.23%`, `-0.57%`, or `N/A` when the value is not a finite number.
    pub fn format_change(&self) -> String {
        match self.direction() {
            ChangeDirection::Unknown => String::from("N/A"),
            ChangeDirection::Down => format!("{:.2}%", self.change_percent),
            ChangeDirection::Up | ChangeDirection::Flat => {
                format!("+{:.2}%", self.change_percent)
            }
        }
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteValue { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> Instrument {
        Instrument::new(
            "Gold",
            "SPDR Gold Shares",
            Symbol::parse("GLD").expect("valid symbol"),
            AssetClass::Commodity,
            184.0,
            1.5,
        )
        .expect("valid instrument")
    }

    #[test]
    fn rejects_non_positive_base_value() {
        let err = Instrument::new(
            "Broken",
            "Broken",
            Symbol::parse("BRK").expect("valid symbol"),
            AssetClass::Index,
            0.0,
            1.0,
        )
        .expect_err("must fail");
        assert_eq!(
            err,
            ValidationError::NonPositiveValue {
                field: "base_value"
            }
        );
    }

    #[test]
    fn rejects_negative_volatility() {
        let err = Instrument::new(
            "Broken",
            "Broken",
            Symbol::parse("BRK").expect("valid symbol"),
            AssetClass::Index,
            10.0,
            -0.1,
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::NegativeValue { .. }));
    }

    #[test]
    fn placeholder_keeps_names_and_zeroes_values() {
        let quote = Quote::placeholder(&gold());
        assert_eq!(quote.name, "Gold");
        assert_eq!(quote.display_name, "SPDR Gold Shares");
        assert!(quote.is_placeholder());
    }

    #[test]
    fn quote_serializes_camel_case_fields() {
        let quote = Quote::placeholder(&gold());
        let json = serde_json::to_value(&quote).expect("serialize");
        assert!(json.get("changePercent").is_some());
        assert!(json.get("displayName").is_some());
        assert_eq!(json["placeholder"], true);
    }

    #[test]
    fn sector_change_formatting() {
        assert_eq!(SectorReading::new("Tech", 1.234).format_change(), "+1.23%");
        assert_eq!(SectorReading::new("Energy", -0.57).format_change(), "-0.57%");
        assert_eq!(SectorReading::new("Flat", 0.0).format_change(), "+0.00%");
        assert_eq!(SectorReading::new("Bad", f64::NAN).format_change(), "N/A");
    }

    #[test]
    fn sector_direction_flags_unknown_values() {
        assert_eq!(
            SectorReading::new("Bad", f64::INFINITY).direction(),
            ChangeDirection::Unknown
        );
        assert_eq!(SectorReading::new("Up", 0.1).direction(), ChangeDirection::Up);
        assert_eq!(SectorReading::new("Flat", 0.0).direction(), ChangeDirection::Flat);
    }
}
