//! Fixed set of tracked instruments.
//!
//! The catalog is built once at startup and shared read-only (`Arc`) by the
//! quote sources and the chart generator. Names are unique keys.

use std::collections::HashSet;

use crate::{AssetClass, Instrument, SimulationParams, Symbol, ValidationError};

/// Ordered, immutable instrument registry keyed by logical name.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentCatalog {
    instruments: Vec<Instrument>,
}

impl InstrumentCatalog {
    /// Builds a catalog, rejecting duplicate names.
    pub fn new(instruments: Vec<Instrument>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(instruments.len());
        for instrument in &instruments {
            if !seen.insert(instrument.name.as_str()) {
                return Err(ValidationError::DuplicateInstrument {
                    name: instrument.name.clone(),
                });
            }
        }
        Ok(Self { instruments })
    }

    /// The nine instruments the dashboard tracks out of the box.
    pub fn builtin() -> Self {
        const ENTRIES: [(&str, &str, &str, AssetClass, f64, f64); 9] = [
            ("S&P 500", "SPDR S&P 500 ETF Trust", "SPY", AssetClass::Index, 498.0, 0.8),
            ("Nasdaq", "Invesco QQQ Trust", "QQQ", AssetClass::Index, 433.0, 1.0),
            (
                "Dow Jones",
                "SPDR Dow Jones Industrial Average ETF Trust",
                "DIA",
                AssetClass::Index,
                384.0,
                0.7,
            ),
            ("Russell 2000", "iShares Russell 2000 ETF", "IWM", AssetClass::Index, 199.0, 1.2),
            ("Crude Oil", "United States Oil Fund", "USO", AssetClass::Commodity, 71.0, 3.0),
            ("Gold", "SPDR Gold Shares", "GLD", AssetClass::Commodity, 184.0, 1.5),
            ("Silver", "iShares Silver Trust", "SLV", AssetClass::Commodity, 20.0, 2.0),
            (
                "10-Year Bond",
                "iShares 20+ Year Treasury Bond ETF",
                "TLT",
                AssetClass::Bond,
                93.0,
                0.3,
            ),
            ("Bitcoin", "Bitcoin / US Dollar", "BTC-USD", AssetClass::Crypto, 24_000.0, 2_000.0),
        ];

        let instruments = ENTRIES
            .into_iter()
            .filter_map(|(name, display_name, symbol, asset_class, base, volatility)| {
                let symbol = Symbol::parse(symbol).ok()?;
                Instrument::new(name, display_name, symbol, asset_class, base, volatility).ok()
            })
            .collect();

        Self { instruments }
    }

    pub fn get(&self, name: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|instrument| instrument.name == name)
    }

    /// Simulation parameters for `name`; unknown names get base 100, volatility 1.
    pub fn simulation_params(&self, name: &str) -> SimulationParams {
        self.get(name)
            .map(Instrument::simulation_params)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.instruments.iter().map(|i| i.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for InstrumentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
