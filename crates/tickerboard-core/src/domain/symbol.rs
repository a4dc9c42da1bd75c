use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 15;

/// Ticker understood by the remote quote API (`SPY`, `BTC-USD`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parses a ticker, trimming whitespace and upper-casing it.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = input.trim().to_ascii_uppercase();

        let mut chars = normalized.chars().enumerate();
        match chars.next() {
            None => return Err(ValidationError::EmptySymbol),
            Some((_, ch)) if !ch.is_ascii_alphabetic() => {
                return Err(ValidationError::SymbolInvalidStart { ch })
            }
            Some(_) => {}
        }

        if let Some((index, ch)) =
            chars.find(|(_, ch)| !(ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')))
        {
            return Err(ValidationError::SymbolInvalidChar { ch, index });
        }

        let len = normalized.len();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_crypto_pair_with_dash() {
        let symbol = Symbol::parse(" btc-usd ").expect("pair should parse");
        assert_eq!(symbol.as_str(), "BTC-USD");
    }

    #[test]
    fn rejects_leading_digit() {
        let err = Symbol::parse("10Y").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidStart { ch: '1' });
    }

    #[test]
    fn rejects_embedded_space() {
        let err = Symbol::parse("S P").expect_err("must fail");
        assert_eq!(err, ValidationError::SymbolInvalidChar { ch: ' ', index: 1 });
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(Symbol::parse("   "), Err(ValidationError::EmptySymbol));
    }
}
