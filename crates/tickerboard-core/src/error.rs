use thiserror::Error;

/// Validation and contract errors exposed by `tickerboard-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid time range '{value}', expected one of 1D, 1W, 1M, 3M, 1Y, All")]
    InvalidTimeRange { value: String },

    #[error("instrument name cannot be empty")]
    EmptyInstrumentName,
    #[error("instrument '{name}' is already in the catalog")]
    DuplicateInstrument { name: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be greater than zero")]
    NonPositiveValue { field: &'static str },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,

    #[error("environment variable {name} has invalid value '{value}'")]
    InvalidEnvValue { name: &'static str, value: String },
}
