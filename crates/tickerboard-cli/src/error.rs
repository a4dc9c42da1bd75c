use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerboard_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Stream(#[from] tickerboard_core::StreamError),

    #[error("failed to initialise logging: {0}")]
    Telemetry(String),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::AuthFailed(_) => 3,
            Self::Serialization(_) => 4,
            Self::Stream(_) => 6,
            Self::Io(_) => 10,
            Self::Telemetry(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(CliError::Command(String::from("x")).exit_code(), 2);
        assert_eq!(CliError::AuthFailed(String::from("x")).exit_code(), 3);
        assert_eq!(
            CliError::from(tickerboard_core::ValidationError::EmptySymbol).exit_code(),
            2
        );
        assert_eq!(
            CliError::from(std::io::Error::other("disk")).exit_code(),
            10
        );
    }
}
