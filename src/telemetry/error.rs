use std::num::ParseFloatError;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Errors produced while reading and parsing telemetry lines.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error(
        "the number of measurements does not match the expected number from the sensors listed (expected {expected}, got {found})"
    )]
    FieldCount { expected: usize, found: usize },

    #[error("field {position} is not a number: {token:?}")]
    InvalidNumber {
        position: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("telemetry line is not valid UTF-8")]
    Decode(#[from] FromUtf8Error),

    #[error("failed to read from telemetry stream")]
    Io(#[from] std::io::Error),
}

impl TelemetryError {
    /// Only a field-count mismatch lets the session continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TelemetryError::FieldCount { .. })
    }
}
