//! One line as received from the board

use chrono::{Local, NaiveDateTime};

/// Timestamp format prefixed to echoed and logged lines (14 digits)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// A raw telemetry line and the local wall-clock time it was read at
#[derive(Debug, Clone, PartialEq)]
pub struct SampleLine {
    pub timestamp: NaiveDateTime,
    pub raw: String,
}

impl SampleLine {
    /// Stamp a line with the current local time
    pub fn new(raw: impl Into<String>) -> Self {
        Self::at(raw, Local::now().naive_local())
    }

    pub fn at(raw: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            raw: raw.into(),
        }
    }

    /// `YYYYMMDDHHMMSS`
    pub fn stamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Whitespace-separated fields
    pub fn tokens(&self) -> Vec<&str> {
        self.raw.split_whitespace().collect()
    }

    /// `"<stamp> <raw>"`, as echoed and persisted
    pub fn record(&self) -> String {
        format!("{} {}", self.stamp(), self.raw)
    }
}
