//! Telemetry lines, their errors and the bounded history used for plotting

pub mod error;
pub mod history;
pub mod sample;

pub use error::TelemetryError;
pub use history::{History, DEFAULT_HISTORY};
pub use sample::SampleLine;
