//! Reader settings
//!
//! Settings come from built-in defaults, an optional TOML file and the
//! command line, in increasing order of precedence:
//!
//! ```toml
//! port = "/dev/ttyUSB0"
//! baud_rate = 57600
//! data_dir = "/home/lab/bean"
//! history = 600
//! pause_ms = 100
//! data_bits = 8
//! parity = "none"
//! stop_bits = 1
//! flow_control = "none"
//! ```

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::serial::port::{FlowControl, Parity, BEAN_DEFAULT_BAUD, DEFAULT_PORT};
use crate::serial::PortConfig;
use crate::telemetry::DEFAULT_HISTORY;

/// Reader settings after merging every source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Device the telemetry lines are read from
    pub port: String,
    pub baud_rate: u32,
    /// Directory that holds the `data/` log tree
    pub data_dir: PathBuf,
    /// Samples kept per quantity
    pub history: usize,
    /// Pause after each chart redraw, in milliseconds
    pub pause_ms: u64,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    pub flow_control: FlowControl,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: BEAN_DEFAULT_BAUD,
            data_dir: PathBuf::from("."),
            history: DEFAULT_HISTORY,
            pause_ms: 100,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: FlowControl::None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub data_dir: Option<PathBuf>,
    pub history: Option<usize>,
    pub pause_ms: Option<u64>,
}

impl Settings {
    /// Parse settings from TOML text; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid settings")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Defaults, then the optional file, then the command line
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let settings = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let settings = settings.merge(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.history > 0, "history must keep at least one sample");
        self.port_config().validate()
    }

    pub fn merge(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(baud_rate) = overrides.baud_rate {
            self.baud_rate = baud_rate;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(history) = overrides.history {
            self.history = history;
        }
        if let Some(pause_ms) = overrides.pause_ms {
            self.pause_ms = pause_ms;
        }
        self
    }

    pub fn port_config(&self) -> PortConfig {
        PortConfig::new(&self.port)
            .with_baud_rate(self.baud_rate)
            .with_framing(self.data_bits, self.parity, self.stop_bits)
            .with_flow_control(self.flow_control)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}
