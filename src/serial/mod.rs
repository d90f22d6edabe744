//! Line acquisition from the board
//!
//! This module provides:
//! - Port configuration and, with the `serial` feature, a serialport-backed connection
//! - The `LineSource` trait the session reads from
//! - Port listing (with the `serial` feature)

pub mod port;
pub mod source;

pub use port::PortConfig;
#[cfg(feature = "serial")]
pub use port::SerialConnection;
pub use source::{LineSource, ReaderSource};

use anyhow::Result;

/// Open the configured device as a line source
#[cfg(feature = "serial")]
pub fn open_source(config: &PortConfig) -> Result<Box<dyn LineSource>> {
    let connection = SerialConnection::open(config.clone())?;
    log::debug!(
        "opened {} at {} baud",
        connection.config().port_path,
        connection.config().baud_rate
    );
    Ok(Box::new(connection))
}

/// Open the configured device as a line source
#[cfg(not(feature = "serial"))]
pub fn open_source(config: &PortConfig) -> Result<Box<dyn LineSource>> {
    use anyhow::Context;
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(&config.port_path)
        .with_context(|| format!("Failed to open device: {}", config.port_path))?;
    log::debug!("opened {} as a plain file", config.port_path);
    Ok(Box::new(ReaderSource::new(BufReader::new(file))))
}
