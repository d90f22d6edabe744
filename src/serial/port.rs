//! Serial port configuration and connection management
//!
//! Handles port discovery and the serialport-backed line source for the
//! LightBlue Bean link.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[cfg(feature = "serial")]
use anyhow::{bail, Context};
#[cfg(feature = "serial")]
use colored::Colorize;
#[cfg(feature = "serial")]
use serialport::SerialPort;
#[cfg(feature = "serial")]
use std::io::BufReader;

#[cfg(feature = "serial")]
use super::source::{read_record, LineSource};
#[cfg(feature = "serial")]
use crate::telemetry::TelemetryError;

/// Virtual serial port created by the Bean Loader
pub const DEFAULT_PORT: &str = "/tmp/cu.LightBlue-Bean";

/// Default LightBlue Bean serial configuration
pub const BEAN_DEFAULT_BAUD: u32 = 57600;

/// Parity checking mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parity::None => write!(f, "N"),
            Parity::Odd => write!(f, "O"),
            Parity::Even => write!(f, "E"),
        }
    }
}

/// Flow control mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    #[default]
    None,
    Software,
    Hardware,
}

/// Configuration for serial port connection
#[derive(Debug, Clone, PartialEq)]
pub struct PortConfig {
    /// Serial port path (e.g., /tmp/cu.LightBlue-Bean, /dev/ttyUSB0)
    pub port_path: String,
    /// Baud rate (default: 57600 for the Bean)
    pub baud_rate: u32,
    /// Data bits, 5 to 8 (default: 8)
    pub data_bits: u8,
    /// Parity (default: None)
    pub parity: Parity,
    /// Stop bits, 1 or 2 (default: 1)
    pub stop_bits: u8,
    /// Flow control (default: None)
    pub flow_control: FlowControl,
    /// Read timeout; timeouts are retried, so this only bounds a single poll
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::from(DEFAULT_PORT),
            baud_rate: BEAN_DEFAULT_BAUD,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: FlowControl::None,
            timeout: Duration::from_secs(1),
        }
    }
}

impl PortConfig {
    /// Create a new configuration with default Bean settings
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }

    /// Set the baud rate
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set data bits, parity and stop bits
    pub fn with_framing(mut self, data_bits: u8, parity: Parity, stop_bits: u8) -> Self {
        self.data_bits = data_bits;
        self.parity = parity;
        self.stop_bits = stop_bits;
        self
    }

    /// Set the flow control mode
    pub fn with_flow_control(mut self, flow_control: FlowControl) -> Self {
        self.flow_control = flow_control;
        self
    }

    /// Short framing notation, e.g. "8N1"
    pub fn framing(&self) -> String {
        format!("{}{}{}", self.data_bits, self.parity, self.stop_bits)
    }

    /// Reject framings no UART supports
    pub fn validate(&self) -> Result<()> {
        ensure!(
            (5..=8).contains(&self.data_bits),
            "Invalid data bits: {} (expected 5 to 8)",
            self.data_bits
        );
        ensure!(
            (1..=2).contains(&self.stop_bits),
            "Invalid stop bits: {} (expected 1 or 2)",
            self.stop_bits
        );
        ensure!(self.baud_rate > 0, "Invalid baud rate: 0");
        Ok(())
    }
}

/// Serial port opened with the configured framing
#[cfg(feature = "serial")]
pub struct SerialConnection {
    reader: BufReader<Box<dyn SerialPort>>,
    config: PortConfig,
}

#[cfg(feature = "serial")]
impl SerialConnection {
    /// Open a serial connection with the given configuration
    pub fn open(config: PortConfig) -> Result<Self> {
        config.validate()?;

        let data_bits = match config.data_bits {
            5 => serialport::DataBits::Five,
            6 => serialport::DataBits::Six,
            7 => serialport::DataBits::Seven,
            8 => serialport::DataBits::Eight,
            other => bail!("Invalid data bits: {}", other),
        };
        let stop_bits = match config.stop_bits {
            1 => serialport::StopBits::One,
            2 => serialport::StopBits::Two,
            other => bail!("Invalid stop bits: {}", other),
        };
        let parity = match config.parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        };
        let flow_control = match config.flow_control {
            FlowControl::None => serialport::FlowControl::None,
            FlowControl::Software => serialport::FlowControl::Software,
            FlowControl::Hardware => serialport::FlowControl::Hardware,
        };

        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(data_bits)
            .parity(parity)
            .stop_bits(stop_bits)
            .flow_control(flow_control)
            .timeout(config.timeout)
            .open()
            .with_context(|| format!("Failed to open serial port: {}", config.port_path))?;

        Ok(Self {
            reader: BufReader::new(port),
            config,
        })
    }

    /// Get the port configuration
    pub fn config(&self) -> &PortConfig {
        &self.config
    }
}

#[cfg(feature = "serial")]
impl LineSource for SerialConnection {
    fn next_line(&mut self) -> Result<Option<String>, TelemetryError> {
        read_record(&mut self.reader)
    }
}

/// Information about a detected serial port
#[cfg(feature = "serial")]
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub path: String,
    pub port_type: PortType,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

#[cfg(feature = "serial")]
#[derive(Debug, Clone, PartialEq)]
pub enum PortType {
    UsbSerial,
    PciSerial,
    Bluetooth,
    Unknown,
}

#[cfg(feature = "serial")]
impl std::fmt::Display for PortType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortType::UsbSerial => write!(f, "USB Serial"),
            PortType::PciSerial => write!(f, "PCI Serial"),
            PortType::Bluetooth => write!(f, "Bluetooth"),
            PortType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// List all available serial ports
#[cfg(feature = "serial")]
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().with_context(|| "Failed to enumerate serial ports")?;

    Ok(ports
        .into_iter()
        .map(|p| {
            let (port_type, manufacturer, product, vid, pid) = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => (
                    PortType::UsbSerial,
                    info.manufacturer,
                    info.product,
                    Some(info.vid),
                    Some(info.pid),
                ),
                serialport::SerialPortType::PciPort => (PortType::PciSerial, None, None, None, None),
                serialport::SerialPortType::BluetoothPort => {
                    (PortType::Bluetooth, None, None, None, None)
                }
                serialport::SerialPortType::Unknown => (PortType::Unknown, None, None, None, None),
            };

            PortInfo {
                path: p.port_name,
                port_type,
                manufacturer,
                product,
                vid,
                pid,
            }
        })
        .collect())
}

/// Print formatted list of available serial ports
#[cfg(feature = "serial")]
pub fn print_ports() -> Result<()> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("\n{}", "Troubleshooting tips:".cyan().bold());
        println!("  1. Start the Bean Loader and enable its virtual serial port");
        println!("  2. Check that {} exists", DEFAULT_PORT);
        println!("  3. Add your user to the 'dialout' group: sudo usermod -aG dialout $USER");
        return Ok(());
    }

    println!("{}", "Available Serial Ports:".green().bold());
    println!("{}", "=".repeat(60));

    for port in ports {
        println!("\n{}: {}", "Port".cyan(), port.path.white().bold());
        println!("  Type: {}", port.port_type);

        if let Some(ref mfg) = port.manufacturer {
            println!("  Manufacturer: {}", mfg);
        }
        if let Some(ref prod) = port.product {
            println!("  Product: {}", prod);
        }
        if let (Some(vid), Some(pid)) = (port.vid, port.pid) {
            println!("  VID:PID: {:04x}:{:04x}", vid, pid);
        }
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "{}",
        "Use: bean-telemetry --port <PORT> measure to start reading".yellow()
    );

    Ok(())
}
