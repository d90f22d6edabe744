//! Bean Telemetry
//!
//! Reads whitespace-separated sensor readings printed by a LightBlue Bean
//! over its virtual serial port, one line per measurement cycle.
//!
//! # Features
//!
//! - **Echo**: print every line with a 14-digit local timestamp
//! - **Daily logs**: append raw lines to `data/YYYY/MM/YYYYMMDD.log`
//! - **Field checking**: lines whose field count does not match the enabled
//!   sensors are reported and skipped
//! - **Live chart**: rolling history of every quantity drawn in the terminal
//! - **Serial ports**: native serialport access with the `serial` feature;
//!   without it the device path is read as a plain file
//!
//! # Usage
//!
//! ```bash
//! # Timestamp and log every line
//! bean-telemetry echo --save
//!
//! # BME280 + oxygen + bean, drawn live with pressure hidden
//! bean-telemetry --port /dev/ttyUSB0 measure --bme --ox2 --draw --nop
//!
//! # Temperature and voltage only
//! bean-telemetry quantities --temperature --voltage -v
//!
//! # Show the built-in sensor groups
//! bean-telemetry sensors
//! ```

mod chart;
mod config;
mod logfile;
mod sensors;
mod serial;
mod session;
mod telemetry;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use chart::{ChartOptions, NullPresenter, Presenter, TerminalChart};
use config::{Overrides, Settings};
use logfile::DailyLog;
use sensors::{get_group, group_names, GroupFlags, QuantitySelection, SensorGroup, SensorLayout};
use serial::open_source;
use session::{install_interrupt_handler, Session, SessionConfig};

/// Bean Telemetry
///
/// Serial sensor telemetry reader with daily logs and a live chart
#[derive(Parser)]
#[command(name = "bean-telemetry")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Serial sensor telemetry reader with daily logs and a live chart")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serial port path [default: /tmp/cu.LightBlue-Bean]
    #[arg(short = 'P', long, global = true)]
    port: Option<String>,

    /// Baud rate [default: 57600]
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Directory holding the data/ log tree [default: .]
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Samples kept per quantity [default: 600]
    #[arg(long, global = true)]
    history: Option<usize>,

    /// Pause after each chart redraw in milliseconds [default: 100]
    #[arg(long, global = true)]
    pause_ms: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            baud_rate: self.baud,
            data_dir: self.data_dir.clone(),
            history: self.history,
            pause_ms: self.pause_ms,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print every line with its timestamp
    Echo {
        /// Append every line to the daily log
        #[arg(short, long)]
        save: bool,
    },

    /// Read BME280 / SHT35 / oxygen groups plus the bean itself
    Measure {
        /// BME280: temperature, humidity, dew point, pressure
        #[arg(long)]
        bme: bool,

        /// SHT35: temperature, humidity, dew point
        #[arg(long)]
        sht: bool,

        /// Oxygen sensor
        #[arg(long)]
        ox2: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Read individually selected quantities
    Quantities {
        #[arg(long)]
        temperature: bool,

        #[arg(long)]
        humidity: bool,

        #[arg(long)]
        dew_point: bool,

        #[arg(long)]
        pressure: bool,

        #[arg(long)]
        oxygen: bool,

        #[arg(long)]
        voltage: bool,

        /// Every quantity (the default when none is picked)
        #[arg(short, long)]
        all: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Built-in sensor groups
    Sensors {
        #[command(subcommand)]
        command: Option<SensorCommands>,
    },

    /// List available serial ports
    #[cfg(feature = "serial")]
    List,
}

#[derive(Subcommand)]
enum SensorCommands {
    /// List all built-in sensor groups
    List,

    /// Show the quantities of one group
    Show {
        /// Group name (e.g., bme280, sht35, oxygen, bean)
        group: String,
    },
}

/// Output options shared by `measure` and `quantities`
#[derive(Args, Debug, Clone)]
struct OutputArgs {
    /// Append every line to the daily log
    #[arg(short, long)]
    save: bool,

    /// Echo every line with its timestamp
    #[arg(short, long)]
    verbose: bool,

    /// Draw a live chart
    #[arg(short, long)]
    draw: bool,

    /// Logarithmic y axis
    #[arg(short = 'y', long = "logy", visible_alias = "ly")]
    logy: bool,

    /// Leave pressure out of the chart
    #[arg(long)]
    nop: bool,
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref(), cli.overrides())?;
    log::debug!("settings: {:?}", settings);

    match cli.command {
        Commands::Echo { save } => handle_echo(&settings, save),
        Commands::Measure {
            bme,
            sht,
            ox2,
            output,
        } => {
            let layout = SensorLayout::legacy(GroupFlags { bme, sht, ox2 });
            handle_read(&settings, layout, &output)
        }
        Commands::Quantities {
            temperature,
            humidity,
            dew_point,
            pressure,
            oxygen,
            voltage,
            all,
            output,
        } => {
            let selection = QuantitySelection {
                temperature,
                humidity,
                dew_point,
                pressure,
                oxygen,
                voltage,
            }
            .resolve(all);
            handle_read(&settings, SensorLayout::per_quantity(selection), &output)
        }
        Commands::Sensors { command } => handle_sensors(command.unwrap_or(SensorCommands::List)),
        #[cfg(feature = "serial")]
        Commands::List => serial::port::print_ports(),
    }
}

fn handle_echo(settings: &Settings, save: bool) -> Result<()> {
    let mut source = open_source(&settings.port_config())?;
    println!(
        "{} Reading from {} (baud: {}, {})",
        "[*]".cyan().bold(),
        settings.port.white(),
        settings.baud_rate,
        settings.port_config().framing()
    );

    let log = save.then(|| DailyLog::new(settings.data_dir.clone()));
    if let Some(ref log) = log {
        println!(
            "{} Logging to {}",
            "[*]".cyan().bold(),
            log.base().join("data").display()
        );
    }

    install_interrupt_handler(false)?;
    session::echo(source.as_mut(), log.as_ref())
}

fn handle_read(settings: &Settings, layout: SensorLayout, output: &OutputArgs) -> Result<()> {
    let mut source = open_source(&settings.port_config())?;
    print_layout(settings, &layout, output);

    let config = SessionConfig {
        layout,
        history: settings.history,
        verbose: output.verbose,
        log: output
            .save
            .then(|| DailyLog::new(settings.data_dir.clone())),
        chart: ChartOptions {
            log_y: output.logy,
            hide_pressure: output.nop,
            pause: settings.pause(),
        },
    };

    install_interrupt_handler(output.draw)?;
    let presenter: Box<dyn Presenter> = if output.draw {
        Box::new(TerminalChart::stdout(settings.pause())?)
    } else {
        Box::new(NullPresenter)
    };

    Session::new(config, presenter).run(source.as_mut())
}

fn print_layout(settings: &Settings, layout: &SensorLayout, output: &OutputArgs) {
    println!("{}", "=".repeat(60));
    println!(
        "{} Reading from {} (baud: {}, {})",
        "[*]".cyan().bold(),
        settings.port.white(),
        settings.baud_rate,
        settings.port_config().framing()
    );
    println!(
        "{} Expecting {} fields per line",
        "[*]".cyan().bold(),
        layout.expected_fields().to_string().white().bold()
    );
    for (group, range) in layout.offsets() {
        let ids: Vec<&str> = group.quantities.iter().map(|q| q.id.as_str()).collect();
        println!(
            "    {:>2}..{:<2} {} ({})",
            range.start,
            range.end,
            group.name.white(),
            ids.join(", ").dimmed()
        );
    }
    if output.save {
        println!(
            "{} Logging to {}",
            "[*]".cyan().bold(),
            settings.data_dir.join("data").display()
        );
    }
    println!("{}", "=".repeat(60));
}

fn handle_sensors(cmd: SensorCommands) -> Result<()> {
    match cmd {
        SensorCommands::List => {
            println!("{}", "=".repeat(60));
            println!("{}", "Built-in Sensor Groups".cyan().bold());
            println!("{}", "=".repeat(60));

            for name in group_names() {
                if let Some(group) = get_group(name) {
                    println!("\n  {}: {}", name.white().bold(), group.description);
                    println!("    Fields: {}", group.width());
                }
            }

            println!("\n{}", "=".repeat(60));
            println!(
                "Use {} to see the quantities of a group",
                "bean-telemetry sensors show <group>".cyan()
            );
        }

        SensorCommands::Show { group } => {
            let sensor_group = get_group(&group).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown sensor group: {}. Use 'bean-telemetry sensors' to see available groups.",
                    group
                )
            })?;

            print_sensor_group(sensor_group);
        }
    }

    Ok(())
}

fn print_sensor_group(group: &SensorGroup) {
    println!("{}", "=".repeat(70));
    println!("{}", format!("Sensor Group: {}", group.name).cyan().bold());
    println!("{}", "=".repeat(70));

    println!("\n{}", "Basic Information:".white().bold());
    println!("  ID: {}", group.id);
    println!("  Description: {}", group.description);
    println!("  Fields per line: {}", group.width());

    println!("\n{}", "Quantities:".white().bold());
    for (index, quantity) in group.quantities.iter().enumerate() {
        println!(
            "  {} {} - {} [{}]",
            format!("#{}", index).dimmed(),
            quantity.id.cyan(),
            quantity.kind,
            quantity.unit
        );
    }

    println!("\n{}", "=".repeat(70));
}
