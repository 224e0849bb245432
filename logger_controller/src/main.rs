//! # Logger Simulator
//!
//! Runs the logger controller on the host: storage is an image file, the
//! remote service and the display are the console, readings come from a
//! simulated sensor. Every line on stdin is delivered as a remote command.
//!
//! # Usage
//!
//! ```bash
//! # Run with the default config
//! logger_sim
//!
//! # Custom config, start from defaults, verbose
//! logger_sim --config config/logger.toml --reset -v
//!
//! # Scripted run
//! printf 'data-log on\nperiod 5 s\n' | logger_sim --ticks 200
//! ```

use clap::Parser;
use logger_common::prelude::{ConfigError, ConfigLoader, LoggerConfig};
use logger_common::consts::{DEFAULT_CONFIG_PATH, NAME_REQUEST_CHANNEL};
use logger_controller::components::{ExampleComponent, SimulatedSensor};
use logger_controller::sim::{ConsoleDisplay, ConsoleTransport, FileStorage, SystemClock};
use logger_controller::{Collaborators, Controller};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Field logger simulator - controller core with host collaborators
#[derive(Parser, Debug)]
#[command(name = "logger_sim")]
#[command(version)]
#[command(about = "Field data-logger controller running against host collaborators")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Start from default state, overwriting the stored state
    #[arg(short, long)]
    reset: bool,

    /// Device name reported by the simulated service
    #[arg(short, long, default_value = "sim-logger")]
    name: String,

    /// Stop after this many ticks (otherwise run until stdin closes)
    #[arg(long)]
    ticks: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("Logger simulator failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (config, config_missing) = match LoggerConfig::load(&args.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound) => (LoggerConfig::with_service_name("logger_sim"), true),
        Err(e) => return Err(e.into()),
    };
    config.validate()?;

    setup_tracing(&args, &config);

    info!("Logger simulator v{} starting...", env!("CARGO_PKG_VERSION"));
    if config_missing {
        warn!("No configuration at {:?}, using defaults", args.config);
    }

    let storage = FileStorage::open(&config.device.storage_path, config.device.storage_capacity)?;
    info!("Storage image {:?}", storage.path());

    let collaborators = Collaborators {
        storage: Box::new(storage),
        transport: Box::new(ConsoleTransport::new()),
        clock: Box::new(SystemClock::new()),
        display: Box::new(ConsoleDisplay::new()),
    };
    let mut controller = Controller::from_config(&config, collaborators)?;

    if let Err(e) = controller.add_component(Box::new(SimulatedSensor::new(
        "sensor",
        config.device.read_period_ms,
    ))) {
        warn!("Sensor not added: {e}");
    }
    if let Err(e) = controller.add_component(Box::new(ExampleComponent::new("example"))) {
        warn!("Example component not added: {e}");
    }

    controller.set_command_callback(|command| {
        info!("Command '{}' finished with code {}", command.raw(), command.code());
    });

    controller.init(args.reset || config.device.reset_on_startup)?;

    let commands = spawn_stdin_reader();
    let tick = Duration::from_millis(config.device.tick_ms);
    let mut count: u64 = 0;
    loop {
        controller.update();

        // The simulated service answers the name request immediately.
        if controller.is_name_requested() && !controller.is_name_known() {
            controller.capture_name(NAME_REQUEST_CHANNEL, &args.name);
        }

        match commands.try_recv() {
            Ok(line) => {
                controller.receive_command(&line);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                if args.ticks.is_none() {
                    info!("Input closed");
                    break;
                }
            }
        }

        count += 1;
        if args.ticks.is_some_and(|max| count >= max) {
            break;
        }
        thread::sleep(tick);
    }

    info!("Logger simulator shutdown complete after {} ticks", count);
    Ok(())
}

/// Forward stdin lines to the driver loop.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Setup tracing subscriber based on CLI arguments and configuration.
fn setup_tracing(args: &Args, config: &LoggerConfig) {
    let directive = if args.verbose {
        "debug"
    } else {
        config.shared.log_level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
