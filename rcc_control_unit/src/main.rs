//! # RCC Control Unit
//!
//! Router cell control loop. Loads the cell configuration, wires the
//! controller to the simulation backend and polls until Ctrl-C (or the
//! optional run duration) ends the loop. On exit the actuators are taken
//! safe and a JSON snapshot of the controller is printed to stdout.

use clap::Parser;
use rcc_common::config::LogLevel;
use rcc_common::consts::DEFAULT_CONFIG_PATH;
use rcc_common::control_unit::config::ControllerConfig;
use rcc_common::control_unit::diagnostics::CycleRecord;
use rcc_common::hal::driver::{CycleObserver, TickSource};
use rcc_control_unit::config::load_config;
use rcc_control_unit::controller::{Controller, ControllerIo};
use rcc_control_unit::cycle::CycleRunner;
use rcc_hal::{SimulatedIo, SystemClock};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// RCC Control Unit: router cell feed and flip controller
#[derive(Parser, Debug)]
#[command(name = "rcc_control_unit")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Cooperative control loop for a router feed and flip cell")]
struct Args {
    /// Path to the cell configuration TOML. Defaults to /etc/rcc/router.toml
    /// when present, built-in defaults otherwise.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,

    /// Pulse the simulated start sensor every N ms.
    #[arg(long, value_name = "MS")]
    sim_start_every_ms: Option<u64>,

    /// Stop after N ms instead of waiting for Ctrl-C.
    #[arg(long, value_name = "MS")]
    run_for_ms: Option<u64>,

    /// Enable the second feed pass regardless of the config file.
    #[arg(long)]
    feeding2: bool,
}

/// Logs every completed production cycle.
struct CycleLogger;

impl CycleObserver for CycleLogger {
    fn cycle_completed(&mut self, record: &CycleRecord) {
        info!(
            sequence = record.sequence,
            duration_ms = record.duration_ms(),
            feed_passes = record.feed_passes,
            "cycle completed"
        );
    }
}

fn main() {
    let args = Args::parse();
    let loaded = load(&args);

    let log_level = loaded
        .as_ref()
        .map(|cfg| cfg.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("RCC Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    let result = loaded
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
        .and_then(|config| run(&args, config));
    if let Err(e) = result {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("RCC Control Unit shutdown complete");
}

fn load(args: &Args) -> Result<ControllerConfig, rcc_common::config::ConfigError> {
    match &args.config {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(Path::new(DEFAULT_CONFIG_PATH)),
        None => Ok(ControllerConfig::default()),
    }
}

fn run(args: &Args, mut config: ControllerConfig) -> Result<(), Box<dyn std::error::Error>> {
    if args.config.is_none() && !Path::new(DEFAULT_CONFIG_PATH).exists() {
        warn!("No config file at {DEFAULT_CONFIG_PATH}, using built-in defaults");
    }
    if args.feeding2 {
        config.cycle.feeding2_enabled = true;
    }

    let io = SimulatedIo::new();
    if let Some(period) = args.sim_start_every_ms {
        // Pulse must outlast the debounce window to register.
        let pulse = config.debounce.window_ms + 100;
        io.set_auto_start(period, period, pulse);
        info!("Simulated start sensor: every {period} ms ({pulse} ms pulse)");
    }

    let clock = SystemClock::new();
    let mut controller = Controller::new(
        config,
        ControllerIo {
            inputs: Box::new(io.input_reader()),
            cylinder: Box::new(io.cylinder_pin()),
            servo: Box::new(io.servo()),
            panel: Box::new(io.indicator_panel()),
        },
        clock.now(),
    )?;
    controller.add_observer(Box::new(CycleLogger));

    // Setup signal handler for graceful shutdown.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut runner = CycleRunner::new(controller, clock);
    let final_state = match args.run_for_ms {
        Some(ms) => runner.run_for(&running, ms),
        None => runner.run(&running),
    };
    info!("Final state: {final_state}");

    let snapshot = runner.controller().snapshot(runner.clock().now());
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
