//! tide replay driver - Entry Point
//!
//! Feeds recorded ticks (one `TradingState` JSON object per line) through
//! the decision engine, threading each tick's state string into the next,
//! and prints one diagnostics frame per tick to stdout. Fills are not
//! simulated: positions come from the recorded ticks.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tide_bot::{AppConfig, Trader};
use tide_core::TradingState;
use tide_telemetry::Metrics;
use tracing::info;

/// tide per-tick decision engine, replay mode
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via TIDE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON-lines file of ticks (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Keep a tick's own trader_data when it has one instead of the
    /// previous tick's output
    #[arg(long)]
    respect_input_state: bool,

    /// Dump prometheus metrics to stderr after the replay
    #[arg(long)]
    metrics: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = AppConfig::resolve_path(args.config.as_deref());
    let config = AppConfig::load_with(Some(config_path.as_str()))?;

    tide_telemetry::init_logging(&config.telemetry)?;
    info!("Starting tide-bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        instruments = config.strategy.instruments.len(),
        max_log_length = config.diagnostics.max_log_length,
        "Configuration loaded"
    );

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let trader = Trader::new(config);
    let mut stdout = io::stdout().lock();
    let mut carried = String::new();
    let mut ticks = 0usize;
    let mut orders = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut state = TradingState::from_json(&line)
            .with_context(|| format!("parsing tick on line {}", idx + 1))?;
        if !(args.respect_input_state && !state.trader_data.is_empty()) {
            state.trader_data = std::mem::take(&mut carried);
        }

        let output = trader
            .run(&state)
            .with_context(|| format!("tick at timestamp {}", state.timestamp))?;
        writeln!(stdout, "{}", output.diagnostics.line)?;

        for (symbol, symbol_orders) in &output.orders {
            for order in symbol_orders {
                info!(timestamp = state.timestamp, %symbol, order = %order, "order");
            }
        }
        ticks += 1;
        orders += output.order_count();
        carried = output.trader_data;
    }

    info!(ticks, orders, "Replay finished");
    if args.metrics {
        eprintln!("{}", Metrics::render()?);
    }

    Ok(())
}
