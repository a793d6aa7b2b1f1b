#![allow(clippy::collapsible_if)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod signals;
pub mod utils;

// Dashboard and alerts on top of the indicator core
pub mod engine;

// Re-export commonly used types
pub use config::{AlertsConfig, DashboardConfig, INDICATORS};
pub use data::{CandleHistory, SymbolCandles, load_candles};
pub use domain::{Candle, Direction, Interval, ZoneSnapshot};
pub use engine::{AlertEvent, AlertsEngine, Dashboard, compute_dashboard, compute_many};

// CLI argument parsing
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Candle JSON file: a kline payload or a bare array of candles
    #[arg(long)]
    pub candles: PathBuf,

    /// Indicator settings JSON; missing fields keep their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the symbol named in the candle file
    #[arg(long)]
    pub symbol: Option<String>,

    /// Override the interval named in the candle file (e.g. Min15, Hour4)
    #[arg(long)]
    pub interval: Option<Interval>,

    /// Replay the candles through the streaming alerts engine
    #[arg(long, default_value_t = false)]
    pub alerts: bool,

    /// Print results as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
