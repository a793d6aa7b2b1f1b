use anyhow::{Context, Result};
use clap::Parser;

use signal_scope::config::AlertsConfig;
use signal_scope::engine::LatestValues;
use signal_scope::utils::time_utils::epoch_sec_to_utc;
use signal_scope::{AlertsEngine, Cli, DashboardConfig, compute_dashboard, load_candles};

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Load inputs
    let indicators = match &args.config {
        Some(path) => DashboardConfig::load_from_path(path)?,
        None => DashboardConfig::default(),
    };
    let mut series = load_candles(&args.candles)?;
    if let Some(symbol) = &args.symbol {
        series.symbol = symbol.clone();
    }
    if let Some(interval) = args.interval {
        series.interval = interval;
    }

    // D. Replay through the alerts engine, or compute the dashboard once
    if args.alerts {
        let mut engine = AlertsEngine::with_indicators(
            AlertsConfig::new(series.symbol.clone(), series.interval),
            indicators,
        );
        let events: Vec<_> = series
            .candles
            .iter()
            .flat_map(|c| engine.on_closed_candle(*c))
            .collect();

        if args.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&events).context("Failed to serialize alerts")?
            );
        } else {
            for ev in &events {
                println!(
                    "#{:<5} {}  {:<20} {}",
                    ev.id,
                    epoch_sec_to_utc(ev.bar_time),
                    ev.title,
                    ev.message
                );
            }
            log::info!("{} alerts over {} candles", events.len(), series.candles.len());
        }
        return Ok(());
    }

    let dashboard = compute_dashboard(&series.candles, &indicators);
    if args.json {
        println!(
            "{}",
            serde_json::to_string(&dashboard).context("Failed to serialize dashboard")?
        );
        return Ok(());
    }

    println!("{} {} ({} candles)", series.symbol, series.interval, dashboard.len());
    println!(
        "EFM crosses: {} long / {} short",
        dashboard.crosses.long.len(),
        dashboard.crosses.short.len()
    );
    println!(
        "Rebounds: {} long / {} short, late: {} long / {} short",
        dashboard.rebounds.long.len(),
        dashboard.rebounds.short.len(),
        dashboard.late_rebounds.long.len(),
        dashboard.late_rebounds.short.len()
    );
    match dashboard.latest() {
        Some(latest) => print_latest(&latest),
        None => log::warn!("No candles in {}", args.candles.display()),
    }
    Ok(())
}

fn print_latest(latest: &LatestValues) {
    println!("Last bar {} close {:.6}", epoch_sec_to_utc(latest.time), latest.close);
    println!(
        "  EMA {:.6}  RSI {:.2}  MACD hist {:.6}  ATR {:.6}",
        latest.overlay_ema, latest.rsi, latest.macd_hist, latest.atr
    );
    println!(
        "  Envelope [{:.6}, {:.6}]  Breakout [{:.6}, {:.6}]",
        latest.envelope_lower, latest.envelope_upper, latest.breakout_lower, latest.breakout_upper
    );
    println!(
        "  Balance {:.2}  Bias {} (line {:.6})",
        latest.balance, latest.bias_state, latest.bias_avg
    );
    if let Some(zone) = &latest.zone {
        println!(
            "  Zone {} [{:.6}, {:.6}] from bar {}",
            zone.direction, zone.band.low, zone.band.high, zone.mark_index
        );
    }
}
