//! Streaming alerts: feed closed candles one at a time, get back the events that
//! fire on the newest bar.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_ALERTS;
use crate::config::{AlertsConfig, DashboardConfig, INDICATORS};
use crate::data::{CandleHistory, LiveUpdate};
use crate::domain::{Candle, Direction, Interval};
use crate::engine::dashboard::{Dashboard, compute_dashboard};
use crate::utils::maths_utils::is_defined;
use crate::utils::time_utils::utc_now_as_timestamp_sec;

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Efm,
    Balance,
    Rebound,
    ReboundLate,
}

#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Bull,
    Bear,
}

impl From<Direction> for Severity {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => Severity::Bull,
            Direction::Short => Severity::Bear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Increases by one per event for the life of the engine.
    pub id: u64,
    /// Wall-clock emission time, epoch seconds.
    pub ts: i64,
    /// Open time of the bar that triggered it.
    pub bar_time: i64,
    pub symbol: String,
    pub interval: Interval,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub price: Option<f64>,
    pub kind: AlertKind,
}

pub struct AlertsEngine {
    config: AlertsConfig,
    indicators: DashboardConfig,
    history: CandleHistory,
    next_id: u64,
}

impl AlertsEngine {
    pub fn new(config: AlertsConfig) -> Self {
        Self::with_indicators(config, INDICATORS)
    }

    pub fn with_indicators(config: AlertsConfig, indicators: DashboardConfig) -> Self {
        let history = CandleHistory::with_capacity_limit(config.history_bars);
        Self {
            config,
            indicators,
            history,
            next_id: 1,
        }
    }

    pub fn config(&self) -> &AlertsConfig {
        &self.config
    }

    pub fn history(&self) -> &CandleHistory {
        &self.history
    }

    /// Adds a closed bar and returns the alerts it triggers.
    ///
    /// Bars older than the newest one held are dropped without alerts. A bar with the
    /// same time as the newest one replaces it and is evaluated again.
    pub fn on_closed_candle(&mut self, candle: Candle) -> Vec<AlertEvent> {
        if self.history.apply_live(candle) == LiveUpdate::Ignored {
            log::warn!(
                "{}: ignoring out-of-order candle at {} (last {:?})",
                self.config.symbol,
                candle.time,
                self.history.last().map(|c| c.time)
            );
            return Vec::new();
        }

        let dash = compute_dashboard(self.history.candles(), &self.indicators);
        let events = self.events_on_last_bar(&dash, &candle);

        #[cfg(debug_assertions)]
        if PRINT_ALERTS {
            for ev in &events {
                log::info!("[{} {}] {}: {}", ev.symbol, ev.interval, ev.title, ev.message);
            }
        }
        events
    }

    fn events_on_last_bar(&mut self, dash: &Dashboard, candle: &Candle) -> Vec<AlertEvent> {
        let mut events = Vec::new();
        let Some(t) = dash.len().checked_sub(1) else {
            return events;
        };
        let price = candle.close;

        // Only crosses that passed the bias filter; those are the ones that set a zone.
        if self.config.enable_efm {
            if let Some(zone) = dash.zone().filter(|z| z.mark_index == t) {
                let (fast, slow) = (self.indicators.efm.fast, self.indicators.efm.slow);
                let (title, relation) = match zone.direction {
                    Direction::Long => ("EFM Long", ">"),
                    Direction::Short => ("EFM Short", "<"),
                };
                let message = format!("EMA{} {} EMA{}. C={:.6}", fast, relation, slow, price);
                let severity = zone.direction.into();
                events.push(self.make(candle, title, message, severity, AlertKind::Efm));
            }
        }

        if self.config.enable_balance {
            let balance = dash.balance[t];
            let threshold = self.config.balance_threshold;
            if is_defined(balance) {
                if balance >= threshold {
                    let message = format!("{:.2} >= {}", balance, threshold);
                    let ev = self.make(candle, "Balance Bull", message, Severity::Bull, AlertKind::Balance);
                    events.push(ev);
                }
                if balance <= -threshold {
                    let message = format!("{:.2} <= -{}", balance, threshold);
                    let ev = self.make(candle, "Balance Bear", message, Severity::Bear, AlertKind::Balance);
                    events.push(ev);
                }
            }
        }

        if self.config.enable_rebounds {
            if let (Some(direction), Some(zone)) = (dash.rebounds.direction_at(t), dash.zone()) {
                let title = match direction {
                    Direction::Long => "Rebound LONG",
                    Direction::Short => "Rebound SHORT",
                };
                let message = format!("active zone [{:.6}, {:.6}]", zone.band.low, zone.band.high);
                let severity = direction.into();
                events.push(self.make(candle, title, message, severity, AlertKind::Rebound));
            }
        }

        if self.config.enable_rebounds_late {
            if let Some(direction) = dash.late_rebounds.direction_at(t) {
                let title = match direction {
                    Direction::Long => "Late Rebound LONG",
                    Direction::Short => "Late Rebound SHORT",
                };
                events.push(self.make(
                    candle,
                    title,
                    "late zone".to_string(),
                    direction.into(),
                    AlertKind::ReboundLate,
                ));
            }
        }

        events
    }

    fn make(
        &mut self,
        candle: &Candle,
        title: &str,
        message: String,
        severity: Severity,
        kind: AlertKind,
    ) -> AlertEvent {
        let id = self.next_id;
        self.next_id += 1;
        AlertEvent {
            id,
            ts: utc_now_as_timestamp_sec(),
            bar_time: candle.time,
            symbol: self.config.symbol.clone(),
            interval: self.config.interval,
            title: title.to_string(),
            message,
            severity,
            price: Some(candle.close),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let x = i as f64 * 0.11;
                let o = 50.0 + x.sin() * 4.0 + (x * 0.23).sin() * 3.0;
                let y = x + 0.11;
                let c = 50.0 + y.sin() * 4.0 + (y * 0.23).sin() * 3.0;
                Candle::new(i as i64 * 300, o, o.max(c) + 0.3, o.min(c) - 0.3, c)
            })
            .collect()
    }

    /// Short envelope cap so balance is defined well inside the test series.
    fn quick_indicators() -> DashboardConfig {
        let mut indicators = INDICATORS;
        indicators.nwe.cap = 60;
        indicators
    }

    fn replay(engine: &mut AlertsEngine, candles: &[Candle]) -> Vec<AlertEvent> {
        candles
            .iter()
            .flat_map(|c| engine.on_closed_candle(*c))
            .collect()
    }

    fn bar_times(events: &[AlertEvent], kind: AlertKind) -> Vec<i64> {
        events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.bar_time)
            .collect()
    }

    #[test]
    fn ids_increase_and_metadata_is_stamped() {
        let candles = wave(250);
        let mut engine = AlertsEngine::with_indicators(
            AlertsConfig::new("ETH_USDT", Interval::Min5),
            quick_indicators(),
        );
        let events = replay(&mut engine, &candles);

        assert!(events.iter().any(|e| e.kind == AlertKind::Balance));
        assert!(events.windows(2).all(|w| w[1].id == w[0].id + 1));
        assert_eq!(events[0].id, 1);
        assert!(events.iter().all(|e| e.symbol == "ETH_USDT"));
        assert!(events.iter().all(|e| e.interval == Interval::Min5));
        assert!(events.iter().all(|e| e.price.is_some()));
    }

    #[test]
    fn streaming_matches_batch_for_causal_signals() {
        let candles = wave(250);
        let mut engine = AlertsEngine::with_indicators(AlertsConfig::default(), quick_indicators());
        let events = replay(&mut engine, &candles);
        let dash = compute_dashboard(&candles, &quick_indicators());

        let mut expected_rebounds: Vec<i64> = dash
            .rebounds
            .long
            .iter()
            .chain(&dash.rebounds.short)
            .map(|&t| candles[t].time)
            .collect();
        expected_rebounds.sort();
        assert_eq!(bar_times(&events, AlertKind::Rebound), expected_rebounds);

        let threshold = AlertsConfig::default().balance_threshold;
        let expected_balance: Vec<i64> = dash
            .balance
            .iter()
            .enumerate()
            .filter(|(_, b)| b.abs() >= threshold)
            .map(|(t, _)| candles[t].time)
            .collect();
        assert_eq!(bar_times(&events, AlertKind::Balance), expected_balance);
    }

    #[test]
    fn disabled_kinds_stay_quiet() {
        let config = AlertsConfig {
            enable_balance: false,
            enable_efm: false,
            enable_rebounds: false,
            enable_rebounds_late: false,
            ..AlertsConfig::default()
        };
        let mut engine = AlertsEngine::new(config);
        assert!(replay(&mut engine, &wave(200)).is_empty());
    }

    #[test]
    fn stale_candle_is_ignored() {
        let candles = wave(30);
        let mut engine = AlertsEngine::new(AlertsConfig::default());
        replay(&mut engine, &candles);
        assert!(engine.on_closed_candle(candles[3]).is_empty());
        assert_eq!(engine.history().len(), 30);
    }

    #[test]
    fn history_is_bounded() {
        let config = AlertsConfig {
            history_bars: 50,
            ..AlertsConfig::default()
        };
        let mut engine = AlertsEngine::new(config);
        replay(&mut engine, &wave(120));
        assert_eq!(engine.history().len(), 50);
        assert_eq!(engine.history().candles()[0].time, 70 * 300);
    }

    #[test]
    fn kinds_serialize_snake_case() {
        assert_eq!(AlertKind::ReboundLate.to_string(), "rebound_late");
        assert_eq!(
            serde_json::to_string(&Severity::Bull).unwrap(),
            "\"bull\""
        );
    }
}
