//! Streaming alert settings

use serde::{Deserialize, Serialize};

use crate::domain::Interval;

/// |balance| at or beyond this fires a balance alert
pub const DEFAULT_BALANCE_THRESHOLD: f64 = 20.0;

/// Closed bars kept by the alerts engine. Must stay above the envelope cap.
pub const ALERT_HISTORY_BARS: usize = 600;

pub const DEFAULT_SYMBOL: &str = "DOGE_USDT";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    pub symbol: String,
    pub interval: Interval,
    pub balance_threshold: f64,
    pub history_bars: usize,
    pub enable_balance: bool,
    pub enable_efm: bool,
    pub enable_rebounds: bool,
    pub enable_rebounds_late: bool,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            interval: Interval::default(),
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
            history_bars: ALERT_HISTORY_BARS,
            enable_balance: true,
            enable_efm: true,
            enable_rebounds: true,
            enable_rebounds_late: true,
        }
    }
}

impl AlertsConfig {
    pub fn new(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            symbol: symbol.into(),
            interval,
            ..Default::default()
        }
    }
}
