//! Configuration module for the indicator core and its calling layer.

pub mod alerts;
pub mod indicators;

pub(crate) mod debug; // Callers use crate::config::debug::PRINT_* behind cfg(debug_assertions)

// Re-export commonly used items
pub use alerts::{ALERT_HISTORY_BARS, AlertsConfig, DEFAULT_BALANCE_THRESHOLD};
pub use indicators::{
    BalanceConfig, BreakoutConfig, DashboardConfig, EfmConfig, INDICATORS, LateReboundConfig,
    MacdConfig, MarketBiasConfig, NweConfig, ReboundConfig, WickReference,
};
