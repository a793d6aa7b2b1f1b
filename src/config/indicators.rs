//! Indicator and detector parameters.
//!
//! The indicator functions never invent defaults; every call takes one of these
//! bundles. `INDICATORS` is the master table the calling layer starts from.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Kernel-regression envelope ("NWE").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NweConfig {
    /// Gaussian bandwidth `h`, in bars.
    pub bandwidth: f64,
    /// Half-width multiplier applied to the smoothed absolute error.
    pub mult: f64,
    /// Maximum kernel lag, also the error-smoothing length.
    pub cap: usize,
}

/// Rolling high/low channel pushed outward by an ATR buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub range_len: usize,
    pub atr_len: usize,
    pub buf_atr: f64,
}

/// Weights for the composite balance oscillator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub hist_scale: f64,
    pub prox_width: f64,
    pub w_up_prox: f64,
    pub w_dn_out: f64,
    pub w_dn_prox: f64,
    pub w_up_out: f64,
}

/// Double-smoothed Heikin-Ashi trend filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketBiasConfig {
    pub ha_len: usize,
    pub ha_len2: usize,
    pub osc_len: usize,
}

/// Fast/slow EMA pair whose crossings are the EFM events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfmConfig {
    pub fast: usize,
    pub slow: usize,
}

/// What the rebound wick is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WickReference {
    #[default]
    Range,
    Body,
}

/// Candle-shape and zone-touch thresholds shared by both rebound detectors.
/// Every `*_atr` field is a multiple of ATR (or of the raw true range during warm-up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReboundConfig {
    pub body_max_frac: f64,
    pub wick_min_frac: f64,
    pub wick_reference: WickReference,
    /// Tolerance around the zone boundaries.
    pub eps_atr: f64,
    /// Minimum penetration into the zone.
    pub touch_atr: f64,
    pub impulse_body_ratio: f64,
    pub impulse_atr_ratio: f64,
    pub use_impulse: bool,
    /// Tolerance around the bias line, and the "already extended" distance.
    pub bias_eps_atr: f64,
    /// Also require the bias oscillator to lean the same way.
    pub require_strong_bias: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateReboundConfig {
    pub min_bars: usize,
    pub top_frac_long: f64,
    pub bot_frac_short: f64,
    pub disp_atr: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Everything the dashboard computes in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Chart overlay EMA (first-value seeded).
    pub overlay_ema: usize,
    pub rsi_len: usize,
    pub macd: MacdConfig,
    /// ATR used by the rebound detectors' thresholds.
    pub atr_len: usize,
    pub nwe: NweConfig,
    pub breakout: BreakoutConfig,
    pub balance: BalanceConfig,
    pub market_bias: MarketBiasConfig,
    pub efm: EfmConfig,
    pub rebound: ReboundConfig,
    pub late_rebound: LateReboundConfig,
}

pub const INDICATORS: DashboardConfig = DashboardConfig {
    overlay_ema: 20,
    rsi_len: 14,
    macd: MacdConfig {
        fast: 12,
        slow: 26,
        signal: 9,
    },
    atr_len: 14,

    nwe: NweConfig {
        bandwidth: 8.0,
        mult: 3.0,
        // 500 bars of kernel (lags 0..=499) keeps the per-bar cost bounded
        cap: 499,
    },

    breakout: BreakoutConfig {
        range_len: 16,
        atr_len: 14,
        buf_atr: 0.20,
    },

    balance: BalanceConfig {
        hist_scale: 100.0,
        prox_width: 1.0,
        w_up_prox: 0.60,
        w_dn_out: 0.40,
        w_dn_prox: 0.60,
        w_up_out: 0.40,
    },

    market_bias: MarketBiasConfig {
        ha_len: 100,
        ha_len2: 100,
        osc_len: 7,
    },

    efm: EfmConfig { fast: 13, slow: 48 },

    rebound: ReboundConfig {
        body_max_frac: 0.55,
        wick_min_frac: 0.35,
        wick_reference: WickReference::Range,
        eps_atr: 0.03,
        touch_atr: 0.02,
        impulse_body_ratio: 0.60,
        impulse_atr_ratio: 0.35,
        use_impulse: true,
        bias_eps_atr: 0.10,
        require_strong_bias: false,
    },

    late_rebound: LateReboundConfig {
        min_bars: 12,
        top_frac_long: 0.25,
        bot_frac_short: 0.25,
        disp_atr: 0.02,
    },
};

impl Default for DashboardConfig {
    fn default() -> Self {
        INDICATORS
    }
}

impl DashboardConfig {
    /// Reads a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&raw)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

macro_rules! default_from_indicators {
    ($ty:ty, $field:ident) => {
        impl Default for $ty {
            fn default() -> Self {
                INDICATORS.$field
            }
        }
    };
}

default_from_indicators!(NweConfig, nwe);
default_from_indicators!(BreakoutConfig, breakout);
default_from_indicators!(BalanceConfig, balance);
default_from_indicators!(MarketBiasConfig, market_bias);
default_from_indicators!(EfmConfig, efm);
default_from_indicators!(ReboundConfig, rebound);
default_from_indicators!(LateReboundConfig, late_rebound);
default_from_indicators!(MacdConfig, macd);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"efm":{"fast":5},"rebound":{"wick_reference":"body"}}"#)
                .unwrap();
        assert_eq!(config.efm.fast, 5);
        assert_eq!(config.efm.slow, INDICATORS.efm.slow);
        assert_eq!(config.rebound.wick_reference, WickReference::Body);
        assert_eq!(config.nwe, INDICATORS.nwe);
    }
}
