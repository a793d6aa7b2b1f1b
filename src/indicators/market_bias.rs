//! Market bias: Heikin-Ashi candles built from EMA-smoothed OHLC, smoothed again.
//!
//! Gives a bias line (`avg`) used to gate signal directions and a bias-strength
//! oscillator with its own EMA.

use serde::Serialize;
use strum_macros::Display;

use super::primitives::ema;
use crate::config::MarketBiasConfig;
use crate::domain::Candle;
use crate::domain::candle::{closes, highs, lows, opens};
use crate::utils::maths_utils::{first_defined, is_defined, masked_by, undefined_series, zero_filled};

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeikinAshi {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketBias {
    /// Bias line: midpoint of the smoothed HA high and low.
    pub avg: Vec<f64>,
    pub osc_bias: Vec<f64>,
    pub osc_smooth: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum BiasState {
    StrongBull,
    Bull,
    Neutral,
    Bear,
    StrongBear,
}

impl BiasState {
    pub fn is_bullish(&self) -> bool {
        matches!(self, BiasState::StrongBull | BiasState::Bull)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, BiasState::StrongBear | BiasState::Bear)
    }
}

/// Strong when the oscillator is on its side of zero and leads its own average,
/// otherwise the plain sign of the oscillator.
pub fn classify_bias(osc_bias: f64, osc_smooth: f64) -> BiasState {
    if !is_defined(osc_bias) {
        return BiasState::Neutral;
    }
    let smooth_ok = is_defined(osc_smooth);
    if osc_bias > 0.0 && smooth_ok && osc_bias >= osc_smooth {
        BiasState::StrongBull
    } else if osc_bias < 0.0 && smooth_ok && osc_bias <= osc_smooth {
        BiasState::StrongBear
    } else if osc_bias > 0.0 {
        BiasState::Bull
    } else if osc_bias < 0.0 {
        BiasState::Bear
    } else {
        BiasState::Neutral
    }
}

/// Heikin-Ashi candles from (already smoothed) OHLC columns.
///
/// The recursion starts at the first bar where all four inputs are defined; earlier
/// bars stay undefined.
pub fn heikin_ashi(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> HeikinAshi {
    let n = close.len();
    let mut ha = HeikinAshi {
        open: undefined_series(n),
        high: undefined_series(n),
        low: undefined_series(n),
        close: undefined_series(n),
    };
    let start = (0..n).find(|&i| {
        is_defined(open[i]) && is_defined(high[i]) && is_defined(low[i]) && is_defined(close[i])
    });
    let Some(start) = start else {
        return ha;
    };

    for i in start..n {
        let ha_close = (open[i] + high[i] + low[i] + close[i]) / 4.0;
        let ha_open = if i == start {
            (open[i] + close[i]) / 2.0
        } else {
            (ha.open[i - 1] + ha.close[i - 1]) / 2.0
        };
        ha.open[i] = ha_open;
        ha.close[i] = ha_close;
        // f64::max/min would silently drop a NaN operand.
        let parts_defined = is_defined(ha_open) && is_defined(ha_close);
        ha.high[i] = if parts_defined && is_defined(high[i]) {
            high[i].max(ha_open).max(ha_close)
        } else {
            f64::NAN
        };
        ha.low[i] = if parts_defined && is_defined(low[i]) {
            low[i].min(ha_open).min(ha_close)
        } else {
            f64::NAN
        };
    }
    ha
}

pub fn market_bias(candles: &[Candle], params: &MarketBiasConfig) -> MarketBias {
    let n = candles.len();
    if params.ha_len == 0 || params.ha_len2 == 0 || params.osc_len == 0 {
        return MarketBias {
            avg: undefined_series(n),
            osc_bias: undefined_series(n),
            osc_smooth: undefined_series(n),
        };
    }

    let o = ema(&opens(candles), params.ha_len);
    let h = ema(&highs(candles), params.ha_len);
    let l = ema(&lows(candles), params.ha_len);
    let c = ema(&closes(candles), params.ha_len);
    let ha = heikin_ashi(&o, &h, &l, &c);

    let s_open = ema(&ha.open, params.ha_len2);
    let s_high = ema(&ha.high, params.ha_len2);
    let s_low = ema(&ha.low, params.ha_len2);
    let s_close = ema(&ha.close, params.ha_len2);

    let avg: Vec<f64> = s_high.iter().zip(&s_low).map(|(&h, &l)| (h + l) / 2.0).collect();
    let osc_bias: Vec<f64> = s_close
        .iter()
        .zip(&s_open)
        .map(|(&c, &o)| 100.0 * (c - o))
        .collect();

    // Leading undefined positions are zero-filled only to keep the EMA fed.
    let osc_smooth = match first_defined(&osc_bias) {
        Some(_) => masked_by(&ema(&zero_filled(&osc_bias), params.osc_len), &osc_bias),
        None => undefined_series(n),
    };

    MarketBias {
        avg,
        osc_bias,
        osc_smooth,
    }
}

impl MarketBias {
    pub fn state_at(&self, t: usize) -> BiasState {
        classify_bias(self.osc_bias[t], self.osc_smooth[t])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn trending(n: usize, step: f64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let o = 100.0 + i as f64 * step;
                let c = o + step;
                Candle::new(i as i64 * 60, o, o.max(c) + 0.5, o.min(c) - 0.5, c)
            })
            .collect()
    }

    #[test]
    fn heikin_ashi_recursion() {
        let o = [f64::NAN, 10.0, 11.0];
        let h = [f64::NAN, 12.0, 13.0];
        let l = [f64::NAN, 9.0, 10.0];
        let c = [f64::NAN, 11.0, 12.0];
        let ha = heikin_ashi(&o, &h, &l, &c);

        assert!(ha.open[0].is_nan());
        assert!(approx_eq(ha.open[1], 10.5));
        assert!(approx_eq(ha.close[1], 10.5));
        assert!(approx_eq(ha.open[2], 10.5));
        assert!(approx_eq(ha.close[2], 11.5));
        assert!(approx_eq(ha.high[2], 13.0));
        assert!(approx_eq(ha.low[2], 10.0));
    }

    #[test]
    fn heikin_ashi_propagates_nan_after_start() {
        let o = [1.0, 1.0, 1.0];
        let h = [2.0, f64::NAN, 2.0];
        let l = [0.5, 0.5, 0.5];
        let c = [1.5, 1.5, 1.5];
        let ha = heikin_ashi(&o, &h, &l, &c);

        assert!(ha.high[0].is_finite());
        assert!(ha.high[1].is_nan() && ha.low[1].is_nan() && ha.close[1].is_nan());
        // haOpen recursion carries the gap forward.
        assert!(ha.open[2].is_nan() && ha.high[2].is_nan() && ha.low[2].is_nan());
    }

    #[test]
    fn warm_up_chains_both_smoothing_passes() {
        let params = MarketBiasConfig {
            ha_len: 5,
            ha_len2: 4,
            osc_len: 3,
        };
        let bias = market_bias(&trending(40, 1.0), &params);

        // First smoothing defined at 4, second at 4 + 3.
        assert!(bias.avg[..7].iter().all(|x| x.is_nan()));
        assert!(bias.avg[7..].iter().all(|x| x.is_finite()));
        assert!(bias.osc_smooth[..7].iter().all(|x| x.is_nan()));
        assert!(bias.osc_smooth[7..].iter().all(|x| x.is_finite()));
    }

    #[test]
    fn uptrend_reads_bullish() {
        let params = MarketBiasConfig {
            ha_len: 5,
            ha_len2: 5,
            osc_len: 3,
        };
        let candles = trending(60, 1.0);
        let bias = market_bias(&candles, &params);
        let last = candles.len() - 1;

        assert!(bias.osc_bias[last] > 0.0);
        assert!(bias.state_at(last).is_bullish());
        assert!(candles[last].close > bias.avg[last]);
    }

    #[test]
    fn classification_falls_back_to_sign() {
        assert_eq!(classify_bias(5.0, 3.0), BiasState::StrongBull);
        assert_eq!(classify_bias(5.0, 7.0), BiasState::Bull);
        assert_eq!(classify_bias(-5.0, -3.0), BiasState::StrongBear);
        assert_eq!(classify_bias(-5.0, -7.0), BiasState::Bear);
        assert_eq!(classify_bias(-5.0, f64::NAN), BiasState::Bear);
        assert_eq!(classify_bias(0.0, 1.0), BiasState::Neutral);
        assert_eq!(classify_bias(f64::NAN, 1.0), BiasState::Neutral);
    }
}
