//! RSI and MACD.

use serde::Serialize;

use super::primitives::ema;
use crate::config::MacdConfig;
use crate::domain::Candle;
use crate::domain::candle::closes;
use crate::utils::maths_utils::{is_defined, undefined_series, zero_filled};

#[inline]
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    let rs = if avg_loss == 0.0 {
        f64::INFINITY
    } else {
        avg_gain / avg_loss
    };
    100.0 - 100.0 / (1.0 + rs)
}

/// Wilder's RSI on closes. First value at index `length`.
///
/// An undefined close poisons the recursion: everything from its first use on is
/// undefined.
pub fn rsi(candles: &[Candle], length: usize) -> Vec<f64> {
    let mut out = undefined_series(candles.len());
    if length == 0 || candles.len() <= length {
        return out;
    }

    let change = |i: usize| candles[i].close - candles[i - 1].close;
    let (mut gain, mut loss) = (0.0, 0.0);
    for i in 1..=length {
        let ch = change(i);
        if !is_defined(ch) {
            return out;
        }
        gain += ch.max(0.0);
        loss += (-ch).max(0.0);
    }
    let len = length as f64;
    let mut avg_gain = gain / len;
    let mut avg_loss = loss / len;
    out[length] = rsi_from_averages(avg_gain, avg_loss);

    for i in length + 1..candles.len() {
        let ch = change(i);
        if !is_defined(ch) {
            break;
        }
        avg_gain = (avg_gain * (len - 1.0) + ch.max(0.0)) / len;
        avg_loss = (avg_loss * (len - 1.0) + (-ch).max(0.0)) / len;
        out[i] = rsi_from_averages(avg_gain, avg_loss);
    }
    out
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

/// Classic MACD on closes, built from the mean-seeded EMA.
///
/// The signal EMA runs over the MACD line with its warm-up gap filled by zeros, so
/// it is not starved of samples; it is only reported where the MACD line exists.
pub fn macd(candles: &[Candle], params: &MacdConfig) -> MacdSeries {
    let n = candles.len();
    let mut result = MacdSeries {
        macd: undefined_series(n),
        signal: undefined_series(n),
        hist: undefined_series(n),
    };
    if params.fast == 0 || params.slow == 0 || params.signal == 0 {
        return result;
    }

    let close = closes(candles);
    let ema_fast = ema(&close, params.fast);
    let ema_slow = ema(&close, params.slow);

    for i in 0..n {
        if is_defined(ema_fast[i]) && is_defined(ema_slow[i]) {
            result.macd[i] = ema_fast[i] - ema_slow[i];
        }
    }

    let signal_line = ema(&zero_filled(&result.macd), params.signal);
    for i in 0..n {
        if is_defined(result.macd[i]) && is_defined(signal_line[i]) {
            result.signal[i] = signal_line[i];
            result.hist[i] = result.macd[i] - signal_line[i];
        }
    }
    result
}
