//! Breakout levels: the prior bar's rolling high/low channel pushed outward by an
//! ATR buffer.

use serde::Serialize;

use super::primitives::atr;
use crate::config::BreakoutConfig;
use crate::domain::Candle;
use crate::domain::candle::{highs, lows};
use crate::utils::maths_utils::{get_max, get_min, is_defined, undefined_series};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BreakoutLevels {
    /// Highest high of the reference window (before the buffer).
    pub prior_high: Vec<f64>,
    /// Lowest low of the reference window (before the buffer).
    pub prior_low: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Inclusive index range of the reference window for bar `t`.
///
/// The window ends on the previous bar so bar `t` never sees itself; bar 0 has no
/// previous bar and uses itself. Near the start the window shrinks instead of
/// reaching before index 0.
pub fn reference_window(t: usize, range_len: usize) -> (usize, usize) {
    let end = t.saturating_sub(1);
    let len = range_len.min(end + 1);
    (end + 1 - len, end)
}

pub fn breakout_levels(candles: &[Candle], params: &BreakoutConfig) -> BreakoutLevels {
    let n = candles.len();
    let mut levels = BreakoutLevels {
        prior_high: undefined_series(n),
        prior_low: undefined_series(n),
        upper: undefined_series(n),
        lower: undefined_series(n),
    };
    if params.range_len == 0 || n == 0 {
        return levels;
    }

    let atr = atr(candles, params.atr_len);
    let high = highs(candles);
    let low = lows(candles);

    for t in 0..n {
        let (start, end) = reference_window(t, params.range_len);
        let hh = get_max(&high[start..=end]);
        let ll = get_min(&low[start..=end]);
        levels.prior_high[t] = hh;
        levels.prior_low[t] = ll;

        if is_defined(atr[t]) {
            let buf = params.buf_atr * atr[t];
            levels.upper[t] = hh + buf;
            levels.lower[t] = ll - buf;
        }
    }
    levels
}
