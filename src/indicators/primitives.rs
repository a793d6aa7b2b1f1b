//! Foundational streaming transforms: EMA, SMA, RMA, True Range and ATR.
//!
//! Every transform returns a series the same length as its input with `NaN` before
//! its warm-up point. Leading undefined inputs are skipped: warm-up starts at the
//! first defined sample, so these can be chained onto each other's outputs.
//!
//! Two seeding conventions exist and both are kept as separate functions:
//! * mean-seeded (`ema`, `rma_mean_seeded`): the first output is the plain average
//!   of the first `length` samples. This is the canonical one.
//! * first-seeded (`ema_first_seeded`, `rma_first_seeded`): the recursion starts from
//!   the first raw sample and runs continuously; output is still withheld for the
//!   first `length - 1` bars.

use crate::domain::Candle;
use crate::utils::maths_utils::{first_defined, undefined_series};

/// Mean-seeded recursive smoother `s += alpha * (x - s)`.
fn smooth_mean_seeded(values: &[f64], length: usize, alpha: f64) -> Vec<f64> {
    let mut out = undefined_series(values.len());
    if length == 0 {
        return out;
    }
    let Some(first) = first_defined(values) else {
        return out;
    };
    let seed_end = first + length;
    if seed_end > values.len() {
        return out;
    }

    // Left-to-right accumulation keeps results reproducible
    let mut sum = 0.0;
    for &x in &values[first..seed_end] {
        sum += x;
    }
    let mut s = sum / length as f64;
    out[seed_end - 1] = s;

    for i in seed_end..values.len() {
        s += alpha * (values[i] - s);
        out[i] = s;
    }
    out
}

/// First-sample-seeded recursive smoother `s += alpha * (x - s)`.
fn smooth_first_seeded(values: &[f64], length: usize, alpha: f64) -> Vec<f64> {
    let mut out = undefined_series(values.len());
    if length == 0 {
        return out;
    }
    let Some(first) = first_defined(values) else {
        return out;
    };
    let warm_index = first + length - 1;

    let mut s = values[first];
    for i in first..values.len() {
        if i > first {
            s += alpha * (values[i] - s);
        }
        if i >= warm_index {
            out[i] = s;
        }
    }
    out
}

#[inline]
fn ema_alpha(length: usize) -> f64 {
    2.0 / (length as f64 + 1.0)
}

/// Exponential moving average seeded with the SMA of its first `length` samples.
pub fn ema(values: &[f64], length: usize) -> Vec<f64> {
    smooth_mean_seeded(values, length, ema_alpha(length))
}

/// Exponential moving average seeded with the first raw sample.
pub fn ema_first_seeded(values: &[f64], length: usize) -> Vec<f64> {
    smooth_first_seeded(values, length, ema_alpha(length))
}

/// Wilder smoothing seeded with the mean of the first `length` samples.
pub fn rma_mean_seeded(values: &[f64], length: usize) -> Vec<f64> {
    smooth_mean_seeded(values, length, 1.0 / length.max(1) as f64)
}

/// Wilder smoothing seeded with the first raw sample.
pub fn rma_first_seeded(values: &[f64], length: usize) -> Vec<f64> {
    smooth_first_seeded(values, length, 1.0 / length.max(1) as f64)
}

/// Simple moving average via a running sum with trailing subtraction.
pub fn sma(values: &[f64], length: usize) -> Vec<f64> {
    let mut out = undefined_series(values.len());
    if length == 0 {
        return out;
    }
    let Some(first) = first_defined(values) else {
        return out;
    };

    let mut sum = 0.0;
    for i in first..values.len() {
        sum += values[i];
        if i >= first + length {
            sum -= values[i - length];
        }
        if i + 1 >= first + length {
            out[i] = sum / length as f64;
        }
    }
    out
}

/// True range of bar `i`. Bar 0 has no previous close and uses its own.
pub fn true_range(candles: &[Candle], i: usize) -> f64 {
    let prev_close = if i == 0 {
        candles[0].close
    } else {
        candles[i - 1].close
    };
    candles[i].true_range(prev_close)
}

pub fn true_range_series(candles: &[Candle]) -> Vec<f64> {
    (0..candles.len()).map(|i| true_range(candles, i)).collect()
}

/// Average true range: first-seeded Wilder smoothing of the true range.
pub fn atr(candles: &[Candle], length: usize) -> Vec<f64> {
    rma_first_seeded(&true_range_series(candles), length)
}
