//! Kernel-regression envelope (Nadaraya-Watson style, "NWE").
//!
//! Centre line: Gaussian-weighted average of the current and up to `cap` previous
//! closes. Half-width: mean-seeded Wilder average of `|close - centre|` over `cap`
//! bars, times `mult`.

use serde::Serialize;

use super::primitives::rma_mean_seeded;
use crate::config::NweConfig;
use crate::domain::Candle;
use crate::utils::maths_utils::{is_defined, undefined_series};

const KERNEL_DENOM_FLOOR: f64 = 1e-12;
/// Floor for the exposed envelope width, so it can be divided by.
pub const ENVELOPE_WIDTH_FLOOR: f64 = 1e-10;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Envelope {
    pub center: Vec<f64>,
    pub mae: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    /// `mae` floored at `ENVELOPE_WIDTH_FLOOR`.
    pub width: Vec<f64>,
}

impl Envelope {
    fn undefined(n: usize) -> Self {
        Self {
            center: undefined_series(n),
            mae: undefined_series(n),
            upper: undefined_series(n),
            lower: undefined_series(n),
            width: undefined_series(n),
        }
    }
}

/// Gaussian weights for lags `0..=cap`.
fn kernel_weights(bandwidth: f64, cap: usize) -> Vec<f64> {
    let two_h_sq = 2.0 * bandwidth * bandwidth;
    (0..=cap)
        .map(|j| {
            let j = j as f64;
            (-(j * j) / two_h_sq).exp()
        })
        .collect()
}

/// Gaussian-weighted centre line. At `t = 0` this is just `close[0]`.
pub fn kernel_center(candles: &[Candle], bandwidth: f64, cap: usize) -> Vec<f64> {
    let n = candles.len();
    if !(bandwidth > 0.0 && bandwidth.is_finite()) || cap == 0 {
        return undefined_series(n);
    }
    let weights = kernel_weights(bandwidth, cap);

    (0..n)
        .map(|t| {
            let lags = cap.min(t);
            let (mut sum, mut weight_sum) = (0.0, 0.0);
            for (j, &w) in weights.iter().enumerate().take(lags + 1) {
                sum += candles[t - j].close * w;
                weight_sum += w;
            }
            sum / weight_sum.max(KERNEL_DENOM_FLOOR)
        })
        .collect()
}

pub fn envelope(candles: &[Candle], params: &NweConfig) -> Envelope {
    let n = candles.len();
    if !params.mult.is_finite() {
        return Envelope::undefined(n);
    }
    let center = kernel_center(candles, params.bandwidth, params.cap);
    if !center.iter().any(|&x| is_defined(x)) {
        return Envelope::undefined(n);
    }

    let abs_err: Vec<f64> = candles
        .iter()
        .zip(&center)
        .map(|(c, &out)| (c.close - out).abs())
        .collect();
    let mae: Vec<f64> = rma_mean_seeded(&abs_err, params.cap)
        .into_iter()
        .map(|e| e * params.mult)
        .collect();

    let mut env = Envelope {
        upper: undefined_series(n),
        lower: undefined_series(n),
        width: undefined_series(n),
        center,
        mae,
    };
    for t in 0..n {
        let (out, mae) = (env.center[t], env.mae[t]);
        if is_defined(out) && is_defined(mae) {
            env.upper[t] = out + mae;
            env.lower[t] = out - mae;
            env.width[t] = mae.max(ENVELOPE_WIDTH_FLOOR);
        }
    }
    env
}
