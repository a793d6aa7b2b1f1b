//! Balance score: where price and the envelope sit relative to the breakout
//! channel, folded into one bounded bull/bear metric.

use super::breakout::BreakoutLevels;
use super::envelope::Envelope;
use crate::config::BalanceConfig;
use crate::domain::Candle;
use crate::utils::maths_utils::{clamp01, is_defined, undefined_series};

const WEIGHT_DENOM_FLOOR: f64 = 1e-9;

/// The four normalized terms of one bar, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceTerms {
    pub bull_prox: f64,
    pub bear_prox: f64,
    pub bull_opp: f64,
    pub bear_opp: f64,
}

/// Proximity of `distance` to zero on a `scale` ruler; at or past the level counts as 1.
#[inline]
fn proximity(distance: f64, scale: f64) -> f64 {
    if distance <= 0.0 {
        1.0
    } else {
        clamp01(1.0 - distance / scale)
    }
}

pub fn balance_terms(
    close: f64,
    upper_break: f64,
    lower_break: f64,
    upper_env: f64,
    lower_env: f64,
    width: f64,
    prox_width: f64,
) -> BalanceTerms {
    let scale = prox_width * width;
    BalanceTerms {
        bull_prox: proximity(upper_break - close, scale),
        bear_prox: proximity(close - lower_break, scale),
        bull_opp: clamp01((lower_env - lower_break) / scale),
        bear_opp: clamp01((upper_break - upper_env) / scale),
    }
}

impl BalanceTerms {
    pub fn score(&self, params: &BalanceConfig) -> f64 {
        let bull_den = (params.w_up_prox + params.w_dn_out).max(WEIGHT_DENOM_FLOOR);
        let bear_den = (params.w_dn_prox + params.w_up_out).max(WEIGHT_DENOM_FLOOR);
        let bull = (params.w_up_prox * self.bull_prox + params.w_dn_out * self.bull_opp) / bull_den;
        let bear = (params.w_dn_prox * self.bear_prox + params.w_up_out * self.bear_opp) / bear_den;
        (bull - bear) * params.hist_scale
    }
}

/// Balance per bar; undefined wherever any of its inputs is.
pub fn balance_score(
    candles: &[Candle],
    envelope: &Envelope,
    levels: &BreakoutLevels,
    params: &BalanceConfig,
) -> Vec<f64> {
    let mut out = undefined_series(candles.len());
    for (t, candle) in candles.iter().enumerate() {
        let inputs = [
            candle.close,
            levels.upper[t],
            levels.lower[t],
            envelope.upper[t],
            envelope.lower[t],
            envelope.width[t],
        ];
        if !inputs.iter().all(|&x| is_defined(x)) {
            continue;
        }
        let terms = balance_terms(
            candle.close,
            levels.upper[t],
            levels.lower[t],
            envelope.upper[t],
            envelope.lower[t],
            envelope.width[t],
            params.prox_width,
        );
        let score = terms.score(params);
        if is_defined(score) {
            out[t] = score;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BreakoutConfig, NweConfig};
    use crate::indicators::{breakout_levels, envelope};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn close_through_upper_level_is_full_bull_proximity() {
        let terms = balance_terms(105.0, 104.0, 90.0, 103.0, 97.0, 2.0, 1.0);
        assert_eq!(terms.bull_prox, 1.0);
        assert_eq!(terms.bear_prox, 0.0);
        // lower_env sits 7 above the lower level: clamped to 1.
        assert_eq!(terms.bull_opp, 1.0);
        // upper level is 1 above upper_env on a 2-wide ruler.
        assert!(approx_eq(terms.bear_opp, 0.5));
    }

    #[test]
    fn symmetric_setup_scores_zero() {
        let terms = balance_terms(100.0, 101.0, 99.0, 100.5, 99.5, 2.0, 1.0);
        assert!(approx_eq(terms.score(&BalanceConfig::default()), 0.0));
    }

    #[test]
    fn zero_weights_do_not_divide_by_zero() {
        let params = BalanceConfig {
            w_up_prox: 0.0,
            w_dn_out: 0.0,
            w_dn_prox: 0.0,
            w_up_out: 0.0,
            ..Default::default()
        };
        let terms = balance_terms(100.0, 101.0, 99.0, 100.5, 99.5, 2.0, 1.0);
        assert_eq!(terms.score(&params), 0.0);
    }

    #[test]
    fn score_stays_within_hist_scale() {
        let candles: Vec<Candle> = (0..200)
            .map(|i| {
                let c = 100.0 + (i as f64 * 0.15).sin() * 8.0 + (i as f64 * 0.05).cos() * 3.0;
                Candle::new(i as i64 * 60, c - 0.3, c + 0.9, c - 0.9, c)
            })
            .collect();
        let env = envelope(
            &candles,
            &NweConfig {
                bandwidth: 8.0,
                mult: 3.0,
                cap: 30,
            },
        );
        let levels = breakout_levels(&candles, &BreakoutConfig::default());
        let params = BalanceConfig::default();
        let bal = balance_score(&candles, &env, &levels, &params);

        assert_eq!(bal.len(), candles.len());
        assert!(bal[..29].iter().all(|x| x.is_nan()));
        let defined: Vec<f64> = bal.iter().copied().filter(|x| x.is_finite()).collect();
        assert_eq!(defined.len(), candles.len() - 29);
        assert!(
            defined
                .iter()
                .all(|&b| (-params.hist_scale..=params.hist_scale).contains(&b))
        );
    }
}
