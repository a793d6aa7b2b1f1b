//! Primary rebound detector.
//!
//! One left-to-right fold. A qualifying EFM event (one the bias filter agrees with)
//! defines a zone; every later bar is checked for a pull-back candle that comes back
//! into it. The zone is only ever replaced by the next qualifying event, and a match
//! does not consume it.

use serde::Serialize;

use super::efm::{CrossEvents, side_at};
#[cfg(debug_assertions)]
use crate::config::debug::{PRINT_REBOUND_MATCHES, PRINT_ZONE_UPDATES};
use crate::config::{ReboundConfig, WickReference};
use crate::domain::{Candle, Direction, PriceBand, ZoneSnapshot};
use crate::indicators::MarketBias;
use crate::indicators::primitives::true_range;
use crate::utils::maths_utils::{is_defined, or_fallback};

/// Everything the rebound detectors read besides their own parameters.
pub struct ReboundContext<'a> {
    pub candles: &'a [Candle],
    pub bias: &'a MarketBias,
    pub atr: &'a [f64],
}

impl ReboundContext<'_> {
    /// ATR at `t`, or the raw true range while ATR is undefined.
    pub fn atr_at(&self, t: usize) -> f64 {
        or_fallback(self.atr[t], true_range(self.candles, t))
    }

    /// Does the bias filter let `direction` through at `t`?
    ///
    /// Passes whenever the bias line is undefined so warm-up never blocks signals.
    /// `tolerance` lets price sit slightly on the wrong side of the line.
    pub fn bias_allows(
        &self,
        direction: Direction,
        t: usize,
        tolerance: f64,
        params: &ReboundConfig,
    ) -> bool {
        let avg = self.bias.avg[t];
        if !is_defined(avg) {
            return true;
        }
        let close = self.candles[t].close;
        let line_ok = match direction {
            Direction::Long => close > avg - tolerance,
            Direction::Short => close < avg + tolerance,
        };
        if !line_ok {
            return false;
        }
        if params.require_strong_bias && is_defined(self.bias.osc_bias[t]) {
            let state = self.bias.state_at(t);
            return match direction {
                Direction::Long => state.is_bullish(),
                Direction::Short => state.is_bearish(),
            };
        }
        true
    }

    /// Close already beyond the bias line by more than `tolerance`.
    fn is_extended(&self, direction: Direction, t: usize, tolerance: f64) -> bool {
        let avg = self.bias.avg[t];
        if !is_defined(avg) {
            return false;
        }
        let close = self.candles[t].close;
        match direction {
            Direction::Long => close - avg > tolerance,
            Direction::Short => avg - close > tolerance,
        }
    }
}

/// Candle-shape and zone-touch test shared by the primary and late detectors.
///
/// A touching candle matches either as a pull-back (closes the zone's way, small
/// body, long wick on the zone side) or as an impulse (large body or large move).
///
/// `atr` is the already-resolved volatility unit for this bar.
pub fn candle_rebounds(
    direction: Direction,
    candle: &Candle,
    band: &PriceBand,
    atr: f64,
    params: &ReboundConfig,
) -> bool {
    let range = candle.range();
    if !(range > 0.0) {
        return false;
    }

    let eps = params.eps_atr * atr;
    let touch_min = params.touch_atr * atr;
    let touched = match direction {
        Direction::Long => {
            band.contains(candle.low, eps) && (band.high - candle.low).max(0.0) >= touch_min
        }
        Direction::Short => {
            band.contains(candle.high, eps) && (candle.high - band.low).max(0.0) >= touch_min
        }
    };
    if !touched {
        return false;
    }

    let body = candle.body();
    let wick = match direction {
        Direction::Long => candle.lower_wick(),
        Direction::Short => candle.upper_wick(),
    };
    let reference = match params.wick_reference {
        WickReference::Range => range,
        WickReference::Body => body,
    };
    let basic = direction.agrees_with(candle)
        && body <= params.body_max_frac * range
        && wick >= params.wick_min_frac * reference;
    // Impulse candles only need the touch; they may close against the zone's side.
    let impulse = params.use_impulse
        && (body >= params.impulse_body_ratio * range
            || direction.directional_move(candle) >= params.impulse_atr_ratio * atr);
    basic || impulse
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReboundSignals {
    pub long: Vec<usize>,
    pub short: Vec<usize>,
    /// Zone left standing after the scan; feeds the late detector.
    pub last_zone: Option<ZoneSnapshot>,
}

impl ReboundSignals {
    pub fn direction_at(&self, t: usize) -> Option<Direction> {
        side_at(&self.long, &self.short, t)
    }

    fn push(&mut self, direction: Direction, t: usize) {
        match direction {
            Direction::Long => self.long.push(t),
            Direction::Short => self.short.push(t),
        }
    }
}

/// Zone for a qualifying event at `t`: the previous candle's full range when the
/// move is already extended past the bias line, otherwise the signal candle's body.
fn form_zone(ctx: &ReboundContext, direction: Direction, t: usize, tolerance: f64) -> ZoneSnapshot {
    let candle = &ctx.candles[t];
    let band = if t > 0 && ctx.is_extended(direction, t, tolerance) {
        let prev = &ctx.candles[t - 1];
        PriceBand::new(prev.low, prev.high)
    } else {
        PriceBand::new(candle.open, candle.close)
    };
    let (mark_body_low, mark_body_high) = candle.body_range();
    ZoneSnapshot {
        direction,
        band,
        mark_index: t,
        mark_body_low,
        mark_body_high,
    }
}

pub fn detect_rebounds(
    ctx: &ReboundContext,
    crosses: &CrossEvents,
    params: &ReboundConfig,
) -> ReboundSignals {
    let events = crosses.by_index(ctx.candles.len());

    (0..ctx.candles.len()).fold(ReboundSignals::default(), |mut acc, t| {
        let atr = ctx.atr_at(t);
        let tolerance = params.bias_eps_atr * atr;

        if let Some(direction) = events[t] {
            if ctx.bias_allows(direction, t, tolerance, params) {
                let zone = form_zone(ctx, direction, t, tolerance);
                #[cfg(debug_assertions)]
                if PRINT_ZONE_UPDATES {
                    log::debug!(
                        "zone {} at bar {}: [{:.6}, {:.6}]",
                        direction,
                        t,
                        zone.band.low,
                        zone.band.high
                    );
                }
                acc.last_zone = Some(zone);
            }
        }

        // The signal bar itself defines the zone; only later bars can rebound off it.
        if let Some(zone) = acc.last_zone {
            if t > zone.mark_index
                && ctx.bias_allows(zone.direction, t, tolerance, params)
                && candle_rebounds(zone.direction, &ctx.candles[t], &zone.band, atr, params)
            {
                #[cfg(debug_assertions)]
                if PRINT_REBOUND_MATCHES {
                    log::debug!("rebound {} at bar {} (atr {:.6})", zone.direction, t, atr);
                }
                acc.push(zone.direction, t);
            }
        }
        acc
    })
}
