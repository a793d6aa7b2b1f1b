//! Late rebound detector.
//!
//! Runs after the primary scan from the zone it left behind. Only considers bars at
//! least `min_bars` past the zone's signal candle, and only the part of the signal
//! body nearest the continuation side (its top for longs, bottom for shorts).

use serde::Serialize;

use super::efm::side_at;
use super::rebound::{ReboundContext, candle_rebounds};
#[cfg(debug_assertions)]
use crate::config::debug::PRINT_REBOUND_MATCHES;
use crate::config::{LateReboundConfig, ReboundConfig};
use crate::domain::{Direction, PriceBand, ZoneSnapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LateReboundSignals {
    pub long: Vec<usize>,
    pub short: Vec<usize>,
}

impl LateReboundSignals {
    pub fn direction_at(&self, t: usize) -> Option<Direction> {
        side_at(&self.long, &self.short, t)
    }
}

/// Slice of the signal body a late rebound must touch, padded by `displacement`.
pub fn late_band(zone: &ZoneSnapshot, displacement: f64, params: &LateReboundConfig) -> PriceBand {
    let size = zone.mark_body_size();
    match zone.direction {
        Direction::Long => {
            let top_low = zone.mark_body_high - size * params.top_frac_long;
            PriceBand::new(top_low - displacement, zone.mark_body_high + displacement)
        }
        Direction::Short => {
            let bot_high = zone.mark_body_low + size * params.bot_frac_short;
            PriceBand::new(zone.mark_body_low - displacement, bot_high + displacement)
        }
    }
}

pub fn detect_late_rebounds(
    ctx: &ReboundContext,
    zone: Option<&ZoneSnapshot>,
    rebound: &ReboundConfig,
    params: &LateReboundConfig,
) -> LateReboundSignals {
    let mut out = LateReboundSignals::default();
    let Some(zone) = zone else {
        return out;
    };

    let start = zone.mark_index.saturating_add(params.min_bars);
    for t in start..ctx.candles.len() {
        let atr = ctx.atr_at(t);
        let band = late_band(zone, params.disp_atr * atr, params);
        let tolerance = rebound.bias_eps_atr * atr;

        if !ctx.bias_allows(zone.direction, t, tolerance, rebound)
            || !candle_rebounds(zone.direction, &ctx.candles[t], &band, atr, rebound)
        {
            continue;
        }
        #[cfg(debug_assertions)]
        if PRINT_REBOUND_MATCHES {
            log::debug!("late rebound {} at bar {}", zone.direction, t);
        }
        match zone.direction {
            Direction::Long => out.long.push(t),
            Direction::Short => out.short.push(t),
        }
    }
    out
}
