use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use super::candle::Candle;

/// Side of a cross event, zone or rebound.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// True when the candle closes the way this side wants (flat closes count for both).
    pub fn agrees_with(&self, candle: &Candle) -> bool {
        match self {
            Direction::Long => candle.close >= candle.open,
            Direction::Short => candle.close <= candle.open,
        }
    }

    /// Signed move of the candle in this side's favour.
    pub fn directional_move(&self, candle: &Candle) -> f64 {
        match self {
            Direction::Long => candle.close - candle.open,
            Direction::Short => candle.open - candle.close,
        }
    }
}

/// Price band a rebound must come back into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.low - tolerance && price <= self.high + tolerance
    }
}

/// The active rebound zone plus the candle that defined it.
///
/// Only ever overwritten by a newer qualifying cross, never cleared. The copy left
/// after the primary pass is what the late detector works from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub direction: Direction,
    pub band: PriceBand,
    pub mark_index: usize,
    pub mark_body_low: f64,
    pub mark_body_high: f64,
}

impl ZoneSnapshot {
    pub fn mark_body_size(&self) -> f64 {
        (self.mark_body_high - self.mark_body_low).max(0.0)
    }
}
