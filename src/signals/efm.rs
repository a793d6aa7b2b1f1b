//! EFM cross events: fast/slow EMA crossovers.

use itertools::Itertools;
use serde::Serialize;

use crate::config::EfmConfig;
use crate::domain::candle::closes;
use crate::domain::{Candle, Direction};
use crate::indicators::ema;
use crate::utils::maths_utils::is_defined;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossEvents {
    pub long: Vec<usize>,
    pub short: Vec<usize>,
}

/// Side whose sorted index list contains `i`. Long wins if both do.
pub fn side_at(long: &[usize], short: &[usize], i: usize) -> Option<Direction> {
    if long.binary_search(&i).is_ok() {
        Some(Direction::Long)
    } else if short.binary_search(&i).is_ok() {
        Some(Direction::Short)
    } else {
        None
    }
}

impl CrossEvents {
    /// Direction of the event at `i`, if any. Never both.
    pub fn direction_at(&self, i: usize) -> Option<Direction> {
        side_at(&self.long, &self.short, i)
    }

    /// Per-bar lookup table, cheaper than repeated searches in a full scan.
    pub fn by_index(&self, n: usize) -> Vec<Option<Direction>> {
        let mut table = vec![None; n];
        for &i in self.short.iter().filter(|&&i| i < n) {
            table[i] = Some(Direction::Short);
        }
        // Long written last so a shared index agrees with `side_at`.
        for &i in self.long.iter().filter(|&&i| i < n) {
            table[i] = Some(Direction::Long);
        }
        table
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EfmLines {
    pub fast: Vec<f64>,
    pub slow: Vec<f64>,
}

pub fn efm_lines(candles: &[Candle], params: &EfmConfig) -> EfmLines {
    let close = closes(candles);
    EfmLines {
        fast: ema(&close, params.fast),
        slow: ema(&close, params.slow),
    }
}

/// Scans consecutive bars for crossings. Both lines must be defined on both bars.
pub fn detect_crosses(fast: &[f64], slow: &[f64]) -> CrossEvents {
    let mut events = CrossEvents::default();
    for (i, ((&f0, &s0), (&f1, &s1))) in fast.iter().zip(slow).tuple_windows().enumerate() {
        if ![f0, s0, f1, s1].iter().all(|&x| is_defined(x)) {
            continue;
        }
        let idx = i + 1;
        if f0 <= s0 && f1 > s1 {
            events.long.push(idx);
        } else if f0 >= s0 && f1 < s1 {
            events.short.push(idx);
        }
    }
    events
}
