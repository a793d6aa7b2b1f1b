use itertools::Itertools;

#[cfg(debug_assertions)]
use crate::config::debug::PRINT_HISTORY_MERGES;
use crate::domain::Candle;

/// What `apply_live` did with an incoming bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveUpdate {
    /// Newer than the last bar.
    Appended,
    /// Same open time as the last bar: the in-progress bar was updated.
    Replaced,
    /// Older than the last bar.
    Ignored,
}

/// Time-ordered candle sequence with unique open times.
///
/// Grows at the tail from the live feed and at the head from history backfills.
/// With a capacity the oldest bars fall off first.
#[derive(Debug, Clone, Default)]
pub struct CandleHistory {
    candles: Vec<Candle>,
    capacity: Option<usize>,
}

impl CandleHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            candles: Vec::with_capacity(capacity),
            capacity: Some(capacity),
        }
    }

    /// Sorts by time and keeps the first bar seen for each time.
    pub fn from_candles(candles: Vec<Candle>) -> Self {
        let mut history = Self::new();
        history.candles = sorted_unique(candles);
        history
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }

    pub fn apply_live(&mut self, candle: Candle) -> LiveUpdate {
        let outcome = match self.candles.last().map(|c| c.time) {
            Some(last_time) if candle.time < last_time => LiveUpdate::Ignored,
            Some(last_time) if candle.time == last_time => {
                if let Some(last) = self.candles.last_mut() {
                    *last = candle;
                }
                LiveUpdate::Replaced
            }
            _ => {
                self.candles.push(candle);
                LiveUpdate::Appended
            }
        };
        if outcome == LiveUpdate::Appended {
            self.enforce_capacity();
        }
        outcome
    }

    /// Merges older bars into the sequence. Bars already present win over incoming
    /// ones with the same time. Returns how many bars were added.
    pub fn prepend_history(&mut self, older: Vec<Candle>) -> usize {
        let before = self.candles.len();
        let mut merged = std::mem::take(&mut self.candles);
        merged.extend(older);
        self.candles = sorted_unique(merged);
        let added = self.candles.len() - before;

        #[cfg(debug_assertions)]
        if PRINT_HISTORY_MERGES {
            log::info!("History merge: +{} bars, {} total", added, self.candles.len());
        }

        self.enforce_capacity();
        added
    }

    fn enforce_capacity(&mut self) {
        if let Some(cap) = self.capacity {
            if self.candles.len() > cap {
                let excess = self.candles.len() - cap;
                self.candles.drain(..excess);
            }
        }
    }
}

/// Stable sort keeps insertion order within equal times, so `unique_by` keeps the earliest.
fn sorted_unique(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.sort_by_key(|c| c.time);
    candles.into_iter().unique_by(|c| c.time).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: i64, close: f64) -> Candle {
        Candle::new(time, close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn live_updates_append_replace_ignore() {
        let mut history = CandleHistory::new();
        assert_eq!(history.apply_live(bar(60, 1.0)), LiveUpdate::Appended);
        assert_eq!(history.apply_live(bar(120, 2.0)), LiveUpdate::Appended);
        assert_eq!(history.apply_live(bar(120, 2.5)), LiveUpdate::Replaced);
        assert_eq!(history.apply_live(bar(60, 9.0)), LiveUpdate::Ignored);

        assert_eq!(history.len(), 2);
        assert_eq!(history.last().map(|c| c.close), Some(2.5));
        assert_eq!(history.candles()[0].close, 1.0);
    }

    #[test]
    fn backfill_merges_and_existing_bars_win() {
        let mut history = CandleHistory::from_candles(vec![bar(180, 3.0), bar(240, 4.0)]);
        let added = history.prepend_history(vec![bar(60, 1.0), bar(120, 2.0), bar(180, 99.0)]);

        assert_eq!(added, 2);
        let times: Vec<i64> = history.candles().iter().map(|c| c.time).collect();
        assert_eq!(times, vec![60, 120, 180, 240]);
        assert_eq!(history.candles()[2].close, 3.0);
    }

    #[test]
    fn from_candles_sorts_and_dedups() {
        let history = CandleHistory::from_candles(vec![bar(120, 2.0), bar(60, 1.0), bar(120, 7.0)]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.candles()[1].close, 2.0);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut history = CandleHistory::with_capacity_limit(3);
        for i in 0..5 {
            history.apply_live(bar(i * 60, i as f64));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.candles()[0].time, 120);

        // A backfill older than everything kept is trimmed straight back off.
        history.prepend_history(vec![bar(0, 0.0)]);
        assert_eq!(history.candles()[0].time, 120);
    }
}
