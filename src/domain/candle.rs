use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLCV bar. `time` is the bar open in epoch seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

// Implement methods for the Candle struct
impl Candle {
    // A constructor for convenience
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Candle {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }

    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Full high-to-low extent.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    // Length of the top wick (high above the body).
    pub fn upper_wick(&self) -> f64 {
        self.high - self.body_range().1
    }

    // Length of the bottom wick (body above the low).
    pub fn lower_wick(&self) -> f64 {
        self.body_range().0 - self.low
    }

    pub fn hl2(&self) -> f64 {
        0.5 * (self.high + self.low)
    }

    /// Wilder's true range against the previous close.
    pub fn true_range(&self, prev_close: f64) -> f64 {
        if !(self.high.is_finite() && self.low.is_finite() && prev_close.is_finite()) {
            return f64::NAN;
        }
        (self.high - self.low)
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }
}

/// Column views over a candle slice, used by transforms that work on plain series.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

pub fn opens(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.open).collect()
}

pub fn highs(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.high).collect()
}

pub fn lows(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.low).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearish_body_and_wicks() {
        let c = Candle::new(0, 10.0, 12.0, 7.0, 9.0);
        assert_eq!(c.get_type(), CandleType::Bearish);
        assert_eq!(c.body_range(), (9.0, 10.0));
        assert_eq!(c.body(), 1.0);
        assert_eq!(c.upper_wick(), 2.0);
        assert_eq!(c.lower_wick(), 2.0);
        assert_eq!(c.range(), 5.0);
    }

    #[test]
    fn true_range_uses_gap_to_previous_close() {
        let c = Candle::new(0, 10.0, 11.0, 9.5, 10.5);
        assert_eq!(c.true_range(10.0), 1.5);
        // Gap up: previous close far below the low.
        assert_eq!(c.true_range(6.0), 5.0);
        assert!(c.true_range(f64::NAN).is_nan());
        assert!(Candle::new(0, 10.0, f64::NAN, 9.5, 10.5).true_range(10.0).is_nan());
    }

    #[test]
    fn volume_is_optional_in_json() {
        let c: Candle =
            serde_json::from_str(r#"{"time":60,"open":1,"high":2,"low":0.5,"close":1.5}"#)
                .unwrap();
        assert_eq!(c.volume, None);
        assert_eq!(c.time, 60);
    }
}
