// Indicator math: pure functions of a candle slice and a parameter bundle.
// Outputs are aligned 1:1 with the input, NaN meaning "no value yet".
pub mod balance;
pub mod breakout;
pub mod envelope;
pub mod market_bias;
pub mod oscillators;
pub mod primitives;

// Re-export commonly used items
pub use balance::balance_score;
pub use breakout::{BreakoutLevels, breakout_levels};
pub use envelope::{Envelope, envelope};
pub use market_bias::{BiasState, MarketBias, market_bias};
pub use oscillators::{MacdSeries, macd, rsi};
pub use primitives::{
    atr, ema, ema_first_seeded, rma_first_seeded, rma_mean_seeded, sma, true_range,
    true_range_series,
};
