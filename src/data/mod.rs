// Candle loading and the growing candle sequence behind a live chart
pub mod candle_file;
pub mod history;

// Re-export commonly used types
pub use candle_file::{SymbolCandles, load_candles, parse_candles};
pub use history::{CandleHistory, LiveUpdate};
