// Domain types and value objects
pub mod candle;
pub mod interval;
pub mod zone;

// Re-export commonly used types
pub use candle::{Candle, CandleType};
pub use interval::Interval;
pub use zone::{Direction, PriceBand, ZoneSnapshot};
