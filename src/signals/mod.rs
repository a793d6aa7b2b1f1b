// Event detection on top of the indicator series: EFM crosses and the two rebound passes.
pub mod efm;
pub mod rebound;
pub mod rebound_late;

pub use efm::{CrossEvents, EfmLines, detect_crosses, efm_lines, side_at};
pub use rebound::{ReboundContext, ReboundSignals, candle_rebounds, detect_rebounds};
pub use rebound_late::{LateReboundSignals, detect_late_rebounds, late_band};
