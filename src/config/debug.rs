//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. All of them are further gated by `cfg(debug_assertions)`.

/// Emit a line every time the rebound detector forms or overwrites a zone.
pub const PRINT_ZONE_UPDATES: bool = false;

/// Emit each rebound / late rebound match.
pub const PRINT_REBOUND_MATCHES: bool = false;

/// Emit how long each dashboard computation took.
pub const PRINT_DASHBOARD_TIMINGS: bool = false;

/// Emit every alert produced by the streaming alerts engine.
pub const PRINT_ALERTS: bool = true;

/// Emit a line per history backfill merged into a `CandleHistory`.
pub const PRINT_HISTORY_MERGES: bool = false;
