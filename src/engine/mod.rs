pub mod alerts;
pub mod dashboard;

// Re-export key components
pub use alerts::{AlertEvent, AlertKind, AlertsEngine, Severity};
pub use dashboard::{Dashboard, LatestValues, compute_dashboard, compute_many};
