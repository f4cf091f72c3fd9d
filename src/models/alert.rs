// Alert level and event models

use serde::{Deserialize, Serialize};

use super::Metric;

/// Pressure classification for one metric. Derive order gives the total
/// order Normal < Caution < Warning < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl AlertLevel {
    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Normal => "normal",
            AlertLevel::Caution => "caution",
            AlertLevel::Warning => "warning",
            AlertLevel::Critical => "critical",
        }
    }
}

/// One raised alert: which metric crossed which boundary, and the value
/// that crossed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertEvent {
    pub metric: Metric,
    pub level: AlertLevel,
    pub value: f64,
    /// The boundary of `level`, for display.
    pub threshold: f64,
}
