use serde::{Deserialize, Serialize};

/// Windows and alert threshold for shift detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Recent side of shift detection.
    pub recent_hours: f64,

    /// Baseline side of shift detection.
    pub baseline_hours: f64,

    /// An absolute share change above this raises a shift alert.
    pub shift_threshold: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            recent_hours: 24.0,
            baseline_hours: 168.0,
            shift_threshold: 0.15,
        }
    }
}
