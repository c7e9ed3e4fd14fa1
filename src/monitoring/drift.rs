use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use crate::models::LabelMap;

/// Comparison of the recent window's label shares against the baseline window's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftReport {
    pub alert: bool,
    /// `recent_share - baseline_share` per label.
    pub shifts: LabelMap<f64>,
    pub baseline_period: f64,
    pub recent_period: f64,
}

/// Per-label share shifts and whether any of them exceeds `threshold`.
pub fn compare_distributions(
    baseline: &Distribution,
    recent: &Distribution,
    threshold: f64,
) -> (LabelMap<f64>, bool) {
    let shifts = LabelMap::from_fn(|label| recent.share(label) - baseline.share(label));
    let alert = shifts.iter().any(|(_, shift)| shift.abs() > threshold);
    (shifts, alert)
}
