use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};

use crate::models::PredictionRecord;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Oldest excluded instant for a window of `hours` ending at `now`.
///
/// Returns `None` when the window reaches further back than chrono can represent,
/// in which case nothing is excluded.
pub fn window_cutoff(now: DateTime<Utc>, hours: f64) -> Result<Option<DateTime<Utc>>> {
    if hours.is_nan() || hours <= 0.0 {
        bail!("window must be a positive number of hours, got {hours}");
    }

    let millis = (hours * MS_PER_HOUR).round();
    if millis >= i64::MAX as f64 {
        return Ok(None);
    }

    Ok(Duration::try_milliseconds(millis as i64).and_then(|span| now.checked_sub_signed(span)))
}

/// Records strictly newer than `now - hours`, in their original order.
pub fn filter_window(
    records: &[PredictionRecord],
    now: DateTime<Utc>,
    hours: f64,
) -> Result<Vec<PredictionRecord>> {
    let cutoff = window_cutoff(now, hours)?;
    Ok(records
        .iter()
        .filter(|record| cutoff.map_or(true, |cutoff| record.timestamp > cutoff))
        .cloned()
        .collect())
}
