use serde::{Deserialize, Serialize};

use super::distribution::{distribution, Distribution};
use crate::models::PredictionRecord;

/// Summary of one time window of the prediction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowStatistics {
    pub total_predictions: usize,
    pub distribution: Distribution,
    /// Mean of each record's confidence in its own dominant label.
    pub avg_confidence: f64,
    pub period_hours: f64,
}

/// Statistics over records already restricted to a window of `period_hours`.
pub fn compute_statistics(records: &[PredictionRecord], period_hours: f64) -> WindowStatistics {
    let avg_confidence = if records.is_empty() {
        0.0
    } else {
        records.iter().map(PredictionRecord::confidence).sum::<f64>() / records.len() as f64
    };

    WindowStatistics {
        total_predictions: records.len(),
        distribution: distribution(records),
        avg_confidence,
        period_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::record_at;
    use crate::models::SentimentLabel;
    use chrono::Utc;

    #[test]
    fn averages_each_records_own_confidence() {
        let now = Utc::now();
        let records = vec![
            record_at(now, 1.0, SentimentLabel::Positivo, 0.9),
            record_at(now, 2.0, SentimentLabel::Positivo, 0.8),
            record_at(now, 3.0, SentimentLabel::Negativo, 0.7),
        ];

        let stats = compute_statistics(&records, 24.0);
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.distribution.positivo, 2);
        assert_eq!(stats.distribution.neutro, 0);
        assert_eq!(stats.distribution.negativo, 1);
        assert!((stats.avg_confidence - 0.8).abs() < 1e-9);
        assert_eq!(stats.period_hours, 24.0);
    }

    #[test]
    fn empty_window_has_zero_confidence() {
        let stats = compute_statistics(&[], 6.0);
        assert_eq!(stats.total_predictions, 0);
        assert_eq!(stats.avg_confidence, 0.0);
        assert_eq!(stats.distribution.total(), 0);
        assert_eq!(stats.period_hours, 6.0);
    }
}
