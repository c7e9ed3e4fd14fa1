use crate::models::{LabelMap, PredictionRecord, SentimentLabel};

/// Dominant-sentiment counts for a set of records. All three labels are always
/// present; labels with no occurrences hold 0.
pub type Distribution = LabelMap<u64>;

impl LabelMap<u64> {
    pub fn total(&self) -> u64 {
        self.positivo + self.neutro + self.negativo
    }

    /// Fraction of the total held by `label`. An empty distribution divides by 1,
    /// so every share is 0.
    pub fn share(&self, label: SentimentLabel) -> f64 {
        let total = self.total().max(1);
        *self.get(label) as f64 / total as f64
    }
}

pub fn distribution(records: &[PredictionRecord]) -> Distribution {
    let mut counts = Distribution::default();
    for record in records {
        *counts.get_mut(record.dominant_sentiment) += 1;
    }
    counts
}
