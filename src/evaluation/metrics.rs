use serde::{Deserialize, Serialize};

use crate::models::{LabelMap, SentimentLabel};

/// Counts indexed `[actual][predicted]` by TweetEval class id
/// (negativo, neutro, positivo).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    counts: [[u64; 3]; 3],
}

impl ConfusionMatrix {
    pub fn record(&mut self, actual: SentimentLabel, predicted: SentimentLabel) {
        self.counts[actual.class_id()][predicted.class_id()] += 1;
    }

    pub fn get(&self, actual: SentimentLabel, predicted: SentimentLabel) -> u64 {
        self.counts[actual.class_id()][predicted.class_id()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> u64 {
        (0..3).map(|i| self.counts[i][i]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Number of samples whose gold label is `label`.
    pub fn support(&self, label: SentimentLabel) -> u64 {
        self.counts[label.class_id()].iter().sum()
    }

    fn predicted_as(&self, label: SentimentLabel) -> u64 {
        let col = label.class_id();
        self.counts.iter().map(|row| row[col]).sum()
    }

    pub fn class_metrics(&self, label: SentimentLabel) -> ClassMetrics {
        let hits = self.get(label, label);
        let precision = ratio(hits, self.predicted_as(label));
        let recall = ratio(hits, self.support(label));
        ClassMetrics {
            precision,
            recall,
            f1_score: f1(precision, recall),
            support: self.support(label),
        }
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        self.counts.iter().map(|row| row.to_vec()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(rename = "f1-score")]
    pub f1_score: f64,
    pub support: u64,
}

/// Per-class metrics plus accuracy and the macro / support-weighted averages.
/// Undefined ratios (no predictions or no support for a class) count as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    #[serde(flatten)]
    pub per_class: LabelMap<ClassMetrics>,
    pub accuracy: f64,
    #[serde(rename = "macro avg")]
    pub macro_avg: ClassMetrics,
    #[serde(rename = "weighted avg")]
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let per_class = LabelMap::from_fn(|label| matrix.class_metrics(label));
        let total = matrix.total();
        let classes = SentimentLabel::ALL.len() as f64;

        let mut macro_avg = ClassMetrics {
            support: total,
            ..ClassMetrics::default()
        };
        let mut weighted_avg = macro_avg;

        for (_, metrics) in per_class.iter() {
            macro_avg.precision += metrics.precision / classes;
            macro_avg.recall += metrics.recall / classes;
            macro_avg.f1_score += metrics.f1_score / classes;

            let weight = ratio(metrics.support, total);
            weighted_avg.precision += metrics.precision * weight;
            weighted_avg.recall += metrics.recall * weight;
            weighted_avg.f1_score += metrics.f1_score * weight;
        }

        Self {
            per_class,
            accuracy: matrix.accuracy(),
            macro_avg,
            weighted_avg,
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}
