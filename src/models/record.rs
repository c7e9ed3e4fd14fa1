//! Prediction log record.
//!
//! One record is written per classified text and never modified afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::helpers::parse_timestamp;
use crate::models::{Prediction, SentimentLabel};

/// Longest text prefix kept in the log, in characters.
pub const MAX_LOGGED_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub prediction: Prediction,
    pub dominant_sentiment: SentimentLabel,
}

impl PredictionRecord {
    pub fn new(timestamp: DateTime<Utc>, text: &str, prediction: Prediction) -> Self {
        Self {
            timestamp,
            text: text.chars().take(MAX_LOGGED_TEXT_CHARS).collect(),
            prediction,
            dominant_sentiment: prediction.dominant(),
        }
    }

    /// Probability the model gave to this record's own dominant label.
    pub fn confidence(&self) -> f64 {
        *self.prediction.get(self.dominant_sentiment)
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn prediction() -> Prediction {
        Prediction {
            positivo: 0.8,
            neutro: 0.15,
            negativo: 0.05,
        }
    }

    #[test]
    fn new_truncates_text_by_characters() {
        let text = "è".repeat(150);
        let record = PredictionRecord::new(Utc::now(), &text, prediction());
        assert_eq!(record.text.chars().count(), MAX_LOGGED_TEXT_CHARS);
        assert_eq!(record.dominant_sentiment, SentimentLabel::Positivo);
        assert!((record.confidence() - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn serialises_with_log_field_names() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        let record = PredictionRecord::new(ts, "great day", prediction());
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["text"], "great day");
        assert_eq!(value["dominant_sentiment"], "positivo");
        assert_eq!(value["prediction"]["neutro"], 0.15);
        let back: PredictionRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn reads_naive_timestamps() {
        let line = r#"{"timestamp": "2024-05-01T12:00:00.500000", "text": "ok",
            "prediction": {"negativo": 0.1, "neutro": 0.6, "positivo": 0.3},
            "dominant_sentiment": "neutro"}"#;
        let record: PredictionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.dominant_sentiment, SentimentLabel::Neutro);
        assert!((record.confidence() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_unknown_dominant_label() {
        let line = r#"{"timestamp": "2024-05-01T12:00:00Z", "text": "ok",
            "prediction": {"negativo": 0.1, "neutro": 0.6, "positivo": 0.3},
            "dominant_sentiment": "mixed"}"#;
        assert!(serde_json::from_str::<PredictionRecord>(line).is_err());
    }
}
