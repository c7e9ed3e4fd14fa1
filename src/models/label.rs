//! Sentiment labels and the per-label containers built on them.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positivo,
    Neutro,
    Negativo,
}

impl SentimentLabel {
    /// Canonical order. Also the tie-break order for the dominant label.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positivo,
        SentimentLabel::Neutro,
        SentimentLabel::Negativo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positivo => "positivo",
            SentimentLabel::Neutro => "neutro",
            SentimentLabel::Negativo => "negativo",
        }
    }

    /// Class id used by the TweetEval benchmark (0 negative, 1 neutral, 2 positive).
    pub fn class_id(&self) -> usize {
        match self {
            SentimentLabel::Negativo => 0,
            SentimentLabel::Neutro => 1,
            SentimentLabel::Positivo => 2,
        }
    }

    pub fn from_class_id(id: usize) -> Result<Self> {
        match id {
            0 => Ok(SentimentLabel::Negativo),
            1 => Ok(SentimentLabel::Neutro),
            2 => Ok(SentimentLabel::Positivo),
            other => Err(anyhow!("unknown sentiment class id {other}")),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "positivo" => Ok(SentimentLabel::Positivo),
            "neutro" => Ok(SentimentLabel::Neutro),
            "negativo" => Ok(SentimentLabel::Negativo),
            other => Err(anyhow!("unknown sentiment label '{other}'")),
        }
    }
}

/// One value per sentiment label.
///
/// Serialises as `{"positivo": .., "neutro": .., "negativo": ..}`, so every label is
/// always present and indexing by label can never miss.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelMap<T> {
    pub positivo: T,
    pub neutro: T,
    pub negativo: T,
}

impl<T> LabelMap<T> {
    pub fn from_fn(mut f: impl FnMut(SentimentLabel) -> T) -> Self {
        Self {
            positivo: f(SentimentLabel::Positivo),
            neutro: f(SentimentLabel::Neutro),
            negativo: f(SentimentLabel::Negativo),
        }
    }

    pub fn get(&self, label: SentimentLabel) -> &T {
        match label {
            SentimentLabel::Positivo => &self.positivo,
            SentimentLabel::Neutro => &self.neutro,
            SentimentLabel::Negativo => &self.negativo,
        }
    }

    pub fn get_mut(&mut self, label: SentimentLabel) -> &mut T {
        match label {
            SentimentLabel::Positivo => &mut self.positivo,
            SentimentLabel::Neutro => &mut self.neutro,
            SentimentLabel::Negativo => &mut self.negativo,
        }
    }

    /// Entries in canonical label order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, &T)> {
        SentimentLabel::ALL
            .into_iter()
            .map(move |label| (label, self.get(label)))
    }
}

/// Class probabilities returned by the classifier.
pub type Prediction = LabelMap<f64>;

impl LabelMap<f64> {
    /// Label with the highest probability. Exact ties go to the earliest label in
    /// canonical order.
    pub fn dominant(&self) -> SentimentLabel {
        let mut best = SentimentLabel::Positivo;
        for label in &SentimentLabel::ALL[1..] {
            if self.get(*label) > self.get(best) {
                best = *label;
            }
        }
        best
    }

    /// Probability assigned to the dominant label.
    pub fn confidence(&self) -> f64 {
        *self.get(self.dominant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_picks_highest_probability() {
        let prediction = Prediction {
            positivo: 0.1,
            neutro: 0.2,
            negativo: 0.7,
        };
        assert_eq!(prediction.dominant(), SentimentLabel::Negativo);
        assert!((prediction.confidence() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn dominant_ties_resolve_in_canonical_order() {
        let all_equal = Prediction {
            positivo: 0.25,
            neutro: 0.25,
            negativo: 0.25,
        };
        assert_eq!(all_equal.dominant(), SentimentLabel::Positivo);

        let neutral_tie = Prediction {
            positivo: 0.2,
            neutro: 0.4,
            negativo: 0.4,
        };
        assert_eq!(neutral_tie.dominant(), SentimentLabel::Neutro);
    }

    #[test]
    fn labels_parse_and_serialise_lowercase() {
        for label in SentimentLabel::ALL {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), label);
            let json = serde_json::to_string(&label).unwrap();
            assert_eq!(json, format!("\"{}\"", label.as_str()));
        }
        assert!("Positivo".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn class_ids_follow_tweeteval() {
        assert_eq!(SentimentLabel::Negativo.class_id(), 0);
        assert_eq!(SentimentLabel::Neutro.class_id(), 1);
        assert_eq!(SentimentLabel::Positivo.class_id(), 2);
        for label in SentimentLabel::ALL {
            assert_eq!(SentimentLabel::from_class_id(label.class_id()).unwrap(), label);
        }
        assert!(SentimentLabel::from_class_id(3).is_err());
    }

    #[test]
    fn label_map_iterates_in_canonical_order() {
        let map = LabelMap::from_fn(|label| label.class_id());
        let order: Vec<SentimentLabel> = map.iter().map(|(label, _)| label).collect();
        assert_eq!(order, SentimentLabel::ALL.to_vec());
        assert_eq!(*map.get(SentimentLabel::Negativo), 0);
    }
}
