//! Single-text and batch analysis on top of the classifier and the prediction log.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::classifier::SentimentModel;
use crate::db::PredictionStore;
use crate::models::{Prediction, PredictionRecord};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

pub const EMPTY_BATCH_MESSAGE: &str = "Enter at least one text.";

/// Characters of each batch line echoed back in the batch summary.
const BATCH_PREVIEW_CHARS: usize = 50;

pub struct AnalysisService<'a> {
    model: &'a dyn SentimentModel,
    store: &'a dyn PredictionStore,
}

impl<'a> AnalysisService<'a> {
    pub fn new(model: &'a dyn SentimentModel, store: &'a dyn PredictionStore) -> Self {
        Self { model, store }
    }

    /// Classify `text` and append the result to the prediction log.
    ///
    /// Blank input returns all-zero probabilities without calling the model or
    /// logging anything.
    pub fn analyze_text(&self, text: &str) -> Result<Prediction> {
        self.analyze_text_at(text, Utc::now())
    }

    pub fn analyze_text_at(&self, text: &str, now: DateTime<Utc>) -> Result<Prediction> {
        if text.trim().is_empty() {
            return Ok(Prediction::default());
        }

        let prediction = self.model.predict(text)?;
        let record = PredictionRecord::new(now, text, prediction);
        self.store.append(&record)?;

        log_info!(
            "logged {} prediction ({:.3})",
            record.dominant_sentiment,
            record.confidence()
        );
        Ok(prediction)
    }

    /// Classify each non-blank line of `texts` and summarise one line per input.
    /// Batch predictions are not logged.
    pub fn analyze_batch(&self, texts: &str) -> Result<String> {
        let lines: Vec<&str> = texts
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Ok(EMPTY_BATCH_MESSAGE.to_string());
        }

        let mut results = Vec::with_capacity(lines.len());
        for line in lines {
            let prediction = self.model.predict(line)?;
            let dominant = prediction.dominant();
            let preview: String = line.chars().take(BATCH_PREVIEW_CHARS).collect();
            results.push(format!(
                "- \"{preview}...\" → {} ({:.1}%)",
                dominant.as_str().to_uppercase(),
                prediction.confidence() * 100.0
            ));
        }

        Ok(results.join("\n"))
    }
}
