use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::SentimentLabel;

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    pub text: String,
    pub label: SentimentLabel,
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    text: String,
    label: String,
}

/// Parse a gold label: a TweetEval class id (`0`, `1`, `2`) or a label name.
pub fn parse_gold_label(raw: &str) -> Result<SentimentLabel> {
    let raw = raw.trim();
    match raw.parse::<usize>() {
        Ok(id) => SentimentLabel::from_class_id(id),
        Err(_) => raw.to_lowercase().parse(),
    }
}

/// Load a benchmark CSV with `text` and `label` columns. Other columns are ignored.
pub fn load_dataset(path: &Path) -> Result<Vec<LabeledSample>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open dataset {}", path.display()))?;

    let mut samples = Vec::new();
    for (idx, row) in reader.deserialize::<DatasetRow>().enumerate() {
        // Header is line 1.
        let line_no = idx + 2;
        let row = row.with_context(|| format!("invalid row at {}:{line_no}", path.display()))?;
        let label = parse_gold_label(&row.label)
            .with_context(|| format!("invalid label at {}:{line_no}", path.display()))?;
        samples.push(LabeledSample {
            text: row.text,
            label,
        });
    }

    Ok(samples)
}
