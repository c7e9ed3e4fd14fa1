//! Offline evaluation of the classifier against a labelled benchmark.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod dataset;
pub mod metrics;

pub use dataset::{load_dataset, LabeledSample};
pub use metrics::{ClassMetrics, ClassificationReport, ConfusionMatrix};

use crate::classifier::SentimentModel;
use crate::models::SentimentLabel;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

const PROGRESS_EVERY: usize = 100;
pub const RESULTS_FILE_NAME: &str = "evaluation_results.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResults {
    pub accuracy: f64,
    pub classification_report: ClassificationReport,
    /// Rows are gold labels, columns predictions, both ordered negativo, neutro, positivo.
    pub confusion_matrix: Vec<Vec<u64>>,
    pub num_samples: usize,
}

/// Predict every sample (or the first `max_samples`) and score the predictions.
/// A `max_samples` of zero means no limit.
pub fn evaluate_model(
    model: &dyn SentimentModel,
    samples: &[LabeledSample],
    max_samples: Option<usize>,
) -> Result<EvaluationResults> {
    let limit = max_samples
        .filter(|&n| n > 0)
        .map_or(samples.len(), |n| n.min(samples.len()));
    let samples = &samples[..limit];

    log_info!("evaluating on {} samples", samples.len());

    let mut matrix = ConfusionMatrix::default();
    for (idx, sample) in samples.iter().enumerate() {
        if (idx + 1) % PROGRESS_EVERY == 0 {
            log_info!("processed {}/{}", idx + 1, samples.len());
        }
        let predicted = model
            .predict(&sample.text)
            .with_context(|| format!("prediction failed for sample {}", idx + 1))?
            .dominant();
        matrix.record(sample.label, predicted);
    }

    let report = ClassificationReport::from_matrix(&matrix);
    Ok(EvaluationResults {
        accuracy: report.accuracy,
        classification_report: report,
        confusion_matrix: matrix.rows(),
        num_samples: samples.len(),
    })
}

/// Write `results` as pretty JSON into `output_dir`, creating it if needed.
pub fn save_results(results: &EvaluationResults, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let output_path = output_dir.join(RESULTS_FILE_NAME);
    let serialized = serde_json::to_string_pretty(results)?;
    fs::write(&output_path, serialized)
        .with_context(|| format!("failed to write results to {}", output_path.display()))?;

    log_info!("evaluation results saved to {}", output_path.display());
    Ok(output_path)
}

pub fn render_results(results: &EvaluationResults) -> String {
    let rule = "=".repeat(50);
    let thin = "-".repeat(50);
    let report = &results.classification_report;
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}\nEVALUATION RESULTS\n{rule}");
    let _ = writeln!(out, "\nAccuracy: {:.4}", results.accuracy);
    let _ = writeln!(out, "Samples evaluated: {}", results.num_samples);

    let _ = writeln!(out, "\nClassification Report:\n{thin}");
    let _ = writeln!(
        out,
        "{:<12} {:<12} {:<12} {:<12}",
        "Class", "Precision", "Recall", "F1-Score"
    );
    let _ = writeln!(out, "{thin}");

    // Same row order as the confusion matrix.
    let order = [
        SentimentLabel::Negativo,
        SentimentLabel::Neutro,
        SentimentLabel::Positivo,
    ];
    for label in order {
        write_metrics_row(&mut out, label.as_str(), report.per_class.get(label));
    }
    let _ = writeln!(out, "{thin}");
    write_metrics_row(&mut out, "macro avg", &report.macro_avg);

    let _ = writeln!(out, "\nConfusion Matrix:");
    let _ = writeln!(out, "              Predicted");
    let _ = writeln!(out, "              neg    neu    pos");
    for (name, row) in ["neg", "neu", "pos"].iter().zip(&results.confusion_matrix) {
        let cells: Vec<String> = row.iter().map(|n| format!("{n:<6}")).collect();
        let _ = writeln!(out, "Actual {name:>3}   {}", cells.join(" ").trim_end());
    }

    out
}

fn write_metrics_row(out: &mut String, name: &str, metrics: &ClassMetrics) {
    let _ = writeln!(
        out,
        "{:<12} {:<12.3} {:<12.3} {:<12.3}",
        name, metrics.precision, metrics.recall, metrics.f1_score
    );
}
