use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{drift::ShiftReport, statistics::WindowStatistics};

const RULE_WIDTH: usize = 50;

/// Full monitoring snapshot: short and long window statistics plus shift detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub last_24_hours: WindowStatistics,
    pub last_7_days: WindowStatistics,
    pub sentiment_shift: ShiftReport,
}

/// Human-readable rendering of a [`Report`].
pub fn render_report(report: &Report) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "SENTIMENT MONITORING REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let short = &report.last_24_hours;
    let _ = writeln!(out, "\n--- {} ---", describe_period(short.period_hours));
    let _ = writeln!(out, "Total predictions: {}", short.total_predictions);
    if short.total_predictions > 0 {
        let _ = writeln!(out, "Average confidence: {:.2}%", short.avg_confidence * 100.0);
        let _ = writeln!(out, "Distribution:");
        for (label, count) in short.distribution.iter() {
            let _ = writeln!(out, "  {label}: {count}");
        }
    }

    let long = &report.last_7_days;
    let _ = writeln!(out, "\n--- {} ---", describe_period(long.period_hours));
    let _ = writeln!(out, "Total predictions: {}", long.total_predictions);

    let shift = &report.sentiment_shift;
    let _ = writeln!(
        out,
        "\n--- Shift detection (baseline {}h vs recent {}h) ---",
        shift.baseline_period, shift.recent_period
    );
    for (label, value) in shift.shifts.iter() {
        let _ = writeln!(out, "  {label}: {:+.2}%", value * 100.0);
    }
    if shift.alert {
        let _ = writeln!(out, "ALERT: significant sentiment shift detected!");
    } else {
        let _ = writeln!(out, "No significant shift detected.");
    }

    out
}

fn describe_period(hours: f64) -> String {
    if hours >= 48.0 && hours % 24.0 == 0.0 {
        format!("Last {} days", hours / 24.0)
    } else {
        format!("Last {hours} hours")
    }
}
