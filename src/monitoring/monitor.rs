use anyhow::Result;
use chrono::{DateTime, Utc};

use super::{
    config::MonitorConfig,
    distribution::{distribution, Distribution},
    drift::{compare_distributions, ShiftReport},
    report::Report,
    statistics::{compute_statistics, WindowStatistics},
    window::filter_window,
};
use crate::db::PredictionStore;
use crate::models::PredictionRecord;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Window behind the report's `last_24_hours` block.
pub const REPORT_DAY_HOURS: f64 = 24.0;
/// Window behind the report's `last_7_days` block.
pub const REPORT_WEEK_HOURS: f64 = 168.0;

/// Read-only view over the prediction log. Every query re-reads the store; nothing
/// is cached between calls.
///
/// Each operation has an `_at` variant taking an explicit "now" so callers can
/// evaluate several windows against the same instant.
pub struct SentimentMonitor<'a> {
    store: &'a dyn PredictionStore,
    config: &'a MonitorConfig,
}

impl<'a> SentimentMonitor<'a> {
    pub fn new(store: &'a dyn PredictionStore, config: &'a MonitorConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        self.config
    }

    pub fn load_logs(&self, hours: f64) -> Result<Vec<PredictionRecord>> {
        self.load_logs_at(hours, Utc::now())
    }

    pub fn load_logs_at(&self, hours: f64, now: DateTime<Utc>) -> Result<Vec<PredictionRecord>> {
        let records = self.store.read_all()?;
        let window = filter_window(&records, now, hours)?;
        log_debug!(
            "loaded {} of {} records for a {hours}h window",
            window.len(),
            records.len()
        );
        Ok(window)
    }

    pub fn sentiment_distribution(&self, hours: f64) -> Result<Distribution> {
        self.sentiment_distribution_at(hours, Utc::now())
    }

    pub fn sentiment_distribution_at(
        &self,
        hours: f64,
        now: DateTime<Utc>,
    ) -> Result<Distribution> {
        Ok(distribution(&self.load_logs_at(hours, now)?))
    }

    pub fn statistics(&self, hours: f64) -> Result<WindowStatistics> {
        self.statistics_at(hours, Utc::now())
    }

    pub fn statistics_at(&self, hours: f64, now: DateTime<Utc>) -> Result<WindowStatistics> {
        Ok(compute_statistics(&self.load_logs_at(hours, now)?, hours))
    }

    pub fn detect_shift(
        &self,
        baseline_hours: f64,
        recent_hours: f64,
        threshold: f64,
    ) -> Result<ShiftReport> {
        self.detect_shift_at(baseline_hours, recent_hours, threshold, Utc::now())
    }

    /// Recent records are also part of the baseline whenever the windows overlap.
    pub fn detect_shift_at(
        &self,
        baseline_hours: f64,
        recent_hours: f64,
        threshold: f64,
        now: DateTime<Utc>,
    ) -> Result<ShiftReport> {
        let records = self.store.read_all()?;
        let baseline = distribution(&filter_window(&records, now, baseline_hours)?);
        let recent = distribution(&filter_window(&records, now, recent_hours)?);

        let (shifts, alert) = compare_distributions(&baseline, &recent, threshold);
        if alert {
            log_info!(
                "sentiment shift above {threshold} between {baseline_hours}h baseline and {recent_hours}h window"
            );
        }

        Ok(ShiftReport {
            alert,
            shifts,
            baseline_period: baseline_hours,
            recent_period: recent_hours,
        })
    }

    pub fn generate_report(&self) -> Result<Report> {
        self.generate_report_at(Utc::now())
    }

    /// The two statistics blocks always cover the last day and the last week; only
    /// the shift section follows the configured windows.
    pub fn generate_report_at(&self, now: DateTime<Utc>) -> Result<Report> {
        let config = self.config;
        Ok(Report {
            generated_at: now,
            last_24_hours: self.statistics_at(REPORT_DAY_HOURS, now)?,
            last_7_days: self.statistics_at(REPORT_WEEK_HOURS, now)?,
            sentiment_shift: self.detect_shift_at(
                config.baseline_hours,
                config.recent_hours,
                config.shift_threshold,
                now,
            )?,
        })
    }
}
