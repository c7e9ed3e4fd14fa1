use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::classifier::CommandModel;
use crate::db::{open_store, MalformedPolicy, PredictionStore, StoreBackend};
use crate::monitoring::MonitorConfig;

pub const DEFAULT_SETTINGS_FILE: &str = "sentimon.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub on_malformed: MalformedPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Jsonl,
            path: PathBuf::from("logs/predictions.jsonl"),
            on_malformed: MalformedPolicy::Strict,
        }
    }
}

/// Everything the entry point needs, built once and handed down by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub classifier: CommandModel,
    pub monitor: MonitorConfig,
    pub metrics_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store: StoreSettings::default(),
            classifier: CommandModel::default(),
            monitor: MonitorConfig::default(),
            metrics_dir: PathBuf::from("metrics"),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when no path is
    /// given. A missing default file means built-in defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn open_store(&self) -> Result<Box<dyn PredictionStore>> {
        open_store(
            self.store.backend,
            self.store.path.clone(),
            self.store.on_malformed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_the_documented_windows() {
        let settings = Settings::default();
        assert_eq!(settings.store.path, PathBuf::from("logs/predictions.jsonl"));
        assert_eq!(settings.store.backend, StoreBackend::Jsonl);
        assert_eq!(settings.monitor.recent_hours, 24.0);
        assert_eq!(settings.monitor.baseline_hours, 168.0);
        assert_eq!(settings.monitor.shift_threshold, 0.15);
        assert!(!settings.classifier.is_configured());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{
                "store": {"backend": "sqlite", "on_malformed": "lenient"},
                "classifier": {"program": "python3", "args": ["classify.py"]},
                "monitor": {"shift_threshold": 0.2}
            }"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.store.backend, StoreBackend::Sqlite);
        assert_eq!(settings.store.on_malformed, MalformedPolicy::Lenient);
        assert_eq!(settings.store.path, PathBuf::from("logs/predictions.jsonl"));
        assert_eq!(settings.classifier.args, vec!["classify.py".to_string()]);
        assert_eq!(settings.monitor.shift_threshold, 0.2);
        assert_eq!(settings.monitor.recent_hours, 24.0);
        assert_eq!(settings.metrics_dir, PathBuf::from("metrics"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Settings::load(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }
}
