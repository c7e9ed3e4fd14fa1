use std::{
    fs::{self, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};

use super::{MalformedPolicy, PredictionStore};
use crate::models::PredictionRecord;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Append-only JSON-lines file, one [`PredictionRecord`] per line.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    path: PathBuf,
    policy: MalformedPolicy,
}

impl JsonlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            policy: MalformedPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl PredictionStore for JsonlStore {
    fn append(&self, record: &PredictionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory {}", parent.display())
            })?;
        }

        let mut line = serde_json::to_string(record).context("failed to serialize record")?;
        line.push('\n');

        // One write per record keeps concurrent appenders from interleaving lines.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;

        log_debug!("appended {} record to {}", record.dominant_sentiment, self.path.display());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<PredictionRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to open {}", self.path.display()))
            }
        };

        let mut reader = BufReader::new(file);
        let mut buf = Vec::new();
        let mut records = Vec::new();
        let mut line_no = 0;
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).with_context(|| {
                format!("failed to read line {} of {}", line_no + 1, self.path.display())
            })?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let parsed = std::str::from_utf8(&buf)
                .context("line is not valid UTF-8")
                .and_then(|line| {
                    if line.trim().is_empty() {
                        return Ok(None);
                    }
                    serde_json::from_str::<PredictionRecord>(line)
                        .map(Some)
                        .map_err(anyhow::Error::from)
                });

            match parsed {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err) => match self.policy {
                    MalformedPolicy::Strict => {
                        return Err(err.context(format!(
                            "malformed record at {}:{line_no}",
                            self.path.display()
                        )))
                    }
                    MalformedPolicy::Lenient => {
                        log_warn!(
                            "skipping malformed record at {}:{line_no}: {err:#}",
                            self.path.display()
                        );
                    }
                },
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Prediction, SentimentLabel};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(text: &str, negativo: f64) -> PredictionRecord {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let prediction = Prediction {
            positivo: 1.0 - negativo - 0.1,
            neutro: 0.1,
            negativo,
        };
        PredictionRecord::new(ts, text, prediction)
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonlStore::new(dir.path().join("absent.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn append_creates_parent_directories_and_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("predictions.jsonl");
        let store = JsonlStore::new(&path);

        store.append(&record("first", 0.8)).unwrap();
        store.append(&record("second", 0.05)).unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first");
        assert_eq!(records[0].dominant_sentiment, SentimentLabel::Negativo);
        assert_eq!(records[1].text, "second");
        assert_eq!(records[1].dominant_sentiment, SentimentLabel::Positivo);

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.ends_with('\n'));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        let line = serde_json::to_string(&record("kept", 0.8)).unwrap();
        fs::write(&path, format!("\n{line}\n   \n{line}\n\n")).unwrap();

        let store = JsonlStore::new(&path);
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[test]
    fn strict_policy_reports_the_bad_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        let line = serde_json::to_string(&record("ok", 0.8)).unwrap();
        fs::write(&path, format!("{line}\n{{not json\n{line}\n")).unwrap();

        let err = JsonlStore::new(&path).read_all().unwrap_err();
        assert!(format!("{err:#}").contains(":2"), "unexpected error: {err:#}");
    }

    #[test]
    fn strict_policy_rejects_unparseable_timestamps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        fs::write(
            &path,
            r#"{"timestamp":"not a time","text":"x","prediction":{"positivo":1.0,"neutro":0.0,"negativo":0.0},"dominant_sentiment":"positivo"}"#,
        )
        .unwrap();

        assert!(JsonlStore::new(&path).read_all().is_err());
    }

    #[test]
    fn lenient_policy_skips_bad_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        let line = serde_json::to_string(&record("ok", 0.8)).unwrap();
        fs::write(&path, format!("{line}\n{{not json\n{line}\n")).unwrap();

        let store = JsonlStore::new(&path).with_policy(MalformedPolicy::Lenient);
        assert_eq!(store.read_all().unwrap().len(), 2);
    }

    #[test]
    fn invalid_utf8_lines_follow_policy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("predictions.jsonl");
        let line = serde_json::to_string(&record("ok", 0.8)).unwrap();
        let mut bytes = format!("{line}\n").into_bytes();
        bytes.extend_from_slice(b"{\"text\": \"\xff\xfe\"}\n");
        bytes.extend_from_slice(format!("{line}\n").as_bytes());
        fs::write(&path, bytes).unwrap();

        let err = JsonlStore::new(&path).read_all().unwrap_err();
        assert!(format!("{err:#}").contains(":2"), "unexpected error: {err:#}");

        let lenient = JsonlStore::new(&path).with_policy(MalformedPolicy::Lenient);
        assert_eq!(lenient.read_all().unwrap().len(), 2);
    }
}
