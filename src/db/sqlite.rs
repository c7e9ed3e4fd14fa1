use std::path::PathBuf;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::{params, Connection};

use super::{
    helpers::{parse_label, parse_timestamp},
    migrations::run_migrations,
    MalformedPolicy, PredictionStore,
};
use crate::models::{Prediction, PredictionRecord};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// SQLite-backed prediction log. Rows are only ever inserted; `id` order is
/// append order.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    policy: MalformedPolicy,
}

struct RawRow {
    id: i64,
    timestamp: String,
    text: String,
    prediction: Prediction,
    dominant_sentiment: String,
}

impl SqliteStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&path)
            .with_context(|| format!("failed to open SQLite database {}", path.display()))?;

        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        run_migrations(&mut conn).context("failed to run database migrations")?;

        info!("Prediction store initialized at {}", path.display());

        Ok(Self {
            conn,
            path,
            policy: MalformedPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn decode(row: RawRow) -> Result<PredictionRecord> {
        Ok(PredictionRecord {
            timestamp: parse_timestamp(&row.timestamp)?,
            text: row.text,
            prediction: row.prediction,
            dominant_sentiment: parse_label(&row.dominant_sentiment)?,
        })
    }
}

impl PredictionStore for SqliteStore {
    fn append(&self, record: &PredictionRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO predictions (timestamp, text, positivo, neutro, negativo, dominant_sentiment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.timestamp.to_rfc3339(),
                    record.text,
                    record.prediction.positivo,
                    record.prediction.neutro,
                    record.prediction.negativo,
                    record.dominant_sentiment.as_str(),
                ],
            )
            .context("failed to insert prediction record")?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<PredictionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, text, positivo, neutro, negativo, dominant_sentiment
             FROM predictions
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawRow {
                id: row.get(0)?,
                timestamp: row.get(1)?,
                text: row.get(2)?,
                prediction: Prediction {
                    positivo: row.get(3)?,
                    neutro: row.get(4)?,
                    negativo: row.get(5)?,
                },
                dominant_sentiment: row.get(6)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            let row = row.context("failed to read prediction row")?;
            let id = row.id;
            match Self::decode(row) {
                Ok(record) => records.push(record),
                Err(err) => match self.policy {
                    MalformedPolicy::Strict => {
                        return Err(err.context(format!(
                            "malformed prediction row {id} in {}",
                            self.path.display()
                        )))
                    }
                    MalformedPolicy::Lenient => {
                        log_warn!("skipping malformed prediction row {id}: {err:#}");
                    }
                },
            }
        }

        Ok(records)
    }
}
