//! Prediction log storage.
//!
//! Aggregation code only sees the narrow [`PredictionStore`] interface: append one
//! record, read everything back in append order. The default backend is a JSON-lines
//! file; an SQLite backend implements the same trait.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod helpers;
mod jsonl;
mod migrations;
mod sqlite;

pub use jsonl::JsonlStore;
pub use sqlite::SqliteStore;

use crate::models::PredictionRecord;

pub trait PredictionStore {
    /// Append a single record. Records are never rewritten.
    fn append(&self, record: &PredictionRecord) -> Result<()>;

    /// Every stored record in append order. A store that was never written to
    /// yields an empty vec.
    fn read_all(&self) -> Result<Vec<PredictionRecord>>;
}

/// What to do with a stored entry that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Fail the whole read on the first bad entry.
    #[default]
    Strict,
    /// Log a warning and skip the entry.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Jsonl,
    Sqlite,
}

pub fn open_store(
    backend: StoreBackend,
    path: PathBuf,
    policy: MalformedPolicy,
) -> Result<Box<dyn PredictionStore>> {
    Ok(match backend {
        StoreBackend::Jsonl => Box::new(JsonlStore::new(path).with_policy(policy)),
        StoreBackend::Sqlite => Box::new(SqliteStore::open(path)?.with_policy(policy)),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use anyhow::Result;
    use chrono::{DateTime, Duration, Utc};

    use super::PredictionStore;
    use crate::models::{Prediction, PredictionRecord, SentimentLabel};

    /// In-memory store for unit tests.
    #[derive(Default)]
    pub struct MemoryStore {
        records: RefCell<Vec<PredictionRecord>>,
    }

    impl MemoryStore {
        pub fn with_records(records: Vec<PredictionRecord>) -> Self {
            Self {
                records: RefCell::new(records),
            }
        }

        pub fn len(&self) -> usize {
            self.records.borrow().len()
        }
    }

    impl PredictionStore for MemoryStore {
        fn append(&self, record: &PredictionRecord) -> Result<()> {
            self.records.borrow_mut().push(record.clone());
            Ok(())
        }

        fn read_all(&self) -> Result<Vec<PredictionRecord>> {
            Ok(self.records.borrow().clone())
        }
    }

    /// Record whose dominant label is `label` with probability `confidence`,
    /// stamped `hours_ago` before `now`.
    pub fn record_at(
        now: DateTime<Utc>,
        hours_ago: f64,
        label: SentimentLabel,
        confidence: f64,
    ) -> PredictionRecord {
        let rest = (1.0 - confidence) / 2.0;
        let prediction = Prediction::from_fn(|l| if l == label { confidence } else { rest });
        let timestamp = now - Duration::milliseconds((hours_ago * 3_600_000.0) as i64);
        PredictionRecord::new(timestamp, "sample text", prediction)
    }
}
