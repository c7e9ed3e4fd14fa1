use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::models::SentimentLabel;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a stored timestamp.
///
/// RFC 3339 values carry their own offset. Naive ISO-8601 values (no offset) are
/// read as local wall-clock time, which is how older log producers wrote them.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| {
                    anyhow!("timestamp '{value}' does not exist in the local time zone")
                });
        }
    }

    Err(anyhow!("invalid timestamp '{value}'"))
}

pub fn parse_label(value: &str) -> Result<SentimentLabel> {
    value.parse()
}
