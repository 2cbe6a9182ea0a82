//! Event records and the event log
//!
//! TigerStyle: Records are validated on entry, the log is ordered once.
//!
//! The on-disk format is JSON Lines, one record per line:
//!
//! ```text
//! {"app": "Screen on (unlocked)", "timestamp": "2021-03-01T08:00:00Z"}
//! {"app": "Mail", "timestamp": "2021-03-01T08:00:12Z"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use crate::constants::{APP_ID_LENGTH_BYTES_MAX, LOG_LINE_SIZE_BYTES_MAX};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A single observed app event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// App (state) identifier
    pub app: String,
    /// When the app came to the foreground
    pub timestamp: DateTime<Utc>,
}

impl EventRecord {
    /// Create a new event record
    pub fn new(app: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            app: app.into(),
            timestamp,
        }
    }

    /// Validate the record
    pub fn validate(&self) -> Result<()> {
        if self.app.trim().is_empty() {
            return Err(Error::invalid_event("app identifier is empty"));
        }
        if self.app.len() > APP_ID_LENGTH_BYTES_MAX {
            return Err(Error::invalid_event(format!(
                "app identifier is {} bytes, limit is {}",
                self.app.len(),
                APP_ID_LENGTH_BYTES_MAX
            )));
        }
        Ok(())
    }
}

/// Ordered sequence of event records
///
/// Records are in non-decreasing timestamp order; records sharing a
/// timestamp keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Build a log from records, validating and ordering them
    pub fn from_records(mut records: Vec<EventRecord>) -> Result<Self> {
        for record in &records {
            record.validate()?;
        }
        records.sort_by_key(|r| r.timestamp);
        Ok(Self { records })
    }

    /// Load a JSON Lines log file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::LogReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let log = Self::parse(&contents)?;
        tracing::info!(
            path = %path.display(),
            records = log.len(),
            "Event log loaded"
        );
        Ok(log)
    }

    /// Parse JSON Lines text into a log
    pub fn parse(contents: &str) -> Result<Self> {
        let mut records = Vec::new();

        for (index, line) in contents.lines().enumerate() {
            let line_number = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.len() > LOG_LINE_SIZE_BYTES_MAX {
                return Err(Error::LogParseFailed {
                    line: line_number,
                    reason: format!(
                        "line is {} bytes, limit is {}",
                        trimmed.len(),
                        LOG_LINE_SIZE_BYTES_MAX
                    ),
                });
            }

            let record: EventRecord =
                serde_json::from_str(trimmed).map_err(|e| Error::LogParseFailed {
                    line: line_number,
                    reason: e.to_string(),
                })?;
            record.validate().map_err(|e| Error::LogParseFailed {
                line: line_number,
                reason: e.to_string(),
            })?;
            records.push(record);
        }

        Self::from_records(records)
    }

    /// Records in timestamp order
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the log has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
