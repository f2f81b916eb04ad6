//! CSV output formatter for duplicate scan results.
//!
//! One row is generated per duplicate file.
//!
//! # Columns
//!
//! - `group_id`: numeric ID identifying the duplicate group
//! - `digest`: content digest (hexadecimal)
//! - `path`: path to the file
//! - `size`: file size in bytes
//! - `modified`: last modified time (RFC 3339), or `unknown`

use std::io;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    /// Unique identifier for the duplicate group
    group_id: usize,
    /// Content digest (hex)
    digest: String,
    /// Path to the file
    path: String,
    /// File size in bytes
    size: u64,
    /// Last modified time (RFC 3339)
    modified: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns [`CsvOutputError`] if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let group_id = idx + 1;
            let digest = group.digest_hex();

            for path in &group.paths {
                csv_writer.serialize(CsvRow {
                    group_id,
                    digest: digest.clone(),
                    path: path.to_string_lossy().into_owned(),
                    size: group.size,
                    modified: modified_time(path),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate the CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns [`CsvOutputError`] if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Formatted modification time for a file, `unknown` when metadata is
/// unreadable.
fn modified_time(path: &std::path::Path) -> String {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|m| {
            let datetime: DateTime<Utc> = m.into();
            datetime.to_rfc3339()
        })
        .unwrap_or_else(|_| "unknown".to_string())
}
