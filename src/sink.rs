//! Tabular output writing
//!
//! Serializes a record set to a UTF-8 comma-separated file: header row
//! first, then one row per record in the order extraction produced them.
//! Column order comes from the shared schema descriptor, so it cannot
//! drift from the extractor's field order.

use crate::error::{Error, Result};
use crate::types::{InstrumentRecord, RECORD_SCHEMA};
use std::path::Path;
use tracing::info;

/// Write the header row and all records to `path`, truncating any
/// existing file
///
/// Missing field values serialize as empty cells.
///
/// # Errors
///
/// Returns [`Error::Filesystem`] when the file cannot be created or a row
/// cannot be written.
pub fn write_records(path: &Path, records: &[InstrumentRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| to_filesystem(path, e))?;

    writer
        .write_record(RECORD_SCHEMA.iter().map(|rule| rule.column))
        .map_err(|e| to_filesystem(path, e))?;

    for record in records {
        writer
            .write_record(record.values().iter().map(|v| v.as_deref().unwrap_or("")))
            .map_err(|e| to_filesystem(path, e))?;
    }

    writer.flush()?;
    info!(path = %path.display(), records = records.len(), "records written to sink");
    Ok(())
}

fn to_filesystem(path: &Path, error: csv::Error) -> Error {
    Error::Filesystem(std::io::Error::other(format!(
        "CSV write to '{}' failed: {error}",
        path.display()
    )))
}
