//! CSV reading and writing for the flat tables.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::DatasetError;

/// Writes `rows` to `path` with a header row, creating parent directories.
///
/// An empty table writes nothing and returns `false`; a file left at
/// `path` by an earlier run is removed so it cannot be read back as current.
///
/// # Errors
///
/// Returns [`DatasetError`] if the directory or file cannot be created or
/// removed, or a row fails to serialize.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<bool, DatasetError> {
    if rows.is_empty() {
        match std::fs::remove_file(path) {
            Ok(()) => log::info!("No rows for {}, removed previous file", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No rows for {}, not writing", path.display());
            }
            Err(e) => return Err(e.into()),
        }
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(true)
}

/// Reads every row of a CSV file written by [`write_rows`].
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be opened or a row does not
/// match `T`.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
