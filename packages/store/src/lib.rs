#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File-based persistence for the hotel pipeline.
//!
//! Everything the pipeline writes lives under one output root laid out by
//! [`OutputLayout`]. On top of that this crate provides the per-city
//! [`ProgressStore`] checkpoint, the [`DedupLedger`] of seen identifiers,
//! and small JSON/raw-body helpers used for audit dumps.

pub mod dedup;
pub mod paths;
pub mod progress;

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use dedup::DedupLedger;
pub use paths::{DatasetKind, OutputLayout};
pub use progress::{ProgressState, ProgressStore, Stage};

/// Errors raised while reading or writing pipeline artifacts.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Creates `path`'s parent directory if it does not exist yet.
fn ensure_parent(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`StoreError`] if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads and deserializes a JSON file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes a raw response body verbatim, creating parent directories.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the write fails.
pub fn write_raw(path: &Path, body: &str) -> Result<(), StoreError> {
    ensure_parent(path)?;
    std::fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_through_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("value.json");

        write_json(&path, &vec![1, 2, 3]).unwrap();
        let back: Vec<i32> = read_json(&path).unwrap();

        assert_eq!(back, [1, 2, 3]);
    }

    #[test]
    fn raw_bodies_are_written_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw").join("page.json");
        let body = "{ \"places\" : [] ,\n \"odd spacing\": true }";

        write_raw(&path, body).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
    }

    #[test]
    fn read_json_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<i32>, _> = read_json(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
