//! Per-city progress checkpoints.
//!
//! A checkpoint is a small JSON document at
//! `<root>/<City>/.progress/progress.json`:
//!
//! ```json
//! {
//!   "timestamp": "2025-01-01T00:00:00Z",
//!   "stage": "text_search",
//!   "completed_stages": ["text_search"],
//!   "data": {"hotels_count": 250}
//! }
//! ```
//!
//! The completed-stage list only ever grows. Stage names are stored as
//! plain strings so a checkpoint written by a newer build still loads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::paths::OutputLayout;
use crate::{StoreError, read_json, write_json};

/// Named milestones in a city run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    /// Text search finished and `hotels_raw.json` was written.
    TextSearch,
    /// POI enrichment finished and `hotels_enriched.json` was written.
    Enrichment,
    /// Per-city datasets, mappings and report were written.
    Datasets,
}

/// The persisted checkpoint for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub stage: String,
    #[serde(default)]
    pub completed_stages: Vec<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            timestamp: None,
            stage: "start".to_string(),
            completed_stages: Vec::new(),
            data: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

impl ProgressState {
    /// Whether `stage` has been marked complete.
    #[must_use]
    pub fn is_complete(&self, stage: Stage) -> bool {
        self.completed_stages
            .iter()
            .any(|completed| completed == stage.as_ref())
    }
}

/// Loads and saves per-city checkpoints.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    layout: OutputLayout,
}

impl ProgressStore {
    #[must_use]
    pub const fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    /// Loads the checkpoint for `city`.
    ///
    /// Returns the default "start" state when no checkpoint exists or the
    /// existing one cannot be read.
    #[must_use]
    pub fn load(&self, city: &str) -> ProgressState {
        let path = self.layout.progress_file(city);
        if !path.exists() {
            return ProgressState::default();
        }

        match read_json(&path) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to load progress from {}: {e}", path.display());
                ProgressState::default()
            }
        }
    }

    /// Marks `stage` complete for `city`, recording `data` as the latest
    /// stage metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the checkpoint cannot be written.
    pub fn save(
        &self,
        city: &str,
        stage: Stage,
        data: serde_json::Value,
    ) -> Result<ProgressState, StoreError> {
        let mut state = self.load(city);

        if !state.is_complete(stage) {
            state.completed_stages.push(stage.to_string());
        }
        state.stage = stage.to_string();
        state.data = data;
        state.timestamp = Some(Utc::now());

        write_json(&self.layout.progress_file(city), &state)?;
        log::debug!("Saved progress for {city}: {stage}");

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn store(dir: &tempfile::TempDir) -> ProgressStore {
        ProgressStore::new(OutputLayout::new(dir.path()))
    }

    #[test]
    fn missing_checkpoint_loads_start_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = store(&dir).load("Pune");

        assert_eq!(state.stage, "start");
        assert!(state.completed_stages.is_empty());
        assert_eq!(state.data, json!({}));
        assert!(!state.is_complete(Stage::TextSearch));
    }

    #[test]
    fn save_appends_each_stage_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store
            .save("Pune", Stage::TextSearch, json!({"hotels_count": 12}))
            .unwrap();
        store
            .save("Pune", Stage::TextSearch, json!({"hotels_count": 14}))
            .unwrap();
        store.save("Pune", Stage::Enrichment, json!({})).unwrap();

        let state = store.load("Pune");
        assert_eq!(state.completed_stages, ["text_search", "enrichment"]);
        assert_eq!(state.stage, "enrichment");
        assert!(state.is_complete(Stage::TextSearch));
        assert!(state.timestamp.is_some());
    }

    #[test]
    fn cities_are_tracked_separately() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store.save("Pune", Stage::TextSearch, json!({})).unwrap();

        assert!(!store.load("Jaipur").is_complete(Stage::TextSearch));
    }

    #[test]
    fn corrupt_checkpoint_falls_back_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        crate::write_raw(&layout.progress_file("Pune"), "{not json").unwrap();

        let state = ProgressStore::new(layout).load("Pune");
        assert_eq!(state, ProgressState::default());
    }

    #[test]
    fn reads_checkpoint_without_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        crate::write_raw(
            &layout.progress_file("Pune"),
            r#"{"stage": "text_search", "completed_stages": ["text_search"]}"#,
        )
        .unwrap();

        let state = ProgressStore::new(layout).load("Pune");
        assert!(state.is_complete(Stage::TextSearch));
        assert_eq!(state.timestamp, None);
    }
}
