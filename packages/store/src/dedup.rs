//! Per-city ledger of already-accepted hotel identifiers.
//!
//! The ledger holds two kinds of identifier for every accepted record:
//! the places API's native id, and an MD5 hash of the display name and
//! coordinates rounded to six decimals. The hash catches the same
//! physical hotel returned under different native ids by different
//! search strategies.

use std::collections::BTreeSet;

use hotel_atlas_hotel_models::RawPlaceRecord;

use crate::paths::OutputLayout;
use crate::{StoreError, read_json, write_json};

/// Hash of `"<name>_<lat:.6>_<lng:.6>"`, hex encoded.
#[must_use]
pub fn coordinate_hash(name: &str, latitude: f64, longitude: f64) -> String {
    let key = format!("{name}_{latitude:.6}_{longitude:.6}");
    format!("{:x}", md5::compute(key.as_bytes()))
}

/// Set of seen identifiers for one city.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupLedger {
    seen: BTreeSet<String>,
}

impl DedupLedger {
    /// Loads the ledger for `city`, or an empty one if none was saved.
    ///
    /// A ledger that exists but cannot be parsed is logged and treated as
    /// empty.
    #[must_use]
    pub fn load(layout: &OutputLayout, city: &str) -> Self {
        let path = layout.seen_ids_file(city);
        if !path.exists() {
            return Self::default();
        }

        match read_json::<Vec<String>>(&path) {
            Ok(ids) => Self {
                seen: ids.into_iter().collect(),
            },
            Err(e) => {
                log::error!("Failed to load seen place ids from {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Persists the ledger for `city` as a sorted JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub fn save(&self, layout: &OutputLayout, city: &str) -> Result<(), StoreError> {
        write_json(&layout.seen_ids_file(city), &self.seen)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Offers a validated record to the ledger.
    ///
    /// Returns `true` and records both identifiers when neither the native
    /// id nor the coordinate hash has been seen. Returns `false` (and
    /// changes nothing) for duplicates.
    pub fn offer(&mut self, record: &RawPlaceRecord) -> bool {
        let hash = record.coordinates().map(|point| {
            coordinate_hash(
                record.name().unwrap_or_default(),
                point.latitude,
                point.longitude,
            )
        });

        if self.seen.contains(&record.id) {
            return false;
        }
        if hash.as_ref().is_some_and(|hash| self.seen.contains(hash)) {
            return false;
        }

        self.seen.insert(record.id.clone());
        if let Some(hash) = hash {
            self.seen.insert(hash);
        }
        true
    }
}
