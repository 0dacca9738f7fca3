//! Canonical file paths under the pipeline output root.
//!
//! ```text
//! <root>/<City>/raw/...
//! <root>/<City>/hotels_raw.json
//! <root>/<City>/hotels_enriched.json
//! <root>/<City>/.progress/progress.json
//! <root>/<City>/mappings/seen_place_ids.json
//! <root>/<City>/mappings/<city>_hotel_mapping.csv
//! <root>/<City>/datasets/<city>_{hotels,reviews,hotel_landmarks,locality}.csv
//! <root>/<City>/reports/<city>_report.json
//! <root>/All_India/datasets/all_india_*.csv
//! <root>/All_India/reports/all_india_summary_report.json
//! <root>/All_India/reports/all_india_city_summary.csv
//! ```

use std::path::{Path, PathBuf};

use strum_macros::{AsRefStr, Display};

/// Directory name for the all-regions outputs.
pub const ALL_REGIONS_DIR: &str = "All_India";

/// File-name prefix for the all-regions outputs.
pub const ALL_REGIONS_PREFIX: &str = "all_india";

/// The four tabular outputs produced per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    Hotels,
    Reviews,
    HotelLandmarks,
    Locality,
}

impl DatasetKind {
    pub const ALL: [Self; 4] = [
        Self::Hotels,
        Self::Reviews,
        Self::HotelLandmarks,
        Self::Locality,
    ];
}

/// Resolves every artifact path from a single output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<City>/`
    #[must_use]
    pub fn city_dir(&self, city: &str) -> PathBuf {
        self.root.join(city)
    }

    /// `<root>/<City>/raw/`
    #[must_use]
    pub fn raw_dir(&self, city: &str) -> PathBuf {
        self.city_dir(city).join("raw")
    }

    /// Raw dump for one text-search page.
    #[must_use]
    pub fn text_search_dump(&self, city: &str, strategy: usize, page: usize) -> PathBuf {
        self.raw_dir(city)
            .join(format!("text_search_{strategy}_{page}.json"))
    }

    /// Raw dump for both POI queries of one hotel.
    #[must_use]
    pub fn overpass_dump(&self, city: &str, hotel: usize) -> PathBuf {
        self.raw_dir(city).join(format!("overpass_{hotel}.json"))
    }

    /// Raw dump for one route-matrix batch.
    #[must_use]
    pub fn route_matrix_dump(&self, city: &str, batch: usize) -> PathBuf {
        self.raw_dir(city).join(format!("route_matrix_{batch}.json"))
    }

    /// The text-search checkpoint artifact.
    #[must_use]
    pub fn hotels_raw(&self, city: &str) -> PathBuf {
        self.city_dir(city).join("hotels_raw.json")
    }

    /// The post-enrichment dump.
    #[must_use]
    pub fn hotels_enriched(&self, city: &str) -> PathBuf {
        self.city_dir(city).join("hotels_enriched.json")
    }

    #[must_use]
    pub fn progress_file(&self, city: &str) -> PathBuf {
        self.city_dir(city).join(".progress").join("progress.json")
    }

    #[must_use]
    pub fn mappings_dir(&self, city: &str) -> PathBuf {
        self.city_dir(city).join("mappings")
    }

    #[must_use]
    pub fn seen_ids_file(&self, city: &str) -> PathBuf {
        self.mappings_dir(city).join("seen_place_ids.json")
    }

    #[must_use]
    pub fn hotel_mapping_file(&self, city: &str) -> PathBuf {
        self.mappings_dir(city)
            .join(format!("{}_hotel_mapping.csv", city.to_lowercase()))
    }

    #[must_use]
    pub fn datasets_dir(&self, city: &str) -> PathBuf {
        self.city_dir(city).join("datasets")
    }

    /// `<root>/<City>/datasets/<city>_<kind>.csv`
    #[must_use]
    pub fn dataset_file(&self, city: &str, kind: DatasetKind) -> PathBuf {
        self.datasets_dir(city)
            .join(format!("{}_{kind}.csv", city.to_lowercase()))
    }

    #[must_use]
    pub fn city_report_file(&self, city: &str) -> PathBuf {
        self.city_dir(city)
            .join("reports")
            .join(format!("{}_report.json", city.to_lowercase()))
    }

    /// `<root>/All_India/datasets/all_india_<kind>.csv`
    #[must_use]
    pub fn all_regions_dataset_file(&self, kind: DatasetKind) -> PathBuf {
        self.root
            .join(ALL_REGIONS_DIR)
            .join("datasets")
            .join(format!("{ALL_REGIONS_PREFIX}_{kind}.csv"))
    }

    #[must_use]
    pub fn all_regions_report_file(&self) -> PathBuf {
        self.root
            .join(ALL_REGIONS_DIR)
            .join("reports")
            .join(format!("{ALL_REGIONS_PREFIX}_summary_report.json"))
    }

    #[must_use]
    pub fn all_regions_city_summary_file(&self) -> PathBuf {
        self.root
            .join(ALL_REGIONS_DIR)
            .join("reports")
            .join(format!("{ALL_REGIONS_PREFIX}_city_summary.csv"))
    }
}
