#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tabular outputs of the hotel pipeline.
//!
//! - [`assemble`]: flattens enriched place records into hotel and review
//!   rows.
//! - [`table`]: CSV writing and reading via `serde`.
//! - [`report`]: the per-city JSON report.
//! - [`consolidate`]: the all-regions tables and summary report.

pub mod assemble;
pub mod consolidate;
pub mod report;
pub mod table;

use hotel_atlas_hotel_models::{
    EnrichedHotel, HotelMapping, LandmarkDistance, LocalityRecord, Review,
};
use hotel_atlas_store::{DatasetKind, OutputLayout, StoreError, write_json};

pub use assemble::{AssembledHotels, MAX_REVIEWS_PER_HOTEL, assemble_hotels};
pub use consolidate::{ConsolidatedReport, Consolidator};
pub use report::CityReport;
pub use table::{read_rows, write_rows};

/// Errors raised while writing or reading tabular outputs.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// The four per-city tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityDatasets {
    pub hotels: Vec<EnrichedHotel>,
    pub reviews: Vec<Review>,
    pub landmarks: Vec<LandmarkDistance>,
    pub localities: Vec<LocalityRecord>,
}

impl CityDatasets {
    /// Combines assembled hotel rows with landmark distances. The locality
    /// table is derived from the hotel rows.
    #[must_use]
    pub fn new(assembled: AssembledHotels, landmarks: Vec<LandmarkDistance>) -> Self {
        let localities = assembled.hotels.iter().map(LocalityRecord::from).collect();
        Self {
            hotels: assembled.hotels,
            reviews: assembled.reviews,
            landmarks,
            localities,
        }
    }

    /// Writes the four tables and the hotel id mapping for `city`. An empty
    /// table leaves no file, replacing whatever an earlier run wrote.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if any file cannot be written.
    pub fn write(&self, layout: &OutputLayout, city: &str) -> Result<(), DatasetError> {
        write_rows(&layout.dataset_file(city, DatasetKind::Hotels), &self.hotels)?;
        write_rows(&layout.dataset_file(city, DatasetKind::Reviews), &self.reviews)?;
        write_rows(
            &layout.dataset_file(city, DatasetKind::HotelLandmarks),
            &self.landmarks,
        )?;
        write_rows(
            &layout.dataset_file(city, DatasetKind::Locality),
            &self.localities,
        )?;

        let mappings: Vec<HotelMapping> = self.hotels.iter().map(HotelMapping::from).collect();
        write_rows(&layout.hotel_mapping_file(city), &mappings)?;

        Ok(())
    }
}

/// Writes a per-city report to `reports/<city>_report.json`.
///
/// # Errors
///
/// Returns [`DatasetError::Store`] if the report cannot be written.
pub fn write_city_report(
    layout: &OutputLayout,
    report: &CityReport,
) -> Result<(), DatasetError> {
    write_json(&layout.city_report_file(&report.city), report)?;
    log::info!(
        "Report for {}: {} hotels, {} reviews, {} landmarks",
        report.city,
        report.data_summary.hotels_count,
        report.data_summary.reviews_count,
        report.data_summary.landmarks_count
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_tables_and_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let hotel = EnrichedHotel {
            hotel_id: "luc001".to_string(),
            place_id: "ChIJ9".to_string(),
            display_name: "Awadh Palace".to_string(),
            city: "Lucknow".to_string(),
            latitude: 26.85,
            longitude: 80.95,
            locality_score: 12,
            ..EnrichedHotel::default()
        };
        let datasets = CityDatasets::new(
            AssembledHotels {
                hotels: vec![hotel],
                reviews: Vec::new(),
            },
            Vec::new(),
        );

        datasets.write(&layout, "Lucknow").unwrap();

        assert_eq!(datasets.localities.len(), 1);
        assert_eq!(datasets.localities[0].locality_score, 12);
        assert!(layout.dataset_file("Lucknow", DatasetKind::Hotels).exists());
        assert!(layout.dataset_file("Lucknow", DatasetKind::Locality).exists());
        assert!(!layout.dataset_file("Lucknow", DatasetKind::Reviews).exists());

        let mappings: Vec<HotelMapping> =
            read_rows(&layout.hotel_mapping_file("Lucknow")).unwrap();
        assert_eq!(mappings[0].place_id, "ChIJ9");
        assert_eq!(mappings[0].display_name, "Awadh Palace");
    }

    #[test]
    fn rerun_without_reviews_drops_previous_reviews() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let hotel = EnrichedHotel {
            hotel_id: "pun001".to_string(),
            city: "Pune".to_string(),
            latitude: 18.52,
            longitude: 73.85,
            ..EnrichedHotel::default()
        };
        let review = Review {
            hotel_id: "pun001".to_string(),
            review_id: "pun001_r1".to_string(),
            ..Review::default()
        };

        CityDatasets::new(
            AssembledHotels {
                hotels: vec![hotel.clone()],
                reviews: vec![review],
            },
            Vec::new(),
        )
        .write(&layout, "Pune")
        .unwrap();
        let reviews_file = layout.dataset_file("Pune", DatasetKind::Reviews);
        assert!(reviews_file.exists());

        CityDatasets::new(
            AssembledHotels {
                hotels: vec![hotel],
                reviews: Vec::new(),
            },
            Vec::new(),
        )
        .write(&layout, "Pune")
        .unwrap();

        assert!(!reviews_file.exists());
        assert!(layout.dataset_file("Pune", DatasetKind::Hotels).exists());
    }
}
