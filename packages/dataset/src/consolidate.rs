//! All-regions consolidation across processed cities.

use std::path::Path;

use chrono::{DateTime, Utc};
use hotel_atlas_client::RequestCounts;
use hotel_atlas_hotel_models::{EnrichedHotel, LandmarkDistance, LocalityRecord, Review};
use hotel_atlas_store::{DatasetKind, OutputLayout, write_json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::report::{mean, round_to};
use crate::table::{read_rows, write_rows};
use crate::DatasetError;

/// Cities listed in the report's ranking.
pub const TOP_CITIES_IN_REPORT: usize = 10;

/// Cities printed in the console summary.
pub const TOP_CITIES_ON_CONSOLE: usize = 5;

/// Row counts for one city, also the row type of the city summary CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityBreakdown {
    pub city: String,
    pub hotels_count: usize,
    pub reviews_count: usize,
    pub landmarks_count: usize,
    pub localities_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedTotals {
    pub total_cities_processed: usize,
    pub total_hotels: usize,
    pub total_reviews: usize,
    pub total_landmarks: usize,
    pub total_localities: usize,
    pub cities_included: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedStatistics {
    pub average_hotel_rating: f64,
    /// Mean over localities with a non-zero locality score.
    pub average_locality_score: f64,
    /// Mean over localities with a non-zero walkability score.
    pub average_walkability_score: f64,
    pub hotels_per_city_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub hotels_with_ratings: usize,
    pub hotels_with_phone: usize,
    pub hotels_with_website: usize,
    pub landmarks_with_travel_time: usize,
    pub localities_with_nonzero_scores: usize,
}

/// The all-regions summary report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ConsolidatedTotals,
    pub statistics: ConsolidatedStatistics,
    pub city_breakdown: Vec<CityBreakdown>,
    pub data_quality: DataQuality,
    pub top_cities_by_hotel_count: Vec<CityBreakdown>,
    pub api_usage_summary: RequestCounts,
}

#[derive(Default)]
struct AllTables {
    hotels: Vec<EnrichedHotel>,
    reviews: Vec<Review>,
    landmarks: Vec<LandmarkDistance>,
    localities: Vec<LocalityRecord>,
}

/// Reads one per-city table, treating a missing or unreadable file as
/// empty.
fn load_city_table<T: DeserializeOwned>(path: &Path, city: &str) -> Vec<T> {
    if !path.exists() {
        log::debug!("No {} for {city}", path.display());
        return Vec::new();
    }
    match read_rows(path) {
        Ok(rows) => {
            log::info!("Added {} rows from {}", rows.len(), path.display());
            rows
        }
        Err(e) => {
            log::error!("Failed to load {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Concatenates per-city tables into the all-regions outputs.
pub struct Consolidator<'a> {
    layout: &'a OutputLayout,
}

impl<'a> Consolidator<'a> {
    #[must_use]
    pub const fn new(layout: &'a OutputLayout) -> Self {
        Self { layout }
    }

    /// Reads the four per-city tables of every city in `cities`, writes the
    /// four all-regions tables, the summary report and the city summary
    /// CSV, and prints the top cities to stdout.
    ///
    /// Cities with no per-city files contribute zero rows.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if an all-regions output cannot be written.
    pub fn consolidate(
        &self,
        cities: &[String],
        api_usage: &RequestCounts,
    ) -> Result<ConsolidatedReport, DatasetError> {
        log::info!(
            "Consolidating datasets from {} cities: {}",
            cities.len(),
            cities.join(", ")
        );

        let mut all = AllTables::default();
        let mut breakdown = Vec::with_capacity(cities.len());

        for city in cities {
            let hotels: Vec<EnrichedHotel> = load_city_table(
                &self.layout.dataset_file(city, DatasetKind::Hotels),
                city,
            );
            let reviews: Vec<Review> = load_city_table(
                &self.layout.dataset_file(city, DatasetKind::Reviews),
                city,
            );
            let landmarks: Vec<LandmarkDistance> = load_city_table(
                &self.layout.dataset_file(city, DatasetKind::HotelLandmarks),
                city,
            );
            let localities: Vec<LocalityRecord> = load_city_table(
                &self.layout.dataset_file(city, DatasetKind::Locality),
                city,
            );

            breakdown.push(CityBreakdown {
                city: city.clone(),
                hotels_count: hotels.len(),
                reviews_count: reviews.len(),
                landmarks_count: landmarks.len(),
                localities_count: localities.len(),
            });

            all.hotels.extend(hotels);
            all.reviews.extend(reviews);
            all.landmarks.extend(landmarks);
            all.localities.extend(localities);
        }

        write_rows(
            &self.layout.all_regions_dataset_file(DatasetKind::Hotels),
            &all.hotels,
        )?;
        write_rows(
            &self.layout.all_regions_dataset_file(DatasetKind::Reviews),
            &all.reviews,
        )?;
        write_rows(
            &self.layout.all_regions_dataset_file(DatasetKind::HotelLandmarks),
            &all.landmarks,
        )?;
        write_rows(
            &self.layout.all_regions_dataset_file(DatasetKind::Locality),
            &all.localities,
        )?;

        let report = build_report(cities, &all, breakdown, api_usage);

        write_json(&self.layout.all_regions_report_file(), &report)?;
        write_rows(
            &self.layout.all_regions_city_summary_file(),
            &report.city_breakdown,
        )?;

        log::info!(
            "All-regions report: {} hotels, {} reviews, {} landmarks, {} localities",
            report.summary.total_hotels,
            report.summary.total_reviews,
            report.summary.total_landmarks,
            report.summary.total_localities
        );
        print_summary(&report);

        Ok(report)
    }
}

#[allow(clippy::cast_precision_loss)]
fn build_report(
    cities: &[String],
    all: &AllTables,
    breakdown: Vec<CityBreakdown>,
    api_usage: &RequestCounts,
) -> ConsolidatedReport {
    let ratings: Vec<f64> = all.hotels.iter().filter_map(|h| h.rating).collect();
    let locality_scores: Vec<f64> = all
        .localities
        .iter()
        .filter(|l| l.locality_score > 0)
        .map(|l| f64::from(l.locality_score))
        .collect();
    let walkability_scores: Vec<f64> = all
        .localities
        .iter()
        .filter(|l| l.walkability_score > 0)
        .map(|l| f64::from(l.walkability_score))
        .collect();

    let hotels_per_city_avg = if cities.is_empty() {
        0.0
    } else {
        round_to(all.hotels.len() as f64 / cities.len() as f64, 1)
    };

    let mut top = breakdown.clone();
    top.sort_by(|a, b| b.hotels_count.cmp(&a.hotels_count));
    top.truncate(TOP_CITIES_IN_REPORT);

    ConsolidatedReport {
        generated_at: Utc::now(),
        summary: ConsolidatedTotals {
            total_cities_processed: cities.len(),
            total_hotels: all.hotels.len(),
            total_reviews: all.reviews.len(),
            total_landmarks: all.landmarks.len(),
            total_localities: all.localities.len(),
            cities_included: cities.to_vec(),
        },
        statistics: ConsolidatedStatistics {
            average_hotel_rating: mean(&ratings).map_or(0.0, |avg| round_to(avg, 2)),
            average_locality_score: mean(&locality_scores).map_or(0.0, |avg| round_to(avg, 1)),
            average_walkability_score: mean(&walkability_scores)
                .map_or(0.0, |avg| round_to(avg, 1)),
            hotels_per_city_avg,
        },
        city_breakdown: breakdown,
        data_quality: DataQuality {
            hotels_with_ratings: ratings.len(),
            hotels_with_phone: all.hotels.iter().filter(|h| !h.phone_number.is_empty()).count(),
            hotels_with_website: all.hotels.iter().filter(|h| !h.website_uri.is_empty()).count(),
            landmarks_with_travel_time: all
                .landmarks
                .iter()
                .filter(|l| l.travel_time_minutes.is_some())
                .count(),
            localities_with_nonzero_scores: locality_scores.len(),
        },
        top_cities_by_hotel_count: top,
        api_usage_summary: api_usage.clone(),
    }
}

fn print_summary(report: &ConsolidatedReport) {
    let summary = &report.summary;
    let stats = &report.statistics;

    println!();
    println!("=== All-regions summary ===");
    println!("Cities processed:  {}", summary.total_cities_processed);
    println!("Total hotels:      {}", summary.total_hotels);
    println!("Total reviews:     {}", summary.total_reviews);
    println!("Total landmarks:   {}", summary.total_landmarks);
    println!("Average rating:    {}", stats.average_hotel_rating);
    println!("Average locality:  {}", stats.average_locality_score);
    println!();
    println!("Top cities by hotel count:");
    for (rank, city) in report
        .top_cities_by_hotel_count
        .iter()
        .take(TOP_CITIES_ON_CONSOLE)
        .enumerate()
    {
        println!("  {}. {}: {} hotels", rank + 1, city.city, city.hotels_count);
    }
}
