//! The per-city JSON report.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use hotel_atlas_client::RequestCounts;
use hotel_atlas_hotel_models::{EnrichedHotel, LandmarkDistance, Review};
use hotel_atlas_landmark::LandmarkSummary;
use hotel_atlas_locality::EnrichmentSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSummary {
    pub hotels_count: usize,
    pub reviews_count: usize,
    pub landmarks_count: usize,
    pub unique_place_ids: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    pub avg_rating: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub rating_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalityAnalysis {
    pub avg_locality_score: f64,
    /// Share of hotels with a non-zero locality score, e.g. `"87.5%"`.
    pub overpass_enrichment_success: String,
}

/// Data-quality and usage report for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityReport {
    pub city: String,
    pub generated_at: DateTime<Utc>,
    pub data_summary: DataSummary,
    pub api_usage: RequestCounts,
    pub rating_stats: RatingStats,
    /// Percentage of hotels with a value for each key field.
    pub field_completeness: BTreeMap<String, String>,
    pub locality_analysis: LocalityAnalysis,
    pub enrichment: EnrichmentSummary,
    pub landmark_routing: LandmarkSummary,
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

fn rating_stats(hotels: &[EnrichedHotel]) -> RatingStats {
    let ratings: Vec<f64> = hotels.iter().filter_map(|h| h.rating).collect();

    RatingStats {
        avg_rating: mean(&ratings).map(|avg| round_to(avg, 2)),
        min_rating: ratings.iter().copied().reduce(f64::min),
        max_rating: ratings.iter().copied().reduce(f64::max),
        rating_count: ratings.len(),
    }
}

fn field_completeness(hotels: &[EnrichedHotel]) -> BTreeMap<String, String> {
    let total = hotels.len();
    let count = |present: fn(&EnrichedHotel) -> bool| hotels.iter().filter(|h| present(h)).count();

    BTreeMap::from([
        (
            "rating".to_string(),
            percent(count(|h| h.rating.is_some()), total),
        ),
        (
            "user_rating_count".to_string(),
            percent(count(|h| h.user_rating_count.is_some()), total),
        ),
        (
            "phone_number".to_string(),
            percent(count(|h| !h.phone_number.is_empty()), total),
        ),
        (
            "website_uri".to_string(),
            percent(count(|h| !h.website_uri.is_empty()), total),
        ),
    ])
}

fn locality_analysis(hotels: &[EnrichedHotel]) -> LocalityAnalysis {
    let scores: Vec<f64> = hotels.iter().map(|h| f64::from(h.locality_score)).collect();
    let non_zero = hotels.iter().filter(|h| h.locality_score > 0).count();

    LocalityAnalysis {
        avg_locality_score: mean(&scores).map_or(0.0, |avg| round_to(avg, 1)),
        overpass_enrichment_success: percent(non_zero, hotels.len()),
    }
}

impl CityReport {
    /// Builds the report from a city's final tables and stage summaries.
    #[must_use]
    pub fn build(
        city: &str,
        hotels: &[EnrichedHotel],
        reviews: &[Review],
        landmarks: &[LandmarkDistance],
        api_usage: &RequestCounts,
        enrichment: EnrichmentSummary,
        landmark_routing: LandmarkSummary,
    ) -> Self {
        let unique_place_ids = hotels
            .iter()
            .map(|h| h.place_id.as_str())
            .filter(|id| !id.is_empty())
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            city: city.to_string(),
            generated_at: Utc::now(),
            data_summary: DataSummary {
                hotels_count: hotels.len(),
                reviews_count: reviews.len(),
                landmarks_count: landmarks.len(),
                unique_place_ids,
            },
            api_usage: api_usage.clone(),
            rating_stats: rating_stats(hotels),
            field_completeness: field_completeness(hotels),
            locality_analysis: locality_analysis(hotels),
            enrichment,
            landmark_routing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel(rating: Option<f64>, phone: &str, locality_score: u8) -> EnrichedHotel {
        EnrichedHotel {
            place_id: format!("p{locality_score}"),
            rating,
            phone_number: phone.to_string(),
            locality_score,
            ..EnrichedHotel::default()
        }
    }

    #[test]
    fn summarises_ratings_completeness_and_locality() {
        let hotels = vec![
            hotel(Some(4.0), "022 1234", 60),
            hotel(Some(3.5), "", 0),
            hotel(None, "", 30),
            hotel(Some(4.8), "", 45),
        ];

        let report = CityReport::build(
            "Chennai",
            &hotels,
            &[],
            &[],
            &RequestCounts::default(),
            EnrichmentSummary::default(),
            LandmarkSummary::default(),
        );

        assert_eq!(report.data_summary.hotels_count, 4);
        assert_eq!(report.data_summary.unique_place_ids, 4);
        assert_eq!(report.rating_stats.rating_count, 3);
        assert_eq!(report.rating_stats.avg_rating, Some(4.1));
        assert_eq!(report.rating_stats.min_rating, Some(3.5));
        assert_eq!(report.rating_stats.max_rating, Some(4.8));
        assert_eq!(report.field_completeness["rating"], "75.0%");
        assert_eq!(report.field_completeness["phone_number"], "25.0%");
        assert_eq!(report.field_completeness["website_uri"], "0.0%");
        assert!((report.locality_analysis.avg_locality_score - 33.8).abs() < 1e-9);
        assert_eq!(report.locality_analysis.overpass_enrichment_success, "75.0%");
    }

    #[test]
    fn empty_city_has_no_rating_stats() {
        let report = CityReport::build(
            "Kochi",
            &[],
            &[],
            &[],
            &RequestCounts::default(),
            EnrichmentSummary::default(),
            LandmarkSummary::default(),
        );

        assert_eq!(report.rating_stats.avg_rating, None);
        assert_eq!(report.field_completeness["rating"], "0.0%");
        assert!(report.locality_analysis.avg_locality_score.abs() < f64::EPSILON);
    }
}
