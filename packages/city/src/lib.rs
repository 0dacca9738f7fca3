#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City definitions.
//!
//! Each city is a TOML file under `packages/city/cities/` carrying its
//! landmarks (the fixed destinations for distance computation) and its
//! ordered list of text-search strategies. The files are embedded at
//! compile time, see [`registry`].

pub mod registry;

use hotel_atlas_hotel_models::Coordinates;
use serde::Deserialize;

pub use registry::{all_cities, find_city, select_cities};

/// Placeholder in a search strategy that is replaced with the smallest
/// review count seen so far for the city.
pub const REVIEW_COUNT_PLACEHOLDER: &str = "<review_count_last>";

/// Errors raised while resolving city configuration.
#[derive(Debug, thiserror::Error)]
pub enum CityError {
    /// No configured city matches the requested name.
    #[error("Unknown city: {name}")]
    UnknownCity { name: String },

    /// A city TOML document could not be parsed.
    #[error("Invalid city config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A fixed named reference point used as a distance destination.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Landmark {
    /// Short machine key, e.g. `airport` or `colaba`.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Configuration for a single city.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityConfig {
    pub name: String,
    pub state: String,
    /// Text-search queries, tried in order.
    pub search_strategies: Vec<String>,
    /// Distance destinations, in output order.
    pub landmarks: Vec<Landmark>,
}

impl CityConfig {
    /// Lowercased city name, used as the file-name stem for per-city
    /// datasets and reports.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name.to_lowercase()
    }

    /// Landmark coordinates in landmark order.
    #[must_use]
    pub fn landmark_coordinates(&self) -> Vec<Coordinates> {
        self.landmarks.iter().map(Landmark::coordinates).collect()
    }
}

/// Resolves a search strategy into a concrete query.
///
/// Strategies containing [`REVIEW_COUNT_PLACEHOLDER`] need the smallest
/// review count observed so far; returns `None` when none is known yet so
/// the caller can skip the strategy.
#[must_use]
pub fn resolve_strategy(strategy: &str, min_review_count: Option<u64>) -> Option<String> {
    if !strategy.contains(REVIEW_COUNT_PLACEHOLDER) {
        return Some(strategy.to_string());
    }

    min_review_count.map(|count| strategy.replace(REVIEW_COUNT_PLACEHOLDER, &count.to_string()))
}

/// Parses a city config from a TOML string.
///
/// # Errors
///
/// Returns [`CityError::Toml`] if the document is malformed or missing
/// required fields.
pub fn parse_city_toml(toml_str: &str) -> Result<CityConfig, CityError> {
    Ok(toml::de::from_str(toml_str)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_toml() {
        let city = parse_city_toml(include_str!("../cities/mumbai.toml")).unwrap();
        assert_eq!(city.name, "Mumbai");
        assert_eq!(city.state, "Maharashtra");
        assert_eq!(city.slug(), "mumbai");
        assert_eq!(city.landmarks[0].key, "airport");
        assert_eq!(
            city.landmarks[0].coordinates(),
            Coordinates::new(19.0896, 72.8656)
        );
        assert_eq!(city.landmark_coordinates().len(), city.landmarks.len());
    }

    #[test]
    fn rejects_incomplete_toml() {
        let result = parse_city_toml("name = \"Nowhere\"\n");
        assert!(matches!(result, Err(CityError::Toml(_))));
    }

    #[test]
    fn plain_strategy_is_unchanged() {
        assert_eq!(
            resolve_strategy("luxury hotels in Pune", None).as_deref(),
            Some("luxury hotels in Pune")
        );
    }

    #[test]
    fn placeholder_strategy_needs_review_count() {
        let strategy = "hotels in Pune with less than <review_count_last> reviews";
        assert_eq!(resolve_strategy(strategy, None), None);
        assert_eq!(
            resolve_strategy(strategy, Some(143)).as_deref(),
            Some("hotels in Pune with less than 143 reviews")
        );
    }
}
