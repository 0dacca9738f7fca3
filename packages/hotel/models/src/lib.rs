#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared hotel data model.
//!
//! Three tiers of types live here:
//!
//! - [`place`]: the typed, all-optional projection of a places-search
//!   response record ([`RawPlaceRecord`]). Every nested attribute the
//!   pipeline reads is modelled explicitly with a default, so nothing
//!   downstream has to poke through untyped JSON.
//! - [`locality`]: POI counts per radius band and the scored
//!   [`LocalityFeatures`] derived from them.
//! - [`tables`]: the flat rows written to the per-city and all-regions
//!   CSV outputs ([`EnrichedHotel`], [`Review`], [`LandmarkDistance`],
//!   [`LocalityRecord`], [`HotelMapping`]).

pub mod locality;
pub mod place;
pub mod tables;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use locality::{LocalityFeatures, PoiCounts};
pub use place::{EnrichedPlace, RawPlaceRecord};
pub use tables::{EnrichedHotel, HotelMapping, LandmarkDistance, LocalityRecord, Review};

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// External API categories tracked by the rate limiter and the request
/// counters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApiCategory {
    /// Places text search, one unit per page request.
    TextSearch,
    /// Route matrix, one unit per origin/destination element.
    RouteMatrix,
    /// Overpass POI queries, one unit per query.
    Overpass,
}

impl ApiCategory {
    /// Every category, in reporting order.
    pub const ALL: [Self; 3] = [Self::TextSearch, Self::RouteMatrix, Self::Overpass];
}

/// Builds the pipeline hotel identifier: the first three lowercase letters
/// of the city name followed by the 1-based sequence number, zero-padded to
/// three digits (`mum001`).
#[must_use]
pub fn hotel_id(city: &str, sequence: usize) -> String {
    let prefix: String = city.to_lowercase().chars().take(3).collect();
    format!("{prefix}{sequence:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotel_id_uses_city_prefix_and_padded_sequence() {
        assert_eq!(hotel_id("Mumbai", 1), "mum001");
        assert_eq!(hotel_id("Bhubaneswar", 42), "bhu042");
        assert_eq!(hotel_id("Delhi", 1234), "del1234");
    }

    #[test]
    fn api_category_round_trips_through_strings() {
        for category in ApiCategory::ALL {
            let parsed: ApiCategory = category.as_ref().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert_eq!(ApiCategory::TextSearch.to_string(), "text_search");
        assert_eq!(
            serde_json::to_string(&ApiCategory::RouteMatrix).unwrap(),
            "\"route_matrix\""
        );
    }
}
