//! POI counts and scored locality features.

use serde::{Deserialize, Serialize};

/// Raw point-of-interest counts per category and radius band.
///
/// The first six categories come from the 1 km query, the last four from
/// the 2.5 km query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoiCounts {
    pub hospitals_count_1km: u32,
    pub pharmacies_count_1km: u32,
    pub banks_count_1km: u32,
    pub restaurants_count_1km: u32,
    pub shopping_count_1km: u32,
    pub parks_count_1km: u32,
    pub fuel_stations_count_2_5km: u32,
    pub ev_charging_count_2_5km: u32,
    pub entertainment_count_2_5km: u32,
    pub transport_hubs_count_2_5km: u32,
}

/// Bounded locality sub-scores plus the counts they were derived from.
///
/// Every score lies in `0..=100`. [`LocalityFeatures::default`] is the
/// all-zero feature set assigned to hotels that could not be enriched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityFeatures {
    pub walkability_score: u8,
    pub shopping_score: u8,
    pub restaurant_score: u8,
    pub bank_score: u8,
    pub green_space_score: u8,
    pub hospital_score: u8,
    pub pharmacy_score: u8,
    pub entertainment_score: u8,
    pub locality_score: u8,
    pub counts: PoiCounts,
}
