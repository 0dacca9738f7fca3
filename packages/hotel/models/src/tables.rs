//! Flat rows written to the tabular outputs.
//!
//! Field order is column order. Every type here round-trips through the
//! `csv` crate's serde support, so the consolidator can read per-city files
//! back with the same types that wrote them.

use serde::{Deserialize, Serialize};

/// The canonical hotel row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHotel {
    pub hotel_id: String,
    pub place_id: String,
    pub display_name: String,
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u64>,
    pub price_level: Option<String>,
    pub business_status: String,
    pub city: String,

    pub place_uri: String,
    pub directions_uri: String,
    pub reviews_uri: String,
    pub photos_uri: String,
    pub write_review_uri: String,

    pub website_uri: String,
    pub phone_number: String,
    pub international_phone: String,
    /// Opening hours as a JSON document, when present.
    pub opening_hours: Option<String>,
    /// Place types as a JSON array.
    pub types: String,
    pub editorial_summary: String,

    pub serves_vegetarian_food: Option<bool>,
    pub serves_breakfast: Option<bool>,
    pub serves_lunch: Option<bool>,
    pub serves_dinner: Option<bool>,
    pub serves_brunch: Option<bool>,
    pub serves_beer: Option<bool>,
    pub serves_wine: Option<bool>,
    pub serves_cocktails: Option<bool>,
    pub allows_dogs: Option<bool>,
    pub good_for_children: Option<bool>,
    pub good_for_groups: Option<bool>,
    pub good_for_watching_sports: Option<bool>,
    pub live_music: Option<bool>,
    pub menu_for_children: Option<bool>,
    pub outdoor_seating: Option<bool>,
    pub reservable: Option<bool>,
    pub delivery: Option<bool>,
    pub takeout: Option<bool>,
    pub curbside_pickup: Option<bool>,
    pub dine_in: Option<bool>,
    pub restroom: Option<bool>,

    pub wheelchair_accessible_entrance: Option<bool>,
    pub wheelchair_accessible_parking: Option<bool>,
    pub accepts_credit_cards: Option<bool>,
    pub accepts_debit_cards: Option<bool>,
    pub accepts_cash_only: Option<bool>,

    pub parking_free: Option<bool>,
    pub parking_paid: Option<bool>,
    pub parking_street: Option<bool>,
    pub parking_garage: Option<bool>,
    pub valet_parking: Option<bool>,

    pub ev_charging_available: bool,
    /// Fuel options as a JSON document, when present.
    pub fuel_options: Option<String>,

    pub walkability_score: u8,
    pub shopping_score: u8,
    pub restaurant_score: u8,
    pub bank_score: u8,
    pub green_space_score: u8,
    pub hospital_score: u8,
    pub pharmacy_score: u8,
    pub entertainment_score: u8,
    pub locality_score: u8,

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

/// A review row. At most five are kept per hotel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub hotel_id: String,
    /// `<hotel_id>_r<n>`, 1-based.
    pub review_id: String,
    pub author_name: String,
    pub rating: Option<f64>,
    pub text: String,
    pub publish_time: String,
    pub relative_time: String,
}

/// Distance from one hotel to one configured landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDistance {
    pub hotel_id: String,
    pub landmark_type: String,
    pub landmark_name: String,
    /// Kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Minutes, rounded to one decimal. Only present for routed results.
    pub travel_time_minutes: Option<f64>,
    /// `true` when the values come from the route matrix rather than the
    /// great-circle fallback.
    pub traffic_aware: bool,
}

/// The locality-focused subset of a hotel row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalityRecord {
    pub hotel_id: String,
    pub city: String,
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,

    pub hospitals_count_1km: u32,
    pub pharmacies_count_1km: u32,
    pub shopping_count_1km: u32,
    pub restaurants_count_1km: u32,
    pub banks_count_1km: u32,
    pub parks_count_1km: u32,
    pub fuel_stations_count_2_5km: u32,
    pub ev_charging_count_2_5km: u32,
    pub entertainment_count_2_5km: u32,
    pub transport_hubs_count_2_5km: u32,

    pub walkability_score: u8,
    pub shopping_score: u8,
    pub restaurant_score: u8,
    pub bank_score: u8,
    pub green_space_score: u8,
    pub hospital_score: u8,
    pub pharmacy_score: u8,
    pub entertainment_score: u8,
    pub locality_score: u8,
}

impl From<&EnrichedHotel> for LocalityRecord {
    fn from(hotel: &EnrichedHotel) -> Self {
        Self {
            hotel_id: hotel.hotel_id.clone(),
            city: hotel.city.clone(),
            display_name: hotel.display_name.clone(),
            latitude: hotel.latitude,
            longitude: hotel.longitude,
            formatted_address: hotel.formatted_address.clone(),
            hospitals_count_1km: hotel.hospitals_count_1km,
            pharmacies_count_1km: hotel.pharmacies_count_1km,
            shopping_count_1km: hotel.shopping_count_1km,
            restaurants_count_1km: hotel.restaurants_count_1km,
            banks_count_1km: hotel.banks_count_1km,
            parks_count_1km: hotel.parks_count_1km,
            fuel_stations_count_2_5km: hotel.fuel_stations_count_2_5km,
            ev_charging_count_2_5km: hotel.ev_charging_count_2_5km,
            entertainment_count_2_5km: hotel.entertainment_count_2_5km,
            transport_hubs_count_2_5km: hotel.transport_hubs_count_2_5km,
            walkability_score: hotel.walkability_score,
            shopping_score: hotel.shopping_score,
            restaurant_score: hotel.restaurant_score,
            bank_score: hotel.bank_score,
            green_space_score: hotel.green_space_score,
            hospital_score: hotel.hospital_score,
            pharmacy_score: hotel.pharmacy_score,
            entertainment_score: hotel.entertainment_score,
            locality_score: hotel.locality_score,
        }
    }
}

/// One row of the per-city hotel id mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelMapping {
    pub hotel_id: String,
    pub place_id: String,
    pub display_name: String,
    pub formatted_address: String,
}

impl From<&EnrichedHotel> for HotelMapping {
    fn from(hotel: &EnrichedHotel) -> Self {
        Self {
            hotel_id: hotel.hotel_id.clone(),
            place_id: hotel.place_id.clone(),
            display_name: hotel.display_name.clone(),
            formatted_address: hotel.formatted_address.clone(),
        }
    }
}
