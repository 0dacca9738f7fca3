//! Typed projection of a places-search record.
//!
//! The places API returns deeply nested records in which almost every key
//! is optional. [`RawPlaceRecord`] names every attribute the pipeline
//! copies into its flat tables; anything else in the response is ignored.
//! All fields default when absent, so deserialization only fails on
//! structurally wrong values (e.g. a string where a number belongs).

use serde::{Deserialize, Serialize};

use crate::Coordinates;
use crate::locality::LocalityFeatures;

/// A localized text value (`{"text": ..., "languageCode": ...}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    pub language_code: Option<String>,
}

/// A latitude/longitude pair as the places API encodes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatLng {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoogleMapsLinks {
    pub place_uri: Option<String>,
    pub directions_uri: Option<String>,
    pub reviews_uri: Option<String>,
    pub photos_uri: Option<String>,
    pub write_a_review_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilityOptions {
    pub wheelchair_accessible_entrance: Option<bool>,
    pub wheelchair_accessible_parking: Option<bool>,
    pub wheelchair_accessible_restroom: Option<bool>,
    pub wheelchair_accessible_seating: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentOptions {
    pub accepts_credit_cards: Option<bool>,
    pub accepts_debit_cards: Option<bool>,
    pub accepts_cash_only: Option<bool>,
    pub accepts_nfc: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParkingOptions {
    pub free_parking_lot: Option<bool>,
    pub paid_parking_lot: Option<bool>,
    pub free_street_parking: Option<bool>,
    pub paid_street_parking: Option<bool>,
    pub valet_parking: Option<bool>,
    pub free_garage_parking: Option<bool>,
    pub paid_garage_parking: Option<bool>,
}

impl ParkingOptions {
    /// Whether any paid parking variant is offered.
    #[must_use]
    pub fn any_paid(&self) -> Option<bool> {
        let flags = [
            self.paid_parking_lot,
            self.paid_street_parking,
            self.paid_garage_parking,
        ];
        if flags.iter().all(Option::is_none) {
            return None;
        }
        Some(flags.iter().any(|flag| *flag == Some(true)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvChargeOptions {
    pub connector_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthorAttribution {
    pub display_name: Option<String>,
    pub uri: Option<String>,
    pub photo_uri: Option<String>,
}

/// One review attached to a place record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceReview {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<LocalizedText>,
    pub author_attribution: Option<AuthorAttribution>,
    pub publish_time: Option<String>,
    pub relative_publish_time_description: Option<String>,
}

/// A place record as returned by the places text-search API.
///
/// Opening hours and fuel options are passed through as JSON values: the
/// pipeline never inspects them, it only re-serializes them into a single
/// CSV column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawPlaceRecord {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub location: Option<LatLng>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u64>,
    pub price_level: Option<String>,
    pub business_status: Option<String>,
    pub google_maps_uri: Option<String>,
    pub google_maps_links: Option<GoogleMapsLinks>,
    pub website_uri: Option<String>,
    pub national_phone_number: Option<String>,
    pub international_phone_number: Option<String>,
    pub regular_opening_hours: Option<serde_json::Value>,
    pub types: Vec<String>,
    pub editorial_summary: Option<LocalizedText>,

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

    pub accessibility_options: Option<AccessibilityOptions>,
    pub payment_options: Option<PaymentOptions>,
    pub parking_options: Option<ParkingOptions>,
    pub ev_charge_options: Option<EvChargeOptions>,
    pub fuel_options: Option<serde_json::Value>,

    pub reviews: Vec<PlaceReview>,
}

impl RawPlaceRecord {
    /// The display name text, if the record carries a non-empty one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_ref()
            .map(|name| name.text.as_str())
            .filter(|text| !text.is_empty())
    }

    /// The record's coordinates, if both latitude and longitude are present.
    ///
    /// A literal `0.0` is treated as missing: the places API omits unknown
    /// coordinates rather than zeroing them, so an exact zero only ever
    /// appears in broken records.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        let location = self.location?;
        let latitude = location.latitude.filter(|v| *v != 0.0)?;
        let longitude = location.longitude.filter(|v| *v != 0.0)?;
        Some(Coordinates::new(latitude, longitude))
    }

    /// Validation predicate applied before a record is offered to the
    /// deduplication ledger: native id, display name and both coordinates
    /// must be present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && self.name().is_some() && self.coordinates().is_some()
    }

    /// Google Maps place link, preferring the structured links block.
    #[must_use]
    pub fn place_uri(&self) -> Option<String> {
        self.google_maps_links
            .as_ref()
            .and_then(|links| links.place_uri.clone())
            .or_else(|| self.google_maps_uri.clone())
    }

    /// Whether the place advertises at least one EV connector.
    #[must_use]
    pub fn ev_charging_available(&self) -> bool {
        self.ev_charge_options
            .and_then(|options| options.connector_count)
            .is_some_and(|count| count > 0)
    }
}

/// A place record after locality enrichment.
///
/// This is the shape persisted to `hotels_enriched.json`; the dataset
/// assembler flattens it into an [`crate::EnrichedHotel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPlace {
    pub place: RawPlaceRecord,
    pub locality: LocalityFeatures,
    /// `true` when at least one POI query returned data for this hotel.
    pub enriched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RawPlaceRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_nested_optional_attributes() {
        let record = parse(
            r#"{
                "id": "ChIJ1",
                "displayName": {"text": "Hotel Sea View", "languageCode": "en"},
                "location": {"latitude": 19.07, "longitude": 72.87},
                "userRatingCount": 812,
                "googleMapsLinks": {"placeUri": "https://maps.google.com/?cid=1"},
                "evChargeOptions": {"connectorCount": 2},
                "parkingOptions": {"paidParkingLot": true},
                "reviews": [{"rating": 5, "text": {"text": "Great"}}],
                "somethingNew": {"nested": [1, 2, 3]}
            }"#,
        );

        assert!(record.is_valid());
        assert_eq!(record.name(), Some("Hotel Sea View"));
        assert_eq!(record.coordinates(), Some(Coordinates::new(19.07, 72.87)));
        assert_eq!(record.user_rating_count, Some(812));
        assert_eq!(
            record.place_uri().as_deref(),
            Some("https://maps.google.com/?cid=1")
        );
        assert!(record.ev_charging_available());
        assert_eq!(
            record.parking_options.and_then(|p| p.any_paid()),
            Some(true)
        );
        assert_eq!(record.reviews.len(), 1);
        assert_eq!(record.reviews[0].rating, Some(5.0));
    }

    #[test]
    fn rejects_records_missing_required_fields() {
        let missing_name = parse(r#"{"id": "a", "location": {"latitude": 1.0, "longitude": 2.0}}"#);
        assert!(!missing_name.is_valid());

        let missing_lng =
            parse(r#"{"id": "a", "displayName": {"text": "A"}, "location": {"latitude": 1.0}}"#);
        assert!(!missing_lng.is_valid());

        let missing_id = parse(
            r#"{"displayName": {"text": "A"}, "location": {"latitude": 1.0, "longitude": 2.0}}"#,
        );
        assert!(!missing_id.is_valid());

        let zero_lat = parse(
            r#"{"id": "a", "displayName": {"text": "A"}, "location": {"latitude": 0.0, "longitude": 2.0}}"#,
        );
        assert!(!zero_lat.is_valid());
    }

    #[test]
    fn falls_back_to_top_level_maps_uri() {
        let record = parse(r#"{"id": "a", "googleMapsUri": "https://maps/a"}"#);
        assert_eq!(record.place_uri().as_deref(), Some("https://maps/a"));
        assert!(!record.ev_charging_available());
    }
}
