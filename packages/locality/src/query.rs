//! Overpass QL for the two POI radius bands.

use hotel_atlas_hotel_models::Coordinates;

/// Radius of the amenity band, in metres.
pub const NEAR_RADIUS_M: u32 = 1000;

/// Radius of the transport/leisure band, in metres.
pub const WIDE_RADIUS_M: u32 = 2500;

/// Airports sit further out, so they get their own radius.
pub const AIR_RADIUS_M: u32 = 5000;

/// `(tag key, value regex, radius)` node filters for the 1 km band.
const NEAR_FILTERS: &[(&str, &str, u32)] = &[
    ("amenity", "hospital|clinic|doctors", NEAR_RADIUS_M),
    ("amenity", "pharmacy", NEAR_RADIUS_M),
    ("amenity", "bank|atm", NEAR_RADIUS_M),
    ("amenity", "restaurant|cafe|food_court|fast_food", NEAR_RADIUS_M),
    ("shop", "supermarket|mall|department_store", NEAR_RADIUS_M),
    ("leisure", "park|playground|garden", NEAR_RADIUS_M),
];

/// Node filters for the 2.5 km band.
const WIDE_FILTERS: &[(&str, &str, u32)] = &[
    ("amenity", "fuel", WIDE_RADIUS_M),
    ("amenity", "charging_station", WIDE_RADIUS_M),
    ("amenity", "cinema|theatre", WIDE_RADIUS_M),
    ("public_transport", "station|stop_position", WIDE_RADIUS_M),
    ("railway", "station", WIDE_RADIUS_M),
    ("aeroway", "aerodrome|terminal", AIR_RADIUS_M),
];

fn build_query(filters: &[(&str, &str, u32)], point: Coordinates) -> String {
    let lat = point.latitude;
    let lng = point.longitude;
    let statements: String = filters
        .iter()
        .map(|(key, values, radius)| {
            format!("node[\"{key}\"~\"^({values})$\"](around:{radius},{lat},{lng});")
        })
        .collect();

    format!("[out:json][timeout:60];({statements});out geom;")
}

/// Health, pharmacy, banking, dining, retail and green-space nodes within
/// 1 km.
#[must_use]
pub fn near_query(point: Coordinates) -> String {
    build_query(NEAR_FILTERS, point)
}

/// Fuel, EV charging, entertainment and transit nodes within 2.5 km, plus
/// air terminals within 5 km.
#[must_use]
pub fn wide_query(point: Coordinates) -> String {
    build_query(WIDE_FILTERS, point)
}
