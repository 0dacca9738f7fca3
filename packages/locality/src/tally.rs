//! Counting POI categories in Overpass responses.
//!
//! Only `node` elements are counted, and each node lands in at most one
//! category: the first matching rule wins.

use std::collections::BTreeMap;

use hotel_atlas_hotel_models::PoiCounts;
use serde::Deserialize;

/// The subset of an Overpass JSON response that tallying needs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub element_type: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl OverpassElement {
    fn tag(&self, key: &str) -> &str {
        self.tags.get(key).map_or("", String::as_str)
    }

    fn is_node(&self) -> bool {
        self.element_type == "node"
    }
}

/// Adds the 1 km band categories found in `response` to `counts`.
pub fn tally_near(response: &OverpassResponse, counts: &mut PoiCounts) {
    for element in response.elements.iter().filter(|e| e.is_node()) {
        let amenity = element.tag("amenity");

        if matches!(amenity, "hospital" | "clinic" | "doctors") {
            counts.hospitals_count_1km += 1;
        } else if amenity == "pharmacy" {
            counts.pharmacies_count_1km += 1;
        } else if matches!(amenity, "bank" | "atm") {
            counts.banks_count_1km += 1;
        } else if matches!(amenity, "restaurant" | "cafe" | "food_court" | "fast_food") {
            counts.restaurants_count_1km += 1;
        } else if matches!(
            element.tag("shop"),
            "supermarket" | "mall" | "department_store"
        ) {
            counts.shopping_count_1km += 1;
        } else if matches!(element.tag("leisure"), "park" | "playground" | "garden") {
            counts.parks_count_1km += 1;
        }
    }
}

/// Adds the 2.5 km band categories found in `response` to `counts`.
pub fn tally_wide(response: &OverpassResponse, counts: &mut PoiCounts) {
    for element in response.elements.iter().filter(|e| e.is_node()) {
        let amenity = element.tag("amenity");

        if amenity == "fuel" {
            counts.fuel_stations_count_2_5km += 1;
        } else if amenity == "charging_station" {
            counts.ev_charging_count_2_5km += 1;
        } else if matches!(amenity, "cinema" | "theatre") {
            counts.entertainment_count_2_5km += 1;
        } else if matches!(element.tag("public_transport"), "station" | "stop_position")
            || element.tag("railway") == "station"
            || matches!(element.tag("aeroway"), "aerodrome" | "terminal")
        {
            counts.transport_hubs_count_2_5km += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> OverpassResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn near_band_counts_nodes_by_first_matching_category() {
        let near = response(json!({
            "elements": [
                {"type": "node", "tags": {"amenity": "hospital"}},
                {"type": "node", "tags": {"amenity": "clinic"}},
                {"type": "node", "tags": {"amenity": "pharmacy"}},
                {"type": "node", "tags": {"amenity": "atm"}},
                {"type": "node", "tags": {"amenity": "cafe", "shop": "mall"}},
                {"type": "node", "tags": {"shop": "supermarket"}},
                {"type": "node", "tags": {"leisure": "garden"}},
                {"type": "way", "tags": {"leisure": "park"}},
                {"type": "node", "tags": {"amenity": "parking"}},
                {"type": "node"}
            ]
        }));
        let mut counts = PoiCounts::default();

        tally_near(&near, &mut counts);

        assert_eq!(counts.hospitals_count_1km, 2);
        assert_eq!(counts.pharmacies_count_1km, 1);
        assert_eq!(counts.banks_count_1km, 1);
        assert_eq!(counts.restaurants_count_1km, 1);
        assert_eq!(counts.shopping_count_1km, 1);
        assert_eq!(counts.parks_count_1km, 1);
    }

    #[test]
    fn wide_band_folds_rail_and_air_into_transport_hubs() {
        let wide = response(json!({
            "elements": [
                {"type": "node", "tags": {"amenity": "fuel"}},
                {"type": "node", "tags": {"amenity": "charging_station"}},
                {"type": "node", "tags": {"amenity": "theatre"}},
                {"type": "node", "tags": {"public_transport": "stop_position"}},
                {"type": "node", "tags": {"railway": "station"}},
                {"type": "node", "tags": {"aeroway": "terminal"}},
                {"type": "relation", "tags": {"railway": "station"}}
            ]
        }));
        let mut counts = PoiCounts::default();

        tally_wide(&wide, &mut counts);

        assert_eq!(counts.fuel_stations_count_2_5km, 1);
        assert_eq!(counts.ev_charging_count_2_5km, 1);
        assert_eq!(counts.entertainment_count_2_5km, 1);
        assert_eq!(counts.transport_hubs_count_2_5km, 3);
        assert_eq!(counts.hospitals_count_1km, 0);
    }

    #[test]
    fn response_without_elements_counts_nothing() {
        let mut counts = PoiCounts::default();

        tally_near(&response(json!({"remark": "timeout"})), &mut counts);

        assert_eq!(counts, PoiCounts::default());
    }
}
