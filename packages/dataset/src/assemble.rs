//! Flattening enriched place records into table rows.

use hotel_atlas_hotel_models::{EnrichedHotel, EnrichedPlace, RawPlaceRecord, Review, hotel_id};

/// Reviews kept per hotel.
pub const MAX_REVIEWS_PER_HOTEL: usize = 5;

fn json_column<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Flattens one enriched record into a hotel row.
///
/// Returns `None` when the record has no coordinates; every other missing
/// attribute becomes an empty string, `None` or zero.
#[must_use]
pub fn flatten_hotel(hotel_id: String, city: &str, enriched: &EnrichedPlace) -> Option<EnrichedHotel> {
    let place = &enriched.place;
    let coordinates = place.coordinates()?;
    let links = place.google_maps_links.clone().unwrap_or_default();
    let accessibility = place.accessibility_options.unwrap_or_default();
    let payment = place.payment_options.unwrap_or_default();
    let parking = place.parking_options;
    let locality = &enriched.locality;
    let counts = &locality.counts;

    Some(EnrichedHotel {
        hotel_id,
        place_id: place.id.clone(),
        display_name: place.name().unwrap_or_default().to_string(),
        formatted_address: place.formatted_address.clone().unwrap_or_default(),
        latitude: coordinates.latitude,
        longitude: coordinates.longitude,
        rating: place.rating,
        user_rating_count: place.user_rating_count,
        price_level: place.price_level.clone(),
        business_status: place.business_status.clone().unwrap_or_default(),
        city: city.to_string(),

        place_uri: place.place_uri().unwrap_or_default(),
        directions_uri: links.directions_uri.unwrap_or_default(),
        reviews_uri: links.reviews_uri.unwrap_or_default(),
        photos_uri: links.photos_uri.unwrap_or_default(),
        write_review_uri: links.write_a_review_uri.unwrap_or_default(),

        website_uri: place.website_uri.clone().unwrap_or_default(),
        phone_number: place.national_phone_number.clone().unwrap_or_default(),
        international_phone: place.international_phone_number.clone().unwrap_or_default(),
        opening_hours: place.regular_opening_hours.as_ref().map(json_column),
        types: json_column(&place.types),
        editorial_summary: place
            .editorial_summary
            .as_ref()
            .map(|summary| summary.text.clone())
            .unwrap_or_default(),

        serves_vegetarian_food: place.serves_vegetarian_food,
        serves_breakfast: place.serves_breakfast,
        serves_lunch: place.serves_lunch,
        serves_dinner: place.serves_dinner,
        serves_brunch: place.serves_brunch,
        serves_beer: place.serves_beer,
        serves_wine: place.serves_wine,
        serves_cocktails: place.serves_cocktails,
        allows_dogs: place.allows_dogs,
        good_for_children: place.good_for_children,
        good_for_groups: place.good_for_groups,
        good_for_watching_sports: place.good_for_watching_sports,
        live_music: place.live_music,
        menu_for_children: place.menu_for_children,
        outdoor_seating: place.outdoor_seating,
        reservable: place.reservable,
        delivery: place.delivery,
        takeout: place.takeout,
        curbside_pickup: place.curbside_pickup,
        dine_in: place.dine_in,
        restroom: place.restroom,

        wheelchair_accessible_entrance: accessibility.wheelchair_accessible_entrance,
        wheelchair_accessible_parking: accessibility.wheelchair_accessible_parking,
        accepts_credit_cards: payment.accepts_credit_cards,
        accepts_debit_cards: payment.accepts_debit_cards,
        accepts_cash_only: payment.accepts_cash_only,

        parking_free: parking.and_then(|p| p.free_parking_lot),
        parking_paid: parking.and_then(|p| p.any_paid()),
        parking_street: parking.and_then(|p| p.free_street_parking),
        parking_garage: parking.and_then(|p| p.free_garage_parking),
        valet_parking: parking.and_then(|p| p.valet_parking),

        ev_charging_available: place.ev_charging_available(),
        fuel_options: place.fuel_options.as_ref().map(json_column),

        walkability_score: locality.walkability_score,
        shopping_score: locality.shopping_score,
        restaurant_score: locality.restaurant_score,
        bank_score: locality.bank_score,
        green_space_score: locality.green_space_score,
        hospital_score: locality.hospital_score,
        pharmacy_score: locality.pharmacy_score,
        entertainment_score: locality.entertainment_score,
        locality_score: locality.locality_score,

        hospitals_count_1km: counts.hospitals_count_1km,
        pharmacies_count_1km: counts.pharmacies_count_1km,
        banks_count_1km: counts.banks_count_1km,
        restaurants_count_1km: counts.restaurants_count_1km,
        shopping_count_1km: counts.shopping_count_1km,
        parks_count_1km: counts.parks_count_1km,
        fuel_stations_count_2_5km: counts.fuel_stations_count_2_5km,
        ev_charging_count_2_5km: counts.ev_charging_count_2_5km,
        entertainment_count_2_5km: counts.entertainment_count_2_5km,
        transport_hubs_count_2_5km: counts.transport_hubs_count_2_5km,
    })
}

/// The first [`MAX_REVIEWS_PER_HOTEL`] reviews of a place, as rows.
#[must_use]
pub fn reviews_for(hotel_id: &str, place: &RawPlaceRecord) -> Vec<Review> {
    place
        .reviews
        .iter()
        .take(MAX_REVIEWS_PER_HOTEL)
        .enumerate()
        .map(|(idx, review)| Review {
            hotel_id: hotel_id.to_string(),
            review_id: format!("{hotel_id}_r{}", idx + 1),
            author_name: review
                .author_attribution
                .as_ref()
                .and_then(|author| author.display_name.clone())
                .unwrap_or_default(),
            rating: review.rating,
            text: review
                .text
                .as_ref()
                .map(|text| text.text.clone())
                .unwrap_or_default(),
            publish_time: review.publish_time.clone().unwrap_or_default(),
            relative_time: review
                .relative_publish_time_description
                .clone()
                .unwrap_or_default(),
        })
        .collect()
}

/// Hotel and review rows for one city.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssembledHotels {
    pub hotels: Vec<EnrichedHotel>,
    pub reviews: Vec<Review>,
}

/// Flattens a city's enriched records.
///
/// Hotel identifiers follow input position (`<pre>001` for the first
/// record), so a record skipped for missing coordinates leaves a gap in
/// the sequence rather than renumbering the rest.
#[must_use]
pub fn assemble_hotels(city: &str, places: &[EnrichedPlace]) -> AssembledHotels {
    let mut assembled = AssembledHotels::default();

    for (idx, enriched) in places.iter().enumerate() {
        let id = hotel_id(city, idx + 1);
        let Some(hotel) = flatten_hotel(id.clone(), city, enriched) else {
            log::warn!("Skipping hotel {idx} in {city}: missing coordinates");
            continue;
        };
        assembled.reviews.extend(reviews_for(&id, &enriched.place));
        assembled.hotels.push(hotel);
    }

    log::info!(
        "Assembled {} hotels and {} reviews for {city}",
        assembled.hotels.len(),
        assembled.reviews.len()
    );
    assembled
}
