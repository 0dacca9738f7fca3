//! Turning POI counts into bounded scores.

use hotel_atlas_hotel_models::{LocalityFeatures, PoiCounts};

pub const MAX_SCORE: u32 = 100;

pub const HOSPITAL_IDEAL: u32 = 5;
pub const PHARMACY_IDEAL: u32 = 8;
pub const BANK_IDEAL: u32 = 10;
pub const RESTAURANT_IDEAL: u32 = 25;
pub const SHOPPING_IDEAL: u32 = 8;
pub const PARK_IDEAL: u32 = 5;
pub const ENTERTAINMENT_IDEAL: u32 = 5;

/// Scores a category count against its ideal count.
///
/// Zero scores zero. Up to `ideal` the score grows linearly to
/// `max_score`. Past `ideal` each extra POI adds a diminishing 20% bonus per
/// `ideal`, capped at a 1.3 ratio, and the result is clamped to
/// `max_score`. Fractions are truncated.
#[must_use]
pub fn category_score(count: u32, ideal: u32, max_score: u32) -> u8 {
    if count == 0 || ideal == 0 {
        return 0;
    }

    let ratio = if count <= ideal {
        f64::from(count) / f64::from(ideal)
    } else {
        let excess = f64::from(count - ideal);
        (1.0 + excess / f64::from(ideal) * 0.2).min(1.3)
    };

    clamp_score((ratio * f64::from(max_score)).floor().min(f64::from(max_score)))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(value: f64) -> u8 {
    value.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Builds the full feature set for one hotel from its POI counts.
///
/// The walkability and locality composites are rounded to the nearest
/// integer and clamped to 100.
#[must_use]
pub fn score_counts(counts: &PoiCounts) -> LocalityFeatures {
    let hospital_score = category_score(counts.hospitals_count_1km, HOSPITAL_IDEAL, MAX_SCORE);
    let pharmacy_score = category_score(counts.pharmacies_count_1km, PHARMACY_IDEAL, MAX_SCORE);
    let bank_score = category_score(counts.banks_count_1km, BANK_IDEAL, MAX_SCORE);
    let restaurant_score =
        category_score(counts.restaurants_count_1km, RESTAURANT_IDEAL, MAX_SCORE);
    let shopping_score = category_score(counts.shopping_count_1km, SHOPPING_IDEAL, MAX_SCORE);
    let green_space_score = category_score(counts.parks_count_1km, PARK_IDEAL, MAX_SCORE);
    let entertainment_score =
        category_score(counts.entertainment_count_2_5km, ENTERTAINMENT_IDEAL, MAX_SCORE);

    let walkability = f64::from(hospital_score).mul_add(
        0.2,
        f64::from(pharmacy_score).mul_add(
            0.2,
            f64::from(shopping_score).mul_add(
                0.25,
                f64::from(restaurant_score).mul_add(0.2, f64::from(bank_score) * 0.15),
            ),
        ),
    );
    let walkability_score = clamp_score(walkability.round());

    let locality = f64::from(walkability_score) * 0.4
        + f64::from(shopping_score) * 0.15
        + f64::from(restaurant_score) * 0.15
        + f64::from(entertainment_score) * 0.15
        + f64::from(green_space_score) * 0.10
        + f64::from(counts.fuel_stations_count_2_5km) * 2.0
        + f64::from(counts.transport_hubs_count_2_5km) * 3.0;
    let locality_score = clamp_score(locality.round());

    LocalityFeatures {
        walkability_score,
        shopping_score,
        restaurant_score,
        bank_score,
        green_space_score,
        hospital_score,
        pharmacy_score,
        entertainment_score,
        locality_score,
        counts: *counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDEALS: [u32; 7] = [
        HOSPITAL_IDEAL,
        PHARMACY_IDEAL,
        BANK_IDEAL,
        RESTAURANT_IDEAL,
        SHOPPING_IDEAL,
        PARK_IDEAL,
        ENTERTAINMENT_IDEAL,
    ];

    #[test]
    fn zero_count_scores_zero() {
        for ideal in IDEALS {
            assert_eq!(category_score(0, ideal, MAX_SCORE), 0);
        }
    }

    #[test]
    fn ideal_count_scores_max() {
        for ideal in IDEALS {
            assert_eq!(category_score(ideal, ideal, MAX_SCORE), 100);
        }
    }

    #[test]
    fn score_is_monotonic_and_bounded() {
        for ideal in 1..=30 {
            let mut previous = 0;
            for count in 0..=(ideal * 2) {
                let score = category_score(count, ideal, MAX_SCORE);
                assert!(score >= previous, "ideal={ideal} count={count}");
                assert!(u32::from(score) <= MAX_SCORE);
                previous = score;
            }
        }
    }

    #[test]
    fn partial_counts_truncate() {
        assert_eq!(category_score(1, 3, MAX_SCORE), 33);
        assert_eq!(category_score(2, 3, MAX_SCORE), 66);
        assert_eq!(category_score(12, 25, MAX_SCORE), 48);
    }

    #[test]
    fn no_counts_scores_all_zero() {
        assert_eq!(score_counts(&PoiCounts::default()), LocalityFeatures::default());
    }

    #[test]
    fn composites_follow_weights() {
        let counts = PoiCounts {
            hospitals_count_1km: 5,
            pharmacies_count_1km: 0,
            banks_count_1km: 10,
            restaurants_count_1km: 25,
            shopping_count_1km: 8,
            parks_count_1km: 5,
            fuel_stations_count_2_5km: 1,
            entertainment_count_2_5km: 0,
            transport_hubs_count_2_5km: 2,
            ..PoiCounts::default()
        };

        let features = score_counts(&counts);

        assert_eq!(features.hospital_score, 100);
        assert_eq!(features.pharmacy_score, 0);
        assert_eq!(features.bank_score, 100);
        assert_eq!(features.shopping_score, 100);
        // 20 + 0 + 25 + 20 + 15
        assert_eq!(features.walkability_score, 80);
        // 32 + 15 + 15 + 0 + 10 + 2 + 6
        assert_eq!(features.locality_score, 80);
        assert_eq!(features.counts, counts);
    }

    #[test]
    fn locality_score_clamps_to_max() {
        let counts = PoiCounts {
            fuel_stations_count_2_5km: 40,
            transport_hubs_count_2_5km: 40,
            ..PoiCounts::default()
        };

        assert_eq!(score_counts(&counts).locality_score, 100);
    }
}
