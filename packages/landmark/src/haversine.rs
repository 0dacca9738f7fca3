//! Great-circle distance.

use geo::{Distance, Haversine, Point};
use hotel_atlas_hotel_models::Coordinates;

/// Great-circle distance between two coordinates, in kilometres.
#[must_use]
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    Haversine.distance(from, to) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUMBAI_AIRPORT: Coordinates = Coordinates::new(19.0896, 72.8656);
    const DELHI_AIRPORT: Coordinates = Coordinates::new(28.5562, 77.1000);

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(MUMBAI_AIRPORT, MUMBAI_AIRPORT).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (MUMBAI_AIRPORT, DELHI_AIRPORT),
            (Coordinates::new(12.97, 77.59), Coordinates::new(13.08, 80.27)),
            (Coordinates::new(-33.86, 151.2), Coordinates::new(51.5, -0.12)),
        ];
        for (a, b) in pairs {
            assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        }
    }

    #[test]
    fn mumbai_to_delhi_is_about_1150_km() {
        let km = haversine_km(MUMBAI_AIRPORT, DELHI_AIRPORT);
        assert!((1100.0..1200.0).contains(&km), "{km}");
    }
}
