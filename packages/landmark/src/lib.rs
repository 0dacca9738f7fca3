#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Distances from every hotel to every configured city landmark.
//!
//! Hotel coordinates are sent to the route matrix as origins and the
//! city's landmarks as destinations, split into batches when the matrix is
//! too large (see [`matrix::plan_batches`]). Any pair the matrix could not
//! route falls back to the great-circle distance, so every hotel always
//! gets one [`LandmarkDistance`] per landmark.

pub mod haversine;
pub mod matrix;

use hotel_atlas_city::CityConfig;
use hotel_atlas_client::{ApiUsage, Pacing, RouteMatrixSource};
use hotel_atlas_hotel_models::{ApiCategory, Coordinates, LandmarkDistance};
use hotel_atlas_store::{OutputLayout, write_raw};
use serde::Serialize;

pub use haversine::haversine_km;
pub use matrix::{MAX_MATRIX_ELEMENTS, ORIGIN_CHUNK, RoutedLegs, collect_legs, plan_batches};

/// Per-city landmark outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LandmarkSummary {
    /// Pairs with a routed matrix distance.
    pub routed: usize,
    /// Pairs that fell back to the great-circle distance.
    pub fallback: usize,
    /// Matrix batches that were skipped or failed.
    pub failed_batches: usize,
}

/// A hotel as seen by the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelPoint {
    pub hotel_id: String,
    pub coordinates: Coordinates,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Computes hotel-to-landmark distances for one city.
pub struct LandmarkCalculator<'a> {
    routes: &'a dyn RouteMatrixSource,
    layout: &'a OutputLayout,
    pacing: Pacing,
}

impl<'a> LandmarkCalculator<'a> {
    #[must_use]
    pub const fn new(
        routes: &'a dyn RouteMatrixSource,
        layout: &'a OutputLayout,
        pacing: Pacing,
    ) -> Self {
        Self {
            routes,
            layout,
            pacing,
        }
    }

    /// Returns one [`LandmarkDistance`] per `(hotel, landmark)` pair, hotels
    /// in input order and landmarks in configured order.
    ///
    /// Distances are rounded to two decimals and travel times to one.
    /// Batches that would push the route-matrix element count past its
    /// daily quota are not sent.
    pub async fn compute(
        &self,
        hotels: &[HotelPoint],
        city: &CityConfig,
        usage: &mut ApiUsage,
    ) -> (Vec<LandmarkDistance>, LandmarkSummary) {
        let destinations = city.landmark_coordinates();
        let origins: Vec<Coordinates> = hotels.iter().map(|h| h.coordinates).collect();
        let mut summary = LandmarkSummary::default();

        log::info!(
            "Calculating route matrix for {} hotels to {} landmarks in {}",
            origins.len(),
            destinations.len(),
            city.name
        );

        let legs = self
            .route_batches(&origins, &destinations, &city.name, usage, &mut summary)
            .await;

        let mut distances = Vec::with_capacity(hotels.len() * city.landmarks.len());
        for (origin_idx, hotel) in hotels.iter().enumerate() {
            for (destination_idx, landmark) in city.landmarks.iter().enumerate() {
                let (distance_km, travel_time_minutes, traffic_aware) =
                    match legs.get(&(origin_idx, destination_idx)) {
                        Some(leg) => (leg.distance_km, leg.travel_time_minutes, true),
                        None => (
                            haversine_km(hotel.coordinates, landmark.coordinates()),
                            None,
                            false,
                        ),
                    };

                if traffic_aware {
                    summary.routed += 1;
                } else {
                    summary.fallback += 1;
                }

                distances.push(LandmarkDistance {
                    hotel_id: hotel.hotel_id.clone(),
                    landmark_type: landmark.key.clone(),
                    landmark_name: landmark.name.clone(),
                    distance_km: round_to(distance_km, 2),
                    travel_time_minutes: travel_time_minutes.map(|m| round_to(m, 1)),
                    traffic_aware,
                });
            }
        }

        log::info!(
            "Generated {} hotel-landmark distances for {} ({} routed, {} straight-line)",
            distances.len(),
            city.name,
            summary.routed,
            summary.fallback
        );

        (distances, summary)
    }

    async fn route_batches(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
        city: &str,
        usage: &mut ApiUsage,
        summary: &mut LandmarkSummary,
    ) -> RoutedLegs {
        let mut legs = RoutedLegs::new();
        let batches = plan_batches(origins.len(), destinations.len());
        if batches.len() > 1 {
            log::info!("Route matrix too large, splitting into {} batches", batches.len());
        }

        for (batch_idx, range) in batches.iter().enumerate() {
            if batch_idx > 0 {
                tokio::time::sleep(self.pacing.batch_delay).await;
            }

            let batch_origins = &origins[range.clone()];
            let elements = (batch_origins.len() * destinations.len()) as u64;

            usage
                .wait_for_capacity(ApiCategory::RouteMatrix, self.pacing.rate_limit_poll)
                .await;
            if usage.would_exceed_quota(ApiCategory::RouteMatrix, elements) {
                log::warn!("Route matrix daily quota would be exceeded, skipping batch {batch_idx}");
                summary.failed_batches += 1;
                continue;
            }

            let Some(body) = self.routes.compute_matrix(batch_origins, destinations).await else {
                log::warn!("Route matrix batch {batch_idx} for {city} failed, using straight-line distances");
                summary.failed_batches += 1;
                continue;
            };
            usage.record(ApiCategory::RouteMatrix, elements);

            if let Err(e) = write_raw(&self.layout.route_matrix_dump(city, batch_idx), &body) {
                log::error!("Failed to save route matrix response for {city}: {e}");
            }

            match collect_legs(&body, range.start, &mut legs) {
                Ok(added) => log::debug!("Route matrix batch {batch_idx}: {added} routed pairs"),
                Err(e) => {
                    log::warn!("Malformed route matrix response for batch {batch_idx}: {e}");
                    summary.failed_batches += 1;
                }
            }
        }

        legs
    }
}
