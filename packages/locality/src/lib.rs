#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Locality enrichment from nearby points of interest.
//!
//! For every hotel with coordinates, two Overpass queries are issued (see
//! [`query`]); their nodes are tallied into [`PoiCounts`] ([`tally`]) and
//! turned into bounded scores ([`score`]). A hotel whose coordinates are
//! missing, or whose queries both fail, keeps the all-zero
//! [`LocalityFeatures`] instead of being dropped.

pub mod query;
pub mod score;
pub mod tally;

use hotel_atlas_client::{ApiUsage, Pacing, PoiSource, ProgressCallback};
use hotel_atlas_hotel_models::{
    ApiCategory, Coordinates, EnrichedPlace, LocalityFeatures, PoiCounts, RawPlaceRecord,
};
use hotel_atlas_store::{OutputLayout, StoreError, write_json};
use serde::Serialize;
use serde_json::Value;

pub use query::{near_query, wide_query};
pub use score::{category_score, score_counts};
pub use tally::{OverpassResponse, tally_near, tally_wide};

/// Errors that abort enrichment for a whole city.
#[derive(Debug, thiserror::Error)]
pub enum LocalityError {
    /// The enriched hotel list could not be written.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Per-city enrichment outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentSummary {
    /// Hotels for which at least one POI band returned data.
    pub enriched: usize,
    /// Hotels whose POI queries all failed.
    pub failed: usize,
    /// Hotels skipped for lack of coordinates.
    pub missing_coordinates: usize,
}

/// One band's outcome: the raw body for the audit dump and the parsed
/// response if it was usable.
struct BandResult {
    raw: Value,
    parsed: Option<OverpassResponse>,
}

impl BandResult {
    fn from_body(body: Option<String>, band: &str, hotel_idx: usize) -> Self {
        let Some(body) = body else {
            log::warn!("{band} POI query failed for hotel {hotel_idx}");
            return Self {
                raw: Value::Object(serde_json::Map::new()),
                parsed: None,
            };
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(raw) => {
                let parsed = match serde_json::from_value::<OverpassResponse>(raw.clone()) {
                    Ok(parsed) => Some(parsed),
                    Err(e) => {
                        log::warn!("Unexpected {band} POI response for hotel {hotel_idx}: {e}");
                        None
                    }
                };
                Self { raw, parsed }
            }
            Err(e) => {
                log::warn!("Invalid JSON in {band} POI response for hotel {hotel_idx}: {e}");
                Self {
                    raw: Value::String(body),
                    parsed: None,
                }
            }
        }
    }
}

/// Adds POI-derived locality features to a city's hotels.
pub struct LocalityEnricher<'a> {
    poi: &'a dyn PoiSource,
    layout: &'a OutputLayout,
    pacing: Pacing,
}

impl<'a> LocalityEnricher<'a> {
    #[must_use]
    pub const fn new(poi: &'a dyn PoiSource, layout: &'a OutputLayout, pacing: Pacing) -> Self {
        Self {
            poi,
            layout,
            pacing,
        }
    }

    /// Enriches every hotel in order, returning one [`EnrichedPlace`] per
    /// input record.
    ///
    /// Both raw bands for hotel `i` are dumped to `raw/overpass_<i>.json`,
    /// and the full result is written to `hotels_enriched.json`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityError::Store`] if `hotels_enriched.json` cannot be
    /// written. Query failures only zero out the affected hotel.
    pub async fn enrich(
        &self,
        hotels: Vec<RawPlaceRecord>,
        city: &str,
        usage: &mut ApiUsage,
        progress: &dyn ProgressCallback,
    ) -> Result<(Vec<EnrichedPlace>, EnrichmentSummary), LocalityError> {
        log::info!("Enriching {} hotels in {city} with nearby POIs", hotels.len());
        progress.set_total(hotels.len() as u64);

        let total = hotels.len();
        let mut summary = EnrichmentSummary::default();
        let mut enriched = Vec::with_capacity(total);

        for (idx, place) in hotels.into_iter().enumerate() {
            progress.set_message(format!("{city}: hotel {}/{total}", idx + 1));

            let Some(point) = place.coordinates() else {
                log::warn!("Hotel {idx} in {city} has no coordinates, using empty locality");
                summary.missing_coordinates += 1;
                enriched.push(EnrichedPlace {
                    place,
                    locality: LocalityFeatures::default(),
                    enriched: false,
                });
                progress.inc(1);
                continue;
            };

            let (locality, ok) = self.enrich_one(point, city, idx, usage).await;
            if ok {
                summary.enriched += 1;
                log::debug!(
                    "Hotel {idx}: walkability={} locality={}",
                    locality.walkability_score,
                    locality.locality_score
                );
            } else {
                summary.failed += 1;
            }
            enriched.push(EnrichedPlace {
                place,
                locality,
                enriched: ok,
            });
            progress.inc(1);

            if idx + 1 < total {
                tokio::time::sleep(self.pacing.hotel_delay).await;
            }
        }

        write_json(&self.layout.hotels_enriched(city), &enriched)?;

        log::info!(
            "POI enrichment for {city}: {}/{total} enriched, {} failed, {} without coordinates",
            summary.enriched,
            summary.failed,
            summary.missing_coordinates
        );
        progress.finish(format!("{city}: {}/{total} hotels enriched", summary.enriched));

        Ok((enriched, summary))
    }

    async fn enrich_one(
        &self,
        point: Coordinates,
        city: &str,
        idx: usize,
        usage: &mut ApiUsage,
    ) -> (LocalityFeatures, bool) {
        let near = self.run_query(&near_query(point), usage).await;
        tokio::time::sleep(self.pacing.query_delay).await;
        let wide = self.run_query(&wide_query(point), usage).await;

        let near = BandResult::from_body(near, "1km", idx);
        let wide = BandResult::from_body(wide, "2.5km", idx);

        let dump = serde_json::json!({
            "pois_1km": near.raw,
            "pois_2_5km": wide.raw,
        });
        if let Err(e) = write_json(&self.layout.overpass_dump(city, idx), &dump) {
            log::error!("Failed to save POI dump for hotel {idx} in {city}: {e}");
        }

        if near.parsed.is_none() && wide.parsed.is_none() {
            log::warn!("No POI data for hotel {idx} in {city}, using empty locality");
            return (LocalityFeatures::default(), false);
        }

        let mut counts = PoiCounts::default();
        if let Some(response) = &near.parsed {
            tally_near(response, &mut counts);
        }
        if let Some(response) = &wide.parsed {
            tally_wide(response, &mut counts);
        }

        (score_counts(&counts), true)
    }

    async fn run_query(&self, overpass_ql: &str, usage: &mut ApiUsage) -> Option<String> {
        usage
            .wait_for_capacity(ApiCategory::Overpass, self.pacing.rate_limit_poll)
            .await;
        let body = self.poi.query(overpass_ql).await;
        usage.record(ApiCategory::Overpass, 1);
        body
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hotel_atlas_client::{DailyQuotas, NullProgress, RateLimiter};
    use serde_json::json;

    use super::*;

    struct FakePoi {
        near: Option<String>,
        wide: Option<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakePoi {
        fn new(near: Option<Value>, wide: Option<Value>) -> Self {
            Self {
                near: near.map(|v| v.to_string()),
                wide: wide.map(|v| v.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl PoiSource for FakePoi {
        async fn query(&self, overpass_ql: &str) -> Option<String> {
            self.calls.lock().unwrap().push(overpass_ql.to_string());
            if overpass_ql.contains("around:1000") {
                self.near.clone()
            } else {
                self.wide.clone()
            }
        }
    }

    fn hotel(id: &str, lat: f64, lng: f64) -> RawPlaceRecord {
        serde_json::from_value(json!({
            "id": id,
            "displayName": {"text": format!("Hotel {id}")},
            "location": {"latitude": lat, "longitude": lng}
        }))
        .unwrap()
    }

    fn nodes(tag: &str, value: &str, n: usize) -> Vec<Value> {
        (0..n)
            .map(|_| json!({"type": "node", "tags": {tag: value}}))
            .collect()
    }

    fn usage() -> ApiUsage {
        ApiUsage::new(RateLimiter::unlimited(), DailyQuotas::default())
    }

    #[tokio::test]
    async fn scores_three_hotels_from_mocked_pois() {
        let mut elements = nodes("amenity", "hospital", 5);
        elements.extend(nodes("amenity", "restaurant", 25));
        elements.extend(nodes("shop", "supermarket", 4));
        elements.extend(nodes("amenity", "bank", 3));
        let poi = FakePoi::new(Some(json!({"elements": elements})), Some(json!({"elements": []})));
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let enricher = LocalityEnricher::new(&poi, &layout, Pacing::none());
        let mut usage = usage();

        let hotels = vec![
            hotel("a", 19.07, 72.87),
            hotel("b", 19.08, 72.88),
            hotel("c", 19.09, 72.89),
        ];
        let (enriched, summary) = enricher
            .enrich(hotels, "Mumbai", &mut usage, &NullProgress)
            .await
            .unwrap();

        assert_eq!(enriched.len(), 3);
        assert_eq!(summary.enriched, 3);
        assert_eq!(poi.call_count(), 6);
        assert_eq!(usage.counts().get(ApiCategory::Overpass), 6);

        for place in &enriched {
            let features = place.locality;
            assert_eq!(features.hospital_score, 100);
            assert_eq!(features.pharmacy_score, 0);
            assert_eq!(features.restaurant_score, 100);

            let expected = (100.0 * 0.2
                + 0.0 * 0.2
                + f64::from(features.shopping_score) * 0.25
                + 100.0 * 0.2
                + f64::from(features.bank_score) * 0.15)
                .round();
            assert!((f64::from(features.walkability_score) - expected).abs() < f64::EPSILON);
        }

        assert!(layout.overpass_dump("Mumbai", 2).exists());
        assert!(layout.hotels_enriched("Mumbai").exists());
    }

    #[tokio::test]
    async fn failed_queries_keep_hotel_with_zero_features() {
        let poi = FakePoi::new(None, None);
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let enricher = LocalityEnricher::new(&poi, &layout, Pacing::none());

        let (enriched, summary) = enricher
            .enrich(vec![hotel("a", 28.6, 77.2)], "Delhi", &mut usage(), &NullProgress)
            .await
            .unwrap();

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].locality, LocalityFeatures::default());
        assert!(!enriched[0].enriched);
        assert_eq!(summary.failed, 1);

        let dump: Value =
            serde_json::from_str(&std::fs::read_to_string(layout.overpass_dump("Delhi", 0)).unwrap())
                .unwrap();
        assert_eq!(dump, json!({"pois_1km": {}, "pois_2_5km": {}}));
    }

    #[tokio::test]
    async fn one_failed_band_still_enriches() {
        let wide = json!({"elements": nodes("amenity", "fuel", 3)});
        let poi = FakePoi::new(None, Some(wide));
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let enricher = LocalityEnricher::new(&poi, &layout, Pacing::none());

        let (enriched, summary) = enricher
            .enrich(vec![hotel("a", 28.6, 77.2)], "Delhi", &mut usage(), &NullProgress)
            .await
            .unwrap();

        assert_eq!(summary.enriched, 1);
        assert_eq!(enriched[0].locality.counts.fuel_stations_count_2_5km, 3);
        assert_eq!(enriched[0].locality.locality_score, 6);
    }

    #[tokio::test]
    async fn hotel_without_coordinates_is_not_queried() {
        let poi = FakePoi::new(Some(json!({"elements": []})), Some(json!({"elements": []})));
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let enricher = LocalityEnricher::new(&poi, &layout, Pacing::none());
        let record: RawPlaceRecord =
            serde_json::from_value(json!({"id": "x", "displayName": {"text": "X"}})).unwrap();

        let (enriched, summary) = enricher
            .enrich(vec![record], "Pune", &mut usage(), &NullProgress)
            .await
            .unwrap();

        assert_eq!(poi.call_count(), 0);
        assert_eq!(summary.missing_coordinates, 1);
        assert_eq!(enriched[0].locality, LocalityFeatures::default());
    }

    #[tokio::test]
    async fn unparseable_body_is_dumped_as_text() {
        let poi = FakePoi {
            near: Some("<html>busy</html>".to_string()),
            wide: None,
            calls: Mutex::new(Vec::new()),
        };
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        let enricher = LocalityEnricher::new(&poi, &layout, Pacing::none());

        let (_, summary) = enricher
            .enrich(vec![hotel("a", 12.97, 77.59)], "Bengaluru", &mut usage(), &NullProgress)
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        let dump: Value = serde_json::from_str(
            &std::fs::read_to_string(layout.overpass_dump("Bengaluru", 0)).unwrap(),
        )
        .unwrap();
        assert_eq!(dump["pois_1km"], json!("<html>busy</html>"));
    }
}
