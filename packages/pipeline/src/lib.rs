#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drives the hotel pipeline city by city.
//!
//! [`Pipeline::process_city`] runs the stages for one city in order:
//! text search, POI enrichment, table assembly, landmark distances, then
//! the CSV outputs and report. [`Pipeline::run_all_cities`] runs every
//! requested city sequentially, skipping cities that fail, and finishes
//! with the all-regions consolidation.
//!
//! The [`Pipeline`] owns the single [`ApiUsage`] (rate-limit windows and
//! request counters) shared by every stage of a run.

pub mod settings;

use hotel_atlas_city::{CityConfig, CityError, select_cities};
use hotel_atlas_client::{
    ApiUsage, ClientError, GoogleRoutesClient, GooglePlacesClient, OverpassClient, Pacing,
    PlacesSearch, PoiSource, ProgressCallback, RateLimiter, RequestCounts, RouteMatrixSource,
};
use hotel_atlas_collect::{CollectError, TextSearchCollector};
use hotel_atlas_dataset::{
    CityDatasets, CityReport, ConsolidatedReport, Consolidator, DatasetError, assemble_hotels,
    write_city_report,
};
use hotel_atlas_hotel_models::Coordinates;
use hotel_atlas_landmark::{HotelPoint, LandmarkCalculator};
use hotel_atlas_locality::{LocalityEnricher, LocalityError};
use hotel_atlas_store::{OutputLayout, ProgressStore, Stage, StoreError};

pub use settings::PipelineSettings;

/// Errors raised by the pipeline drivers.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required credential is not configured.
    #[error("{name} is not set")]
    MissingCredential { name: &'static str },

    /// A setting has a value that does not parse.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error(transparent)]
    City(#[from] CityError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Text search failed: {0}")]
    Collect(#[from] CollectError),

    #[error("Enrichment failed: {0}")]
    Locality(#[from] LocalityError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Text search returned no usable hotels for the city.
    #[error("No hotels found for {city}")]
    NoHotels { city: String },
}

/// Row counts produced for one city.
#[derive(Debug, Clone, PartialEq)]
pub struct CityOutcome {
    pub city: String,
    pub hotels: usize,
    pub reviews: usize,
    pub landmarks: usize,
    pub report: CityReport,
}

/// Result of an all-cities run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
    /// `None` when no city succeeded.
    pub report: Option<ConsolidatedReport>,
}

/// The pipeline driver and the state it owns for one run.
pub struct Pipeline {
    places: Box<dyn PlacesSearch>,
    poi: Box<dyn PoiSource>,
    routes: Box<dyn RouteMatrixSource>,
    layout: OutputLayout,
    pacing: Pacing,
    usage: ApiUsage,
}

impl Pipeline {
    /// Builds a pipeline against the production APIs.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Client`] if an HTTP client cannot be built.
    pub fn from_settings(settings: &PipelineSettings) -> Result<Self, PipelineError> {
        let places = GooglePlacesClient::new(settings.api_key.clone(), settings.retry)?;
        let routes = GoogleRoutesClient::new(settings.api_key.clone(), settings.retry)?;
        let poi = OverpassClient::new(settings.crawl.clone())?;

        Ok(Self::with_sources(
            Box::new(places),
            Box::new(poi),
            Box::new(routes),
            OutputLayout::new(&settings.output_dir),
            settings.pacing,
            ApiUsage::new(
                RateLimiter::new(settings.overpass_per_minute),
                settings.quotas,
            ),
        ))
    }

    #[must_use]
    pub fn with_sources(
        places: Box<dyn PlacesSearch>,
        poi: Box<dyn PoiSource>,
        routes: Box<dyn RouteMatrixSource>,
        layout: OutputLayout,
        pacing: Pacing,
        usage: ApiUsage,
    ) -> Self {
        Self {
            places,
            poi,
            routes,
            layout,
            pacing,
            usage,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    #[must_use]
    pub const fn usage(&self) -> &ApiUsage {
        &self.usage
    }

    /// Runs every stage for one city and writes its tables and report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NoHotels`] if text search finds nothing,
    /// or the first persistence error from any stage. API failures inside
    /// a stage degrade that stage's output instead of erroring.
    pub async fn process_city(
        &mut self,
        city: &CityConfig,
        max_hotels: usize,
        hotel_progress: &dyn ProgressCallback,
    ) -> Result<CityOutcome, PipelineError> {
        let name = city.name.as_str();
        log::info!("Starting data collection for {name} (max {max_hotels} hotels)");
        let usage_before = self.usage.counts().clone();

        log::info!("Step 1: searching for hotels...");
        let collector = TextSearchCollector::new(self.places.as_ref(), &self.layout, self.pacing);
        let raw = collector.collect(city, max_hotels, &mut self.usage).await?;
        if raw.is_empty() {
            return Err(PipelineError::NoHotels {
                city: name.to_string(),
            });
        }

        log::info!("Step 2: enriching {} hotels with nearby POIs...", raw.len());
        let enricher = LocalityEnricher::new(self.poi.as_ref(), &self.layout, self.pacing);
        let (enriched, enrichment) = enricher
            .enrich(raw, name, &mut self.usage, hotel_progress)
            .await?;

        let progress = ProgressStore::new(self.layout.clone());
        progress.save(
            name,
            Stage::Enrichment,
            serde_json::json!({
                "enriched": enrichment.enriched,
                "failed": enrichment.failed,
                "missing_coordinates": enrichment.missing_coordinates,
            }),
        )?;

        log::info!("Step 3: assembling hotel rows...");
        let assembled = assemble_hotels(name, &enriched);

        log::info!("Step 4: calculating landmark distances...");
        let points: Vec<HotelPoint> = assembled
            .hotels
            .iter()
            .map(|hotel| HotelPoint {
                hotel_id: hotel.hotel_id.clone(),
                coordinates: Coordinates::new(hotel.latitude, hotel.longitude),
            })
            .collect();
        let calculator = LandmarkCalculator::new(self.routes.as_ref(), &self.layout, self.pacing);
        let (landmarks, routing) = calculator.compute(&points, city, &mut self.usage).await;

        log::info!("Step 5: saving datasets...");
        let datasets = CityDatasets::new(assembled, landmarks);
        datasets.write(&self.layout, name)?;

        log::info!("Step 6: generating report...");
        let report = CityReport::build(
            name,
            &datasets.hotels,
            &datasets.reviews,
            &datasets.landmarks,
            &self.usage.counts().since(&usage_before),
            enrichment,
            routing,
        );
        write_city_report(&self.layout, &report)?;

        progress.save(
            name,
            Stage::Datasets,
            serde_json::json!({
                "hotels": datasets.hotels.len(),
                "reviews": datasets.reviews.len(),
                "landmarks": datasets.landmarks.len(),
            }),
        )?;

        log::info!(
            "Completed {name}: {} hotels, {} reviews, {} landmark distances",
            datasets.hotels.len(),
            datasets.reviews.len(),
            datasets.landmarks.len()
        );

        Ok(CityOutcome {
            city: name.to_string(),
            hotels: datasets.hotels.len(),
            reviews: datasets.reviews.len(),
            landmarks: datasets.landmarks.len(),
            report,
        })
    }

    /// Processes `cities` one after another, then consolidates the ones
    /// that succeeded.
    ///
    /// A failing city is logged and skipped; the remaining cities still
    /// run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Dataset`] if consolidation cannot write its
    /// outputs.
    pub async fn run_all_cities(
        &mut self,
        cities: &[CityConfig],
        max_hotels: usize,
        city_progress: &dyn ProgressCallback,
        hotel_progress: &dyn ProgressCallback,
    ) -> Result<RunSummary, PipelineError> {
        let mut summary = RunSummary::default();
        city_progress.set_total(cities.len() as u64);

        for (idx, city) in cities.iter().enumerate() {
            city_progress.set_message(format!("Processing {}", city.name));

            match self.process_city(city, max_hotels, hotel_progress).await {
                Ok(outcome) => {
                    log::info!("Successfully completed {}", outcome.city);
                    summary.succeeded.push(outcome.city);
                }
                Err(e) => {
                    log::error!("Failed to process {}: {e}", city.name);
                    summary.failed.push(city.name.clone());
                }
            }
            city_progress.inc(1);

            if idx + 1 < cities.len() {
                tokio::time::sleep(self.pacing.city_delay).await;
            }
        }

        city_progress.finish(format!(
            "{}/{} cities processed",
            summary.succeeded.len(),
            cities.len()
        ));

        if summary.succeeded.is_empty() {
            log::warn!("No cities processed successfully, skipping consolidation");
        } else {
            summary.report = Some(self.consolidate(&summary.succeeded)?);
        }

        Ok(summary)
    }

    /// Rebuilds the all-regions outputs from existing per-city tables.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Dataset`] if an output cannot be written.
    pub fn consolidate(&self, cities: &[String]) -> Result<ConsolidatedReport, PipelineError> {
        Ok(Consolidator::new(&self.layout).consolidate(cities, self.usage.counts())?)
    }
}

/// Rebuilds the all-regions outputs from per-city tables already on disk.
///
/// Names are resolved against the city registry, so any casing works; an
/// empty list means every configured city. No API calls are made, so the
/// report's usage counters are zero.
///
/// # Errors
///
/// Returns [`PipelineError::City`] for an unknown city name and
/// [`PipelineError::Dataset`] if an output cannot be written.
pub fn consolidate_existing(
    layout: &OutputLayout,
    cities: &[String],
) -> Result<ConsolidatedReport, PipelineError> {
    let names: Vec<String> = select_cities(cities)?
        .into_iter()
        .map(|city| city.name)
        .collect();
    Ok(Consolidator::new(layout).consolidate(&names, &RequestCounts::default())?)
}
