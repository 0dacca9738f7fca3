#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI for the hotel data pipeline.
//!
//! ```text
//! hotel_atlas city <NAME> [--per-city 250]
//! hotel_atlas all [--cities Mumbai,Delhi] [--per-city 250]
//! hotel_atlas test
//! hotel_atlas consolidate [--cities Mumbai,Delhi]
//! hotel_atlas cities
//! ```
//!
//! Settings come from the environment (or `.env`); see
//! [`hotel_atlas_pipeline::settings`]. Log output goes through
//! [`hotel_atlas_cli_utils::init_logger`] so it never fights with the
//! progress bars.

use clap::{Parser, Subcommand};
use hotel_atlas_city::{all_cities, find_city, select_cities};
use hotel_atlas_cli_utils::{IndicatifProgress, MultiProgress};
use hotel_atlas_pipeline::settings::{
    DEFAULT_PER_CITY, TEST_RUN_CITIES, TEST_RUN_HOTELS, output_dir_from_env,
};
use hotel_atlas_pipeline::{Pipeline, PipelineSettings, RunSummary, consolidate_existing};
use hotel_atlas_store::OutputLayout;

#[derive(Parser)]
#[command(
    name = "hotel_atlas",
    about = "Collect, enrich and export hotel datasets for Indian cities"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline for one city
    City {
        /// City name, e.g. Mumbai
        name: String,
        /// Maximum hotels to collect
        #[arg(long, default_value_t = DEFAULT_PER_CITY)]
        per_city: usize,
    },
    /// Run every configured city (or a subset), then consolidate
    All {
        /// Comma-separated city filter; overrides `HOTEL_ATLAS_CITIES`
        #[arg(long, value_delimiter = ',')]
        cities: Vec<String>,
        /// Maximum hotels to collect per city
        #[arg(long, default_value_t = DEFAULT_PER_CITY)]
        per_city: usize,
    },
    /// Small run over three cities with a few hotels each
    Test,
    /// Rebuild the all-regions outputs from existing per-city datasets
    Consolidate {
        /// Comma-separated city list (defaults to every configured city)
        #[arg(long, value_delimiter = ',')]
        cities: Vec<String>,
    },
    /// List configured cities
    Cities,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = hotel_atlas_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::City { name, per_city } => {
            let city = find_city(&name)?;
            let settings = PipelineSettings::from_env()?;
            let mut pipeline = Pipeline::from_settings(&settings)?;

            let hotels = IndicatifProgress::hotels_bar(&multi, &format!("Enriching {}", city.name));
            let outcome = pipeline
                .process_city(&city, per_city, hotels.as_ref())
                .await?;

            println!(
                "{}: {} hotels, {} reviews, {} landmark distances",
                outcome.city, outcome.hotels, outcome.reviews, outcome.landmarks
            );
        }
        Commands::All { cities, per_city } => {
            let settings = PipelineSettings::from_env()?;
            let filter = if cities.is_empty() {
                settings.cities.clone()
            } else {
                cities
            };
            let cities = select_cities(&filter)?;
            run_cities(&multi, &settings, &cities, per_city).await?;
        }
        Commands::Test => {
            let settings = PipelineSettings::from_env()?;
            let names: Vec<String> = TEST_RUN_CITIES.iter().map(ToString::to_string).collect();
            let cities = select_cities(&names)?;
            log::info!(
                "Test run: {} hotels each for {}",
                TEST_RUN_HOTELS,
                names.join(", ")
            );
            run_cities(&multi, &settings, &cities, TEST_RUN_HOTELS).await?;
        }
        Commands::Consolidate { cities } => {
            let layout = OutputLayout::new(output_dir_from_env());
            consolidate_existing(&layout, &cities)?;
        }
        Commands::Cities => {
            println!("{:<14} {:<16} {:>10} {:>9}", "CITY", "STATE", "STRATEGIES", "LANDMARKS");
            for city in all_cities() {
                println!(
                    "{:<14} {:<16} {:>10} {:>9}",
                    city.name,
                    city.state,
                    city.search_strategies.len(),
                    city.landmarks.len()
                );
            }
        }
    }

    Ok(())
}

async fn run_cities(
    multi: &MultiProgress,
    settings: &PipelineSettings,
    cities: &[hotel_atlas_city::CityConfig],
    per_city: usize,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let mut pipeline = Pipeline::from_settings(settings)?;

    let city_bar = IndicatifProgress::cities_bar(multi, cities.len() as u64);
    let hotels = IndicatifProgress::hotels_bar(multi, "Enriching hotels");

    let summary = pipeline
        .run_all_cities(cities, per_city, city_bar.as_ref(), hotels.as_ref())
        .await?;

    if !summary.failed.is_empty() {
        log::warn!("Failed cities: {}", summary.failed.join(", "));
    }

    Ok(summary)
}
