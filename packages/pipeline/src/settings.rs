//! Runtime settings read from the environment.
//!
//! A `.env` file in the working directory is loaded first if present.
//! Only the API key is required; everything else has a default.

use std::path::PathBuf;

use hotel_atlas_client::rate_limit::DEFAULT_OVERPASS_PER_MINUTE;
use hotel_atlas_client::{CrawlPolicy, DailyQuotas, Pacing, RetryPolicy};

use crate::PipelineError;

pub const API_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";
pub const TEXT_SEARCH_QUOTA_VAR: &str = "TEXT_SEARCH_MAX_REQUESTS";
pub const ROUTE_MATRIX_QUOTA_VAR: &str = "ROUTE_MATRIX_MAX_REQUESTS";
pub const OVERPASS_RATE_VAR: &str = "OVERPASS_MAX_PER_MINUTE";
pub const OUTPUT_DIR_VAR: &str = "HOTEL_ATLAS_OUTPUT_DIR";
pub const CITIES_VAR: &str = "HOTEL_ATLAS_CITIES";

pub const DEFAULT_OUTPUT_DIR: &str = "./out";

/// Hotels collected per city unless overridden.
pub const DEFAULT_PER_CITY: usize = 250;

/// Hotels per city in a test run.
pub const TEST_RUN_HOTELS: usize = 5;

/// Cities processed by a test run.
pub const TEST_RUN_CITIES: [&str; 3] = ["Mumbai", "Delhi", "Bengaluru"];

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub api_key: String,
    pub quotas: DailyQuotas,
    pub overpass_per_minute: u64,
    pub output_dir: PathBuf,
    /// City filter for all-cities runs; empty means every configured city.
    pub cities: Vec<String>,
    pub pacing: Pacing,
    pub retry: RetryPolicy,
    pub crawl: CrawlPolicy,
}

impl PipelineSettings {
    /// Loads `.env` (if any) and reads settings from the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingCredential`] if the API key is unset
    /// or blank, and [`PipelineError::InvalidSetting`] if a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, PipelineError> {
        load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// See [`PipelineSettings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PipelineError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(PipelineError::MissingCredential { name: API_KEY_VAR })?;

        let defaults = DailyQuotas::default();
        let quotas = DailyQuotas {
            text_search: parse_u64(&lookup, TEXT_SEARCH_QUOTA_VAR, defaults.text_search)?,
            route_matrix: parse_u64(&lookup, ROUTE_MATRIX_QUOTA_VAR, defaults.route_matrix)?,
        };

        Ok(Self {
            api_key,
            quotas,
            overpass_per_minute: parse_u64(
                &lookup,
                OVERPASS_RATE_VAR,
                DEFAULT_OVERPASS_PER_MINUTE,
            )?,
            output_dir: output_dir(&lookup),
            cities: lookup(CITIES_VAR)
                .map(|list| parse_city_list(&list))
                .unwrap_or_default(),
            pacing: Pacing::default(),
            retry: RetryPolicy::default(),
            crawl: CrawlPolicy::default(),
        })
    }
}

/// The output root from the environment, without requiring credentials.
///
/// Used by commands that only read existing outputs.
#[must_use]
pub fn output_dir_from_env() -> PathBuf {
    load_dotenv();
    output_dir(&|name| std::env::var(name).ok())
}

fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        log::warn!("Failed to load .env: {e}");
    }
}

fn output_dir(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(OUTPUT_DIR_VAR)
        .filter(|dir| !dir.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from)
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<u64, PipelineError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| PipelineError::InvalidSetting { name, value }),
    }
}

/// Splits a comma-separated city list, dropping blanks.
#[must_use]
pub fn parse_city_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
