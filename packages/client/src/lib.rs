#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbound HTTP plumbing for the hotel pipeline.
//!
//! - [`rate_limit`]: per-category one-minute request windows.
//! - [`usage`]: request counters, daily quotas and pacing delays, owned by
//!   the pipeline driver.
//! - [`retry`]: the cooperative retry loop used against keyed APIs.
//! - [`crawl`]: the header-rotating, jittered client used against the
//!   public Overpass service.
//! - [`places`], [`overpass`], [`routes`]: concrete API clients behind the
//!   [`PlacesSearch`], [`PoiSource`] and [`RouteMatrixSource`] traits.
//! - [`progress`]: the progress reporting trait shared by every stage.
//!
//! Every API call returns `Option<String>`: the raw response body on
//! success, `None` once retries are exhausted. Callers persist the raw body
//! before parsing it and treat `None` as "skip this unit of work".

pub mod crawl;
pub mod overpass;
pub mod places;
pub mod progress;
pub mod rate_limit;
pub mod retry;
pub mod routes;
pub mod usage;
pub mod user_agent;

use hotel_atlas_hotel_models::Coordinates;

pub use crawl::{CrawlClient, CrawlPolicy};
pub use overpass::OverpassClient;
pub use places::GooglePlacesClient;
pub use progress::{NullProgress, ProgressCallback};
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
pub use routes::GoogleRoutesClient;
pub use usage::{ApiUsage, DailyQuotas, Pacing, RequestCounts};

/// Errors raised while constructing API clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A places text-search service.
#[async_trait::async_trait]
pub trait PlacesSearch: Send + Sync {
    /// Runs one page of a lodging text search.
    ///
    /// Returns the raw response body, or `None` if the request failed after
    /// all retries.
    async fn search_text(&self, query: &str, page_token: Option<&str>) -> Option<String>;
}

/// A points-of-interest query service.
#[async_trait::async_trait]
pub trait PoiSource: Send + Sync {
    /// Runs one Overpass QL query and returns the raw response body.
    async fn query(&self, overpass_ql: &str) -> Option<String>;
}

/// A route-matrix service.
#[async_trait::async_trait]
pub trait RouteMatrixSource: Send + Sync {
    /// Requests driving distances and durations for every
    /// origin/destination pair and returns the raw response body.
    async fn compute_matrix(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Option<String>;
}

/// Truncates a response body for log output.
pub(crate) fn body_preview(body: &str) -> &str {
    const BODY_PREVIEW_LEN: usize = 500;

    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
