//! API usage state owned by the pipeline driver.
//!
//! [`ApiUsage`] bundles the rate limiter with cumulative request counters
//! and the daily quotas checked against them. It is created once per
//! process and handed by `&mut` to each stage, so there is exactly one
//! writer.

use std::collections::BTreeMap;
use std::time::Duration;

use hotel_atlas_hotel_models::ApiCategory;
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimiter;

/// Default daily text-search page quota.
pub const DEFAULT_TEXT_SEARCH_MAX_REQUESTS: u64 = 7000;

/// Default daily route-matrix element quota.
pub const DEFAULT_ROUTE_MATRIX_MAX_REQUESTS: u64 = 70_000;

/// Cumulative usage per category. Serializes as
/// `{"text_search": n, "route_matrix": n, "overpass": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestCounts(BTreeMap<ApiCategory, u64>);

impl Default for RequestCounts {
    fn default() -> Self {
        Self(ApiCategory::ALL.iter().map(|c| (*c, 0)).collect())
    }
}

impl RequestCounts {
    #[must_use]
    pub fn get(&self, category: ApiCategory) -> u64 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Usage recorded after `earlier` was taken.
    #[must_use]
    pub fn since(&self, earlier: &Self) -> Self {
        Self(
            ApiCategory::ALL
                .iter()
                .map(|c| (*c, self.get(*c).saturating_sub(earlier.get(*c))))
                .collect(),
        )
    }

    fn add(&mut self, category: ApiCategory, units: u64) {
        let count = self.0.entry(category).or_insert(0);
        *count = count.saturating_add(units);
    }
}

/// Hard daily quotas. Categories without a quota are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyQuotas {
    pub text_search: u64,
    pub route_matrix: u64,
}

impl Default for DailyQuotas {
    fn default() -> Self {
        Self {
            text_search: DEFAULT_TEXT_SEARCH_MAX_REQUESTS,
            route_matrix: DEFAULT_ROUTE_MATRIX_MAX_REQUESTS,
        }
    }
}

impl DailyQuotas {
    #[must_use]
    pub const fn get(&self, category: ApiCategory) -> Option<u64> {
        match category {
            ApiCategory::TextSearch => Some(self.text_search),
            ApiCategory::RouteMatrix => Some(self.route_matrix),
            ApiCategory::Overpass => None,
        }
    }
}

/// Deliberate delays between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Between text-search result pages.
    pub page_delay: Duration,
    /// Between the two POI queries for one hotel.
    pub query_delay: Duration,
    /// Between hotels during POI enrichment.
    pub hotel_delay: Duration,
    /// Between route-matrix batches.
    pub batch_delay: Duration,
    /// Between cities in an all-cities run.
    pub city_delay: Duration,
    /// Polling interval while a rate-limit window is full.
    pub rate_limit_poll: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_delay: Duration::from_secs(1),
            query_delay: Duration::from_millis(500),
            hotel_delay: Duration::from_secs(2),
            batch_delay: Duration::from_millis(100),
            city_delay: Duration::from_secs(2),
            rate_limit_poll: Duration::from_secs(30),
        }
    }
}

impl Pacing {
    /// No delays at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            page_delay: Duration::ZERO,
            query_delay: Duration::ZERO,
            hotel_delay: Duration::ZERO,
            batch_delay: Duration::ZERO,
            city_delay: Duration::ZERO,
            rate_limit_poll: Duration::ZERO,
        }
    }
}

/// Rate-limit windows, cumulative counters and daily quotas.
#[derive(Debug, Clone, Default)]
pub struct ApiUsage {
    limiter: RateLimiter,
    counts: RequestCounts,
    quotas: DailyQuotas,
}

impl ApiUsage {
    #[must_use]
    pub fn new(limiter: RateLimiter, quotas: DailyQuotas) -> Self {
        Self {
            limiter,
            counts: RequestCounts::default(),
            quotas,
        }
    }

    /// Cumulative usage so far.
    #[must_use]
    pub const fn counts(&self) -> &RequestCounts {
        &self.counts
    }

    /// Whether the rate-limit window for `category` has room for a call.
    pub fn can_call(&mut self, category: ApiCategory) -> bool {
        self.limiter.check(category)
    }

    /// Whether the daily quota for `category` is used up.
    #[must_use]
    pub fn quota_exhausted(&self, category: ApiCategory) -> bool {
        self.quotas
            .get(category)
            .is_some_and(|quota| self.counts.get(category) >= quota)
    }

    /// Whether spending `units` more in `category` would exceed its daily
    /// quota.
    #[must_use]
    pub fn would_exceed_quota(&self, category: ApiCategory, units: u64) -> bool {
        self.quotas
            .get(category)
            .is_some_and(|quota| self.counts.get(category).saturating_add(units) > quota)
    }

    /// Records `units` of usage against both the counters and the
    /// rate-limit window.
    pub fn record(&mut self, category: ApiCategory, units: u64) {
        self.counts.add(category, units);
        self.limiter.increment(category, units);
    }

    /// Polls until the rate-limit window for `category` has room, sleeping
    /// `poll` between checks.
    pub async fn wait_for_capacity(&mut self, category: ApiCategory, poll: Duration) {
        while !self.can_call(category) {
            log::warn!("Rate limit reached for {category}, waiting {poll:?}...");
            tokio::time::sleep(poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn quota_tracks_recorded_units() {
        let mut usage = ApiUsage::new(
            RateLimiter::unlimited(),
            DailyQuotas {
                text_search: 2,
                route_matrix: 100,
            },
        );

        assert!(!usage.quota_exhausted(ApiCategory::TextSearch));
        usage.record(ApiCategory::TextSearch, 1);
        usage.record(ApiCategory::TextSearch, 1);
        assert!(usage.quota_exhausted(ApiCategory::TextSearch));

        assert!(!usage.would_exceed_quota(ApiCategory::RouteMatrix, 100));
        usage.record(ApiCategory::RouteMatrix, 75);
        assert!(usage.would_exceed_quota(ApiCategory::RouteMatrix, 26));
        assert!(!usage.would_exceed_quota(ApiCategory::RouteMatrix, 25));

        assert_eq!(usage.counts().get(ApiCategory::TextSearch), 2);
        assert_eq!(usage.counts().get(ApiCategory::RouteMatrix), 75);
    }

    #[test]
    fn overpass_has_no_daily_quota() {
        let mut usage = ApiUsage::default();
        usage.record(ApiCategory::Overpass, 1_000_000);
        assert!(!usage.quota_exhausted(ApiCategory::Overpass));
        assert!(!usage.would_exceed_quota(ApiCategory::Overpass, 1));
    }

    #[test]
    fn record_feeds_the_rate_limiter() {
        let mut usage = ApiUsage::new(
            RateLimiter::unlimited().with_limit(ApiCategory::Overpass, 2),
            DailyQuotas::default(),
        );
        assert!(usage.can_call(ApiCategory::Overpass));
        usage.record(ApiCategory::Overpass, 2);
        assert!(!usage.can_call(ApiCategory::Overpass));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_capacity_polls_until_window_rolls_over() {
        let mut usage = ApiUsage::new(
            RateLimiter::unlimited().with_limit(ApiCategory::TextSearch, 2),
            DailyQuotas::default(),
        );
        usage.record(ApiCategory::TextSearch, 2);
        assert!(!usage.can_call(ApiCategory::TextSearch));

        let start = Instant::now();
        usage
            .wait_for_capacity(ApiCategory::TextSearch, Duration::from_secs(30))
            .await;
        let waited = start.elapsed();

        assert!(waited >= Duration::from_secs(60), "{waited:?}");
        assert!(waited < Duration::from_secs(90), "{waited:?}");
        assert!(usage.can_call(ApiCategory::TextSearch));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_capacity_returns_at_once_with_room() {
        let mut usage = ApiUsage::new(
            RateLimiter::unlimited().with_limit(ApiCategory::TextSearch, 2),
            DailyQuotas::default(),
        );
        usage.record(ApiCategory::TextSearch, 1);

        let start = Instant::now();
        usage
            .wait_for_capacity(ApiCategory::TextSearch, Duration::from_secs(30))
            .await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn since_reports_only_later_usage() {
        let mut usage = ApiUsage::default();
        usage.record(ApiCategory::TextSearch, 3);
        usage.record(ApiCategory::Overpass, 10);
        let before = usage.counts().clone();

        usage.record(ApiCategory::Overpass, 4);
        usage.record(ApiCategory::RouteMatrix, 25);
        let delta = usage.counts().since(&before);

        assert_eq!(delta.get(ApiCategory::TextSearch), 0);
        assert_eq!(delta.get(ApiCategory::Overpass), 4);
        assert_eq!(delta.get(ApiCategory::RouteMatrix), 25);
    }

    #[test]
    fn counts_serialize_by_category_name() {
        let mut usage = ApiUsage::default();
        usage.record(ApiCategory::Overpass, 4);
        let json = serde_json::to_value(usage.counts()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"text_search": 0, "route_matrix": 0, "overpass": 4})
        );
    }
}
