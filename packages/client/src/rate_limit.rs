//! Per-category rolling one-minute request windows.
//!
//! The limiter never sleeps. Callers consult [`RateLimiter::check`] before
//! issuing a call and decide for themselves how long to wait when it
//! returns `false`. Categories without a configured limit always pass.
//!
//! Windows are measured on tokio's clock, so a paused test runtime drives
//! expiry along with its sleeps. The `*_at` variants take the current
//! instant explicitly.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use hotel_atlas_hotel_models::ApiCategory;

/// Per-minute text-search page requests.
pub const TEXT_SEARCH_PER_MINUTE: u64 = 600;

/// Per-minute route-matrix elements.
pub const ROUTE_MATRIX_ELEMENTS_PER_MINUTE: u64 = 3000;

/// Per-minute Overpass queries unless configured otherwise.
pub const DEFAULT_OVERPASS_PER_MINUTE: u64 = 120;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    resets_at: Instant,
}

/// Tracks request counts per [`ApiCategory`] inside one-minute windows.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limits: BTreeMap<ApiCategory, u64>,
    windows: BTreeMap<ApiCategory, Window>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_OVERPASS_PER_MINUTE)
    }
}

impl RateLimiter {
    /// Creates a limiter with the fixed text-search and route-matrix limits
    /// and the given Overpass limit.
    #[must_use]
    pub fn new(overpass_per_minute: u64) -> Self {
        Self::unlimited()
            .with_limit(ApiCategory::TextSearch, TEXT_SEARCH_PER_MINUTE)
            .with_limit(ApiCategory::RouteMatrix, ROUTE_MATRIX_ELEMENTS_PER_MINUTE)
            .with_limit(ApiCategory::Overpass, overpass_per_minute)
    }

    /// Creates a limiter with no limits at all.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            limits: BTreeMap::new(),
            windows: BTreeMap::new(),
        }
    }

    /// Sets the per-minute limit for one category.
    #[must_use]
    pub fn with_limit(mut self, category: ApiCategory, per_minute: u64) -> Self {
        self.limits.insert(category, per_minute);
        self
    }

    /// The configured per-minute limit, if any.
    #[must_use]
    pub fn limit(&self, category: ApiCategory) -> Option<u64> {
        self.limits.get(&category).copied()
    }

    /// Whether a new call in `category` may be issued now.
    pub fn check(&mut self, category: ApiCategory) -> bool {
        self.check_at(category, Instant::now())
    }

    /// Whether a new call in `category` may be issued at `now`.
    pub fn check_at(&mut self, category: ApiCategory, now: Instant) -> bool {
        let Some(limit) = self.limit(category) else {
            return true;
        };
        self.window_at(category, now).count < limit
    }

    /// Records `count` units of usage in `category`.
    pub fn increment(&mut self, category: ApiCategory, count: u64) {
        self.increment_at(category, count, Instant::now());
    }

    /// Records `count` units of usage in `category` at `now`.
    pub fn increment_at(&mut self, category: ApiCategory, count: u64, now: Instant) {
        let window = self.window_at(category, now);
        window.count = window.count.saturating_add(count);
    }

    /// The current window for `category`, reset when `now` has passed its
    /// reset instant.
    fn window_at(&mut self, category: ApiCategory, now: Instant) -> &mut Window {
        let window = self.windows.entry(category).or_insert(Window {
            count: 0,
            resets_at: now + WINDOW,
        });
        if now >= window.resets_at {
            window.count = 0;
            window.resets_at = now + WINDOW;
        }
        window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_at_limit_and_recovers_after_window() {
        let mut limiter = RateLimiter::unlimited().with_limit(ApiCategory::TextSearch, 3);
        let start = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at(ApiCategory::TextSearch, start));
            limiter.increment_at(ApiCategory::TextSearch, 1, start);
        }
        assert!(!limiter.check_at(ApiCategory::TextSearch, start));
        assert!(!limiter.check_at(ApiCategory::TextSearch, start + Duration::from_secs(59)));

        assert!(limiter.check_at(ApiCategory::TextSearch, start + Duration::from_secs(61)));
    }

    #[test]
    fn bulk_increment_counts_every_unit() {
        let mut limiter = RateLimiter::new(10);
        let now = Instant::now();

        limiter.increment_at(ApiCategory::RouteMatrix, 2999, now);
        assert!(limiter.check_at(ApiCategory::RouteMatrix, now));
        limiter.increment_at(ApiCategory::RouteMatrix, 1, now);
        assert!(!limiter.check_at(ApiCategory::RouteMatrix, now));
    }

    #[test]
    fn categories_are_independent() {
        let mut limiter = RateLimiter::new(1);
        let now = Instant::now();

        limiter.increment_at(ApiCategory::Overpass, 1, now);
        assert!(!limiter.check_at(ApiCategory::Overpass, now));
        assert!(limiter.check_at(ApiCategory::TextSearch, now));
    }

    #[test]
    fn unlimited_category_always_passes() {
        let mut limiter = RateLimiter::unlimited();
        limiter.increment(ApiCategory::Overpass, 1_000_000);
        assert!(limiter.check(ApiCategory::Overpass));
        assert_eq!(limiter.limit(ApiCategory::Overpass), None);
    }

    #[test]
    fn default_limits_match_service_constants() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.limit(ApiCategory::TextSearch), Some(600));
        assert_eq!(limiter.limit(ApiCategory::RouteMatrix), Some(3000));
        assert_eq!(limiter.limit(ApiCategory::Overpass), Some(120));
    }
}
