//! Header-rotating client for the shared Overpass service.
//!
//! The public Overpass instances throttle aggressively and are shared with
//! everyone else, so this client is more patient than [`crate::retry`]:
//!
//! - a random browser `User-Agent` is picked for every attempt;
//! - every attempt is preceded by a jittered delay (1–3 s on the first
//!   attempt, 3–8 s times the attempt number after that, capped);
//! - only HTTP 200 counts as success;
//! - 429 and gateway errors (502/503/504) add an extended wait on top;
//! - anything else is logged and retried until attempts run out.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use crate::ClientError;
use crate::user_agent::random_user_agent;

/// Timing parameters for [`CrawlClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Jitter before the first attempt.
    pub initial_jitter: RangeInclusive<Duration>,
    /// Jitter before a retry, multiplied by the attempt number.
    pub retry_jitter: RangeInclusive<Duration>,
    /// Ceiling for the retry jitter.
    pub retry_jitter_cap: Duration,
    /// Extra wait per attempt after a 429.
    pub rate_limit_step: Duration,
    /// Ceiling for the 429 wait.
    pub rate_limit_cap: Duration,
    /// Extra wait after a gateway error.
    pub gateway_wait: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for CrawlPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_jitter: Duration::from_secs(1)..=Duration::from_secs(3),
            retry_jitter: Duration::from_secs(3)..=Duration::from_secs(8),
            retry_jitter_cap: Duration::from_secs(30),
            rate_limit_step: Duration::from_secs(10),
            rate_limit_cap: Duration::from_secs(60),
            gateway_wait: Duration::from_secs(10),
            timeout: Duration::from_secs(90),
        }
    }
}

impl CrawlPolicy {
    /// Same attempt count and timeout, no waiting.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            initial_jitter: Duration::ZERO..=Duration::ZERO,
            retry_jitter: Duration::ZERO..=Duration::ZERO,
            retry_jitter_cap: Duration::ZERO,
            rate_limit_step: Duration::ZERO,
            rate_limit_cap: Duration::ZERO,
            gateway_wait: Duration::ZERO,
            timeout: self.timeout,
        }
    }

    /// Jittered delay before `attempt` (0-based).
    #[must_use]
    pub fn jitter(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return sample(&self.initial_jitter);
        }
        sample(&self.retry_jitter)
            .saturating_mul(attempt + 1)
            .min(self.retry_jitter_cap)
    }

    /// Extended wait after a 429 on `attempt` (0-based).
    #[must_use]
    pub fn rate_limit_wait(&self, attempt: u32) -> Duration {
        self.rate_limit_step
            .saturating_mul(attempt + 1)
            .min(self.rate_limit_cap)
    }
}

fn sample(range: &RangeInclusive<Duration>) -> Duration {
    let (low, high) = (range.start().as_secs_f64(), range.end().as_secs_f64());
    if high <= low {
        return *range.start();
    }
    Duration::from_secs_f64(rand::thread_rng().gen_range(low..=high))
}

/// HTTP client for hostile crawl targets.
#[derive(Debug, Clone)]
pub struct CrawlClient {
    client: reqwest::Client,
    policy: CrawlPolicy,
}

impl CrawlClient {
    /// Creates a client with the given policy.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(policy: CrawlPolicy) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(policy.timeout).build()?;
        Ok(Self { client, policy })
    }

    #[must_use]
    pub const fn policy(&self) -> &CrawlPolicy {
        &self.policy
    }

    /// Sends a GET with the given query parameters, returning the body of
    /// the first HTTP 200 response or `None` once attempts run out.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Option<String> {
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 0..max_attempts {
            tokio::time::sleep(self.policy.jitter(attempt)).await;

            let result = self
                .client
                .get(url)
                .query(query)
                .header(reqwest::header::USER_AGENT, random_user_agent())
                .send()
                .await;

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    log::warn!(
                        "  crawl request failed (attempt {}/{max_attempts}): {e}",
                        attempt + 1
                    );
                    continue;
                }
            };

            let status = response.status();
            match status.as_u16() {
                200 => match response.text().await {
                    Ok(text) => return Some(text),
                    Err(e) => {
                        log::warn!(
                            "  crawl body read failed (attempt {}/{max_attempts}): {e}",
                            attempt + 1
                        );
                    }
                },
                429 => {
                    let wait = self.policy.rate_limit_wait(attempt);
                    log::warn!(
                        "  HTTP 429 from {url} (attempt {}/{max_attempts}), waiting {wait:?}",
                        attempt + 1
                    );
                    tokio::time::sleep(wait).await;
                }
                502..=504 => {
                    let wait = self.policy.gateway_wait;
                    log::warn!(
                        "  HTTP {status} from {url} (attempt {}/{max_attempts}), waiting {wait:?}",
                        attempt + 1
                    );
                    tokio::time::sleep(wait).await;
                }
                _ => {
                    log::warn!(
                        "  HTTP {status} from {url} (attempt {}/{max_attempts})",
                        attempt + 1
                    );
                }
            }
        }

        log::error!("Crawl request to {url} failed after {max_attempts} attempts");
        None
    }
}

#[cfg(test)]
mod tests {
    use httptest::matchers::{all_of, contains, key, request, url_decoded};
    use httptest::responders::status_code;
    use httptest::{Expectation, Server};

    use super::*;

    fn fast_client() -> CrawlClient {
        CrawlClient::new(CrawlPolicy::default().without_delays()).unwrap()
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let policy = CrawlPolicy::default();
        for _ in 0..50 {
            let first = policy.jitter(0);
            assert!(first >= Duration::from_secs(1) && first <= Duration::from_secs(3));

            let second = policy.jitter(1);
            assert!(second >= Duration::from_secs(6) && second <= Duration::from_secs(16));

            assert!(policy.jitter(9) <= Duration::from_secs(30));
        }
    }

    #[test]
    fn rate_limit_wait_grows_then_caps() {
        let policy = CrawlPolicy::default();
        assert_eq!(policy.rate_limit_wait(0), Duration::from_secs(10));
        assert_eq!(policy.rate_limit_wait(2), Duration::from_secs(30));
        assert_eq!(policy.rate_limit_wait(8), Duration::from_secs(60));
    }

    #[test]
    fn without_delays_zeroes_every_wait() {
        let policy = CrawlPolicy::default().without_delays();
        assert_eq!(policy.jitter(0), Duration::ZERO);
        assert_eq!(policy.jitter(3), Duration::ZERO);
        assert_eq!(policy.rate_limit_wait(3), Duration::ZERO);
        assert_eq!(policy.max_attempts, 5);
    }

    #[tokio::test]
    async fn sends_query_and_browser_user_agent() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", "/api/interpreter"),
                request::query(url_decoded(contains(("data", "[out:json];")))),
                request::headers(contains(key("user-agent")))
            ])
            .respond_with(status_code(200).body("{\"elements\":[]}")),
        );

        let url = server.url_str("/api/interpreter");
        let body = fast_client().get(&url, &[("data", "[out:json];")]).await;

        assert_eq!(body.as_deref(), Some("{\"elements\":[]}"));
    }

    #[tokio::test]
    async fn retries_gateway_errors_up_to_max_attempts() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/down"))
                .times(5)
                .respond_with(status_code(504)),
        );

        let url = server.url_str("/down");
        assert_eq!(fast_client().get(&url, &[]).await, None);
    }

    #[tokio::test]
    async fn retries_other_errors_and_recovers() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/odd"))
                .times(3)
                .respond_with(httptest::cycle![
                    status_code(400),
                    status_code(429),
                    status_code(200).body("ok")
                ]),
        );

        let url = server.url_str("/odd");
        assert_eq!(fast_client().get(&url, &[]).await.as_deref(), Some("ok"));
    }
}
