//! Cooperative retry loop for keyed APIs.
//!
//! Used by the places and route-matrix clients. The loop distinguishes
//! three outcomes per attempt:
//!
//! - **2xx**: the body is returned.
//! - **429**: wait for `Retry-After` seconds if the header is present,
//!   otherwise `base_delay * 2^attempt`, capped at `max_delay`, then retry.
//! - **any other status**: logged with a body preview, and the whole
//!   sequence is abandoned. These are not blindly retried.
//!
//! Transport failures (timeouts, connection resets, unreadable bodies)
//! retry with the same exponential backoff. When attempts run out the
//! caller gets `None`.
//!
//! # Usage
//!
//! ```ignore
//! let body = retry::send_with_retry(|| client.post(&url).json(&payload), &policy).await;
//! ```

use std::time::Duration;

use crate::body_preview;

/// Retry parameters for [`send_with_retry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Base for the exponential backoff.
    pub base_delay: Duration,
    /// Ceiling for any single wait, including `Retry-After`.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Same attempt count, no waiting.
    #[must_use]
    pub const fn without_delays(self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff for `attempt` (0-based), capped at `max_delay`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Wait after a 429: `Retry-After` seconds when given, exponential
    /// backoff otherwise, capped at `max_delay` either way.
    #[must_use]
    pub fn rate_limit_delay(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        retry_after.map_or_else(
            || self.backoff(attempt),
            |secs| Duration::from_secs(secs).min(self.max_delay),
        )
    }
}

/// Sends the request built by `build_request` under `policy`.
///
/// The closure is called once per attempt since builders are consumed by
/// `.send()`. Returns the response body text on a 2xx, `None` otherwise.
#[allow(clippy::future_not_send)]
pub async fn send_with_retry<F>(build_request: F, policy: &RetryPolicy) -> Option<String>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 0..max_attempts {
        let is_last = attempt + 1 == max_attempts;

        match build_request().send().await {
            Err(e) => {
                log::warn!(
                    "  request failed (attempt {}/{max_attempts}): {e}",
                    attempt + 1
                );
                if !is_last {
                    tokio::time::sleep(policy.backoff(attempt)).await;
                }
            }
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    match response.text().await {
                        Ok(text) => return Some(text),
                        Err(e) => {
                            log::warn!(
                                "  body read failed (attempt {}/{max_attempts}): {e}",
                                attempt + 1
                            );
                            if !is_last {
                                tokio::time::sleep(policy.backoff(attempt)).await;
                            }
                            continue;
                        }
                    }
                }

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.trim().parse::<u64>().ok());
                    let delay = policy.rate_limit_delay(attempt, retry_after);
                    log::warn!(
                        "  HTTP 429 (attempt {}/{max_attempts}), retry-after {retry_after:?}",
                        attempt + 1
                    );
                    if !is_last {
                        log::warn!("  waiting {delay:?} before retrying...");
                        tokio::time::sleep(delay).await;
                    }
                    continue;
                }

                let url = response.url().to_string();
                let body = response.text().await.unwrap_or_default();
                log::error!(
                    "HTTP {status} from {url}, giving up.\n  body preview: {}",
                    body_preview(&body)
                );
                return None;
            }
        }
    }

    log::error!("Request failed after {max_attempts} attempts");
    None
}

#[cfg(test)]
mod tests {
    use httptest::matchers::request;
    use httptest::responders::status_code;
    use httptest::{Expectation, Server};

    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default().without_delays()
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(10), Duration::from_secs(120));
        assert_eq!(policy.backoff(40), Duration::from_secs(120));
    }

    #[test]
    fn retry_after_wins_but_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.rate_limit_delay(0, Some(7)),
            Duration::from_secs(7)
        );
        assert_eq!(
            policy.rate_limit_delay(0, Some(3600)),
            Duration::from_secs(120)
        );
        assert_eq!(policy.rate_limit_delay(2, None), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn returns_body_on_success() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/ok"))
                .respond_with(status_code(200).body("{\"places\":[]}")),
        );

        let client = reqwest::Client::new();
        let url = server.url_str("/ok");
        let body = send_with_retry(|| client.get(&url), &fast_policy()).await;

        assert_eq!(body.as_deref(), Some("{\"places\":[]}"));
    }

    #[tokio::test]
    async fn retries_rate_limited_requests_until_exhausted() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/busy"))
                .times(3)
                .respond_with(status_code(429).insert_header("Retry-After", "0")),
        );

        let client = reqwest::Client::new();
        let url = server.url_str("/busy");
        let body = send_with_retry(|| client.get(&url), &fast_policy()).await;

        assert_eq!(body, None);
    }

    #[tokio::test]
    async fn recovers_after_rate_limit() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/flaky"))
                .times(2)
                .respond_with(httptest::cycle![
                    status_code(429),
                    status_code(200).body("done")
                ]),
        );

        let client = reqwest::Client::new();
        let url = server.url_str("/flaky");
        let body = send_with_retry(|| client.get(&url), &fast_policy()).await;

        assert_eq!(body.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn gives_up_immediately_on_other_errors() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/denied"))
                .times(1)
                .respond_with(status_code(403).body("API key invalid")),
        );
        server.expect(
            Expectation::matching(request::method_path("GET", "/broken"))
                .times(1)
                .respond_with(status_code(500)),
        );

        let client = reqwest::Client::new();
        let denied = server.url_str("/denied");
        let broken = server.url_str("/broken");

        assert_eq!(send_with_retry(|| client.get(&denied), &fast_policy()).await, None);
        assert_eq!(send_with_retry(|| client.get(&broken), &fast_policy()).await, None);
    }

    #[tokio::test]
    async fn transport_failures_return_none() {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        // Port 9 (discard) on localhost is not served in test environments.
        let body = send_with_retry(|| client.get("http://127.0.0.1:9/"), &fast_policy()).await;
        assert_eq!(body, None);
    }
}
