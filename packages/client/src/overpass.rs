//! Overpass API client.

use crate::crawl::{CrawlClient, CrawlPolicy};
use crate::{ClientError, PoiSource};

/// Public Overpass interpreter endpoint.
pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Runs Overpass QL queries through a [`CrawlClient`].
#[derive(Debug, Clone)]
pub struct OverpassClient {
    crawl: CrawlClient,
    endpoint: String,
}

impl OverpassClient {
    /// Creates a client against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(policy: CrawlPolicy) -> Result<Self, ClientError> {
        Ok(Self {
            crawl: CrawlClient::new(policy)?,
            endpoint: OVERPASS_URL.to_string(),
        })
    }

    /// Points the client at a different interpreter.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait::async_trait]
impl PoiSource for OverpassClient {
    async fn query(&self, overpass_ql: &str) -> Option<String> {
        self.crawl
            .get(&self.endpoint, &[("data", overpass_ql)])
            .await
    }
}
