//! Google Places (New) text-search client.

use serde_json::json;

use crate::retry::{RetryPolicy, send_with_retry};
use crate::{ClientError, PlacesSearch};

/// Production text-search endpoint.
pub const PLACES_TEXT_SEARCH_URL: &str = "https://places.googleapis.com/v1/places:searchText";

/// Every result is restricted to this place type.
pub const LODGING_TYPE: &str = "lodging";

/// Text-search client authenticated with an API key.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    policy: RetryPolicy,
}

impl GooglePlacesClient {
    /// Creates a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, policy: RetryPolicy) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: PLACES_TEXT_SEARCH_URL.to_string(),
            policy,
        })
    }

    /// Points the client at a different endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Builds the request body for one text-search page.
#[must_use]
pub fn search_body(query: &str, page_token: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "textQuery": query,
        "includedType": LODGING_TYPE,
    });
    if let Some(token) = page_token {
        body["pageToken"] = json!(token);
    }
    body
}

#[async_trait::async_trait]
impl PlacesSearch for GooglePlacesClient {
    async fn search_text(&self, query: &str, page_token: Option<&str>) -> Option<String> {
        let body = search_body(query, page_token);
        log::debug!("Text search: {query:?} (page token: {})", page_token.is_some());

        send_with_retry(
            || {
                self.client
                    .post(&self.endpoint)
                    .header("X-Goog-Api-Key", &self.api_key)
                    .header("X-Goog-FieldMask", "*")
                    .json(&body)
            },
            &self.policy,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use httptest::matchers::{all_of, contains, eq, json_decoded, key, request};
    use httptest::responders::status_code;
    use httptest::{Expectation, Server};

    use super::*;

    #[test]
    fn body_includes_page_token_only_when_given() {
        let first = search_body("hotels in Pune", None);
        assert_eq!(
            first,
            json!({"textQuery": "hotels in Pune", "includedType": "lodging"})
        );

        let next = search_body("hotels in Pune", Some("abc"));
        assert_eq!(next["pageToken"], "abc");
    }

    #[tokio::test]
    async fn posts_query_with_key_and_field_mask() {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/places:searchText"),
                request::headers(contains(key("x-goog-api-key"))),
                request::headers(contains(key("x-goog-fieldmask"))),
                request::body(json_decoded(eq(json!({
                    "textQuery": "luxury hotels in Kochi",
                    "includedType": "lodging",
                    "pageToken": "next"
                }))))
            ])
            .respond_with(status_code(200).body("{\"places\":[]}")),
        );

        let client = GooglePlacesClient::new("secret", RetryPolicy::default().without_delays())
            .unwrap()
            .with_endpoint(server.url_str("/v1/places:searchText"));
        let body = client
            .search_text("luxury hotels in Kochi", Some("next"))
            .await;

        assert_eq!(body.as_deref(), Some("{\"places\":[]}"));
    }
}
