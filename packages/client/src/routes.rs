//! Google Routes `computeRouteMatrix` client.

use hotel_atlas_hotel_models::Coordinates;
use serde_json::json;

use crate::retry::{RetryPolicy, send_with_retry};
use crate::{ClientError, RouteMatrixSource};

/// Production route-matrix endpoint.
pub const ROUTE_MATRIX_URL: &str =
    "https://routes.googleapis.com/distanceMatrix/v2:computeRouteMatrix";

/// Fields requested for every matrix element.
pub const ROUTE_MATRIX_FIELD_MASK: &str =
    "originIndex,destinationIndex,duration,distanceMeters,status";

/// Route-matrix client authenticated with an API key.
#[derive(Debug, Clone)]
pub struct GoogleRoutesClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    policy: RetryPolicy,
}

impl GoogleRoutesClient {
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
            endpoint: ROUTE_MATRIX_URL.to_string(),
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

fn waypoint(point: &Coordinates) -> serde_json::Value {
    json!({
        "waypoint": {
            "location": {
                "latLng": {
                    "latitude": point.latitude,
                    "longitude": point.longitude,
                }
            }
        }
    })
}

/// Builds a traffic-aware driving matrix request.
#[must_use]
pub fn matrix_body(origins: &[Coordinates], destinations: &[Coordinates]) -> serde_json::Value {
    json!({
        "origins": origins.iter().map(waypoint).collect::<Vec<_>>(),
        "destinations": destinations.iter().map(waypoint).collect::<Vec<_>>(),
        "travelMode": "DRIVE",
        "routingPreference": "TRAFFIC_AWARE",
        "units": "METRIC",
    })
}

#[async_trait::async_trait]
impl RouteMatrixSource for GoogleRoutesClient {
    async fn compute_matrix(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Option<String> {
        let body = matrix_body(origins, destinations);

        send_with_retry(
            || {
                self.client
                    .post(&self.endpoint)
                    .header("X-Goog-Api-Key", &self.api_key)
                    .header("X-Goog-FieldMask", ROUTE_MATRIX_FIELD_MASK)
                    .json(&body)
            },
            &self.policy,
        )
        .await
    }
}
