//! Routing provider clients.
//!
//! Two independent providers can answer "how long by train to the hub":
//! a travel-time matrix API (primary) and a general-purpose directions API
//! (fallback). Both are queried for a public-transit departure at the
//! next weekday 08:00 and report seconds, converted here to whole minutes
//! by integer division.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{HUB_LAT, HUB_LNG};

/// Errors from a routing provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error status
    #[error("provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected shape
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// A provider that can resolve a transit duration to the hub.
///
/// This abstraction exists so the resolver can be tested with stubs.
#[allow(async_fn_in_trait)]
pub trait TravelTimeProvider {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Minutes by public transit from the point to the hub for the given
    /// departure. `Ok(None)` means the provider found no route.
    async fn travel_minutes(
        &self,
        lat: f64,
        lng: f64,
        departure: DateTime<Utc>,
    ) -> Result<Option<u32>, ProviderError>;
}

// ---------------------------------------------------------------------------
// Provider A: travel-time matrix API

/// Default base URL for the matrix provider.
const MATRIX_BASE_URL: &str = "https://api.traveltimeapp.com/v4/time-filter";

/// Journeys longer than this are not reported by the matrix query.
const MATRIX_MAX_TRAVEL_SECS: u32 = 5400;

/// Configuration for the matrix provider client.
#[derive(Debug, Clone)]
pub struct MatrixConfig {
    /// Application id header value.
    pub app_id: String,
    /// API key header value.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MatrixConfig {
    /// Create a config with the given credentials.
    pub fn new(app_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            base_url: MATRIX_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    #[serde(default)]
    results: Vec<MatrixResult>,
}

#[derive(Debug, Deserialize)]
struct MatrixResult {
    #[serde(default)]
    locations: Vec<MatrixLocation>,
}

#[derive(Debug, Deserialize)]
struct MatrixLocation {
    #[serde(default)]
    properties: MatrixProperties,
}

#[derive(Debug, Default, Deserialize)]
struct MatrixProperties {
    travel_time: Option<u32>,
}

/// Client for the travel-time matrix provider.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl MatrixClient {
    /// Create a client with the given configuration.
    pub fn new(config: MatrixConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            app_id: config.app_id,
            api_key: config.api_key,
        })
    }
}

impl TravelTimeProvider for MatrixClient {
    fn name(&self) -> &'static str {
        "travel-time matrix"
    }

    async fn travel_minutes(
        &self,
        lat: f64,
        lng: f64,
        departure: DateTime<Utc>,
    ) -> Result<Option<u32>, ProviderError> {
        let payload = json!({
            "locations": [
                {"id": "origin", "coords": {"lat": lat, "lng": lng}},
                {"id": "hub", "coords": {"lat": HUB_LAT, "lng": HUB_LNG}},
            ],
            "departure_searches": [{
                "id": "commute",
                "departure_location_id": "origin",
                "arrival_location_ids": ["hub"],
                "departure_time": departure.to_rfc3339_opts(SecondsFormat::Secs, true),
                "travel_time": MATRIX_MAX_TRAVEL_SECS,
                "properties": ["travel_time"],
                "transportation": {"type": "public_transport"},
            }],
        });

        let response = self
            .http
            .post(&self.base_url)
            .header("X-Application-Id", &self.app_id)
            .header("X-Api-Key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: MatrixResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let seconds = body
            .results
            .first()
            .and_then(|r| r.locations.first())
            .and_then(|l| l.properties.travel_time);

        Ok(seconds.map(|s| s / 60))
    }
}

// ---------------------------------------------------------------------------
// Provider B: directions API

/// Default base URL for the directions provider.
const DIRECTIONS_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Configuration for the directions provider client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key query parameter.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DIRECTIONS_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    duration: DirectionsDuration,
}

#[derive(Debug, Deserialize)]
struct DirectionsDuration {
    /// Seconds.
    value: u32,
}

/// Client for the directions provider.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DirectionsClient {
    /// Create a client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

impl TravelTimeProvider for DirectionsClient {
    fn name(&self) -> &'static str {
        "directions"
    }

    async fn travel_minutes(
        &self,
        lat: f64,
        lng: f64,
        departure: DateTime<Utc>,
    ) -> Result<Option<u32>, ProviderError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", format!("{lat},{lng}")),
                ("destination", format!("{HUB_LAT},{HUB_LNG}")),
                ("mode", "transit".to_string()),
                ("transit_mode", "rail".to_string()),
                ("departure_time", departure.timestamp().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let seconds = body
            .routes
            .first()
            .and_then(|r| r.legs.first())
            .map(|l| l.duration.value);

        Ok(seconds.map(|s| s / 60))
    }
}
