//! Overpass spatial-query client with mirror fallback.
//!
//! Two independent mirrors are tried in order on every attempt; the first
//! success short-circuits. Only when the whole endpoint list fails does
//! the error reach the retry policy.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, warn};

use super::error::FetchError;

/// Public Overpass mirrors, tried in order.
pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
];

/// Configuration for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Mirror endpoints, tried in order.
    pub endpoints: Vec<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl OverpassConfig {
    /// Default mirrors with the given timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| (*e).to_string()).collect(),
            timeout_secs,
        }
    }

    /// Replace the endpoint list (for testing).
    pub fn with_endpoints(mut self, endpoints: Vec<String>) -> Self {
        self.endpoints = endpoints;
        self
    }
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self::new(45)
    }
}

/// A feature returned by an Overpass query.
///
/// Nodes carry coordinates directly; ways and relations carry a
/// centre-point when the query asks for `out center`.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub element_type: String,

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    pub center: Option<Center>,

    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Centre-point of an area feature.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Resolvable coordinates: the centre for area features, the direct
    /// position for nodes. `None` means the feature is unusable.
    pub fn position(&self) -> Option<(f64, f64)> {
        if let Some(center) = self.center {
            return Some((center.lat, center.lon));
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Look up a tag value.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Body of an Overpass response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// HTTP client for Overpass-style spatial query services.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    endpoints: Vec<String>,
}

impl OverpassClient {
    /// Create a client with the given configuration.
    pub fn new(config: OverpassConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            http,
            endpoints: config.endpoints,
        })
    }

    /// Run a query, falling back across mirrors.
    ///
    /// Returns the first mirror's successful response; if every mirror
    /// fails, the last error is returned for the retry policy to judge.
    pub async fn query(&self, ql: &str) -> Result<OverpassResponse, FetchError> {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            debug!("trying Overpass endpoint {endpoint}");
            match self.query_endpoint(endpoint, ql).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("Overpass endpoint {endpoint} failed: {err}");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Other("no endpoints configured".into())))
    }

    async fn query_endpoint(
        &self,
        endpoint: &str,
        ql: &str,
    ) -> Result<OverpassResponse, FetchError> {
        let response = self.http.post(endpoint).form(&[("data", ql)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<OverpassResponse>()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
