//! Postcode lookup: forward (postcode to coordinates) and reverse.
//!
//! The one piece of geocoding the pipeline needs, for spot-checking a
//! specific address. Lookup misses and transport failures both come back
//! as `None`; failures are logged, never raised.

use serde::Deserialize;
use tracing::warn;

/// Default base URL for the postcode service.
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Configuration for the postcode client.
#[derive(Debug, Clone)]
pub struct PostcodeClientConfig {
    /// Base URL for the service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl PostcodeClientConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for PostcodeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// A resolved postcode location.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeLocation {
    pub lat: f64,
    pub lng: f64,
    /// Ward or parish name, when the service knows it.
    pub town: Option<String>,
    pub district: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ForwardResponse {
    #[serde(default)]
    status: u16,
    result: Option<ForwardResult>,
}

#[derive(Debug, Deserialize)]
struct ForwardResult {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin_ward: Option<String>,
    #[serde(default)]
    parish: Option<String>,
    #[serde(default)]
    admin_district: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    result: Option<Vec<ReverseResult>>,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    postcode: String,
}

/// Client for the postcode service.
#[derive(Debug, Clone)]
pub struct PostcodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostcodeClient {
    /// Create a client with the given configuration.
    pub fn new(config: PostcodeClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Resolve a UK postcode to coordinates.
    ///
    /// Whitespace is stripped and case normalised before lookup. Returns
    /// `None` for unknown postcodes and for transport failures alike.
    pub async fn lookup(&self, postcode: &str) -> Option<PostcodeLocation> {
        let cleaned: String = postcode
            .trim()
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let url = format!("{}/postcodes/{cleaned}", self.base_url);
        let response = match self.fetch_forward(&url).await {
            Ok(response) => response,
            Err(err) => {
                warn!("postcode lookup failed for {cleaned}: {err}");
                return None;
            }
        };

        if response.status != 200 {
            return None;
        }

        response.result.map(|r| PostcodeLocation {
            lat: r.latitude,
            lng: r.longitude,
            town: r.admin_ward.or(r.parish),
            district: r.admin_district,
        })
    }

    /// Reverse geocode coordinates to the nearest postcode.
    pub async fn reverse(&self, lat: f64, lng: f64) -> Option<String> {
        let url = format!("{}/postcodes", self.base_url);
        let response = match self.fetch_reverse(&url, lat, lng).await {
            Ok(response) => response,
            Err(err) => {
                warn!("reverse geocode failed for ({lat}, {lng}): {err}");
                return None;
            }
        };

        response
            .result
            .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0).postcode))
    }

    async fn fetch_forward(&self, url: &str) -> Result<ForwardResponse, reqwest::Error> {
        self.http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn fetch_reverse(
        &self,
        url: &str,
        lat: f64,
        lng: f64,
    ) -> Result<ReverseResponse, reqwest::Error> {
        self.http
            .get(url)
            .query(&[
                ("lon", lng.to_string()),
                ("lat", lat.to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_response_parses() {
        let response: ForwardResponse = serde_json::from_str(
            r#"{"status": 200, "result": {
                "latitude": 51.7520, "longitude": -0.3390,
                "admin_ward": "St Peters", "admin_district": "St Albans"
            }}"#,
        )
        .unwrap();

        assert_eq!(response.status, 200);
        let result = response.result.unwrap();
        assert_eq!(result.admin_ward.as_deref(), Some("St Peters"));
        assert_eq!(result.parish, None);
    }

    #[test]
    fn forward_miss_has_no_result() {
        let response: ForwardResponse =
            serde_json::from_str(r#"{"status": 404, "error": "Postcode not found"}"#).unwrap();
        assert!(response.result.is_none());
    }

    #[test]
    fn reverse_response_parses() {
        let response: ReverseResponse =
            serde_json::from_str(r#"{"result": [{"postcode": "AL1 1AA"}]}"#).unwrap();
        assert_eq!(response.result.unwrap()[0].postcode, "AL1 1AA");
    }

    #[test]
    fn reverse_null_result_parses() {
        let response: ReverseResponse = serde_json::from_str(r#"{"result": null}"#).unwrap();
        assert!(response.result.is_none());
    }
}
