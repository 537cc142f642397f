//! Crime statistics from the UK street-crime incident feed.
//!
//! The feed covers a roughly 1-mile radius around the queried point for
//! the most recent reporting month it has; the feed, not the caller,
//! determines the month.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::error::{FetchError, FetchFailure};
use super::retry::{RetryPolicy, retry_with_backoff};

/// Default base URL for the crime incident feed.
const DEFAULT_BASE_URL: &str = "https://data.police.uk/api";

/// Categories weighted as serious for the safety score.
const SERIOUS_CATEGORIES: &[&str] = &[
    "violent-crime",
    "violence-and-sexual-offences",
    "robbery",
    "possession-of-weapons",
    "public-order",
];

/// Property-crime categories.
const PROPERTY_CATEGORIES: &[&str] = &[
    "burglary",
    "theft-from-the-person",
    "vehicle-crime",
    "bicycle-theft",
    "shoplifting",
    "other-theft",
];

/// Configuration for the crime feed client.
#[derive(Debug, Clone)]
pub struct CrimeClientConfig {
    /// Base URL for the feed.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl CrimeClientConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for CrimeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// A single incident record from the feed.
#[derive(Debug, Clone, Deserialize)]
pub struct CrimeIncident {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub month: Option<String>,
}

fn default_category() -> String {
    "other-crime".to_string()
}

/// Client for the street-crime feed.
#[derive(Debug, Clone)]
pub struct CrimeClient {
    http: reqwest::Client,
    base_url: String,
}

impl CrimeClient {
    /// Create a client with the given configuration.
    pub fn new(config: CrimeClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch all incidents around a point.
    pub async fn fetch_incidents(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<CrimeIncident>, FetchError> {
        let url = format!("{}/crimes-street/all-crime", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("lat", lat.to_string()), ("lng", lng.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<CrimeIncident>>()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}

/// Crime enrichment result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimeReport {
    pub total_crimes: u32,

    /// Incident counts per feed category.
    pub crimes_by_category: BTreeMap<String, u32>,

    /// Sum over the serious-category set.
    pub serious_crimes: u32,

    /// Sum over the property-category set.
    pub property_crimes: u32,

    /// Count for the single anti-social-behaviour category.
    pub antisocial_behaviour: u32,

    /// Reporting month, as stated by the feed (first month value seen).
    pub month: Option<String>,

    pub api_success: bool,

    #[serde(default)]
    pub error: Option<FetchFailure>,
}

impl CrimeReport {
    fn empty() -> Self {
        Self {
            total_crimes: 0,
            crimes_by_category: BTreeMap::new(),
            serious_crimes: 0,
            property_crimes: 0,
            antisocial_behaviour: 0,
            month: None,
            api_success: false,
            error: None,
        }
    }

    /// The zero-value shape for a total fetch failure.
    pub fn failed(failure: FetchFailure) -> Self {
        Self {
            error: Some(failure),
            ..Self::empty()
        }
    }
}

/// Gather crime statistics around a point.
///
/// Never fails to the caller: total feed failure yields the zero-value
/// report with `api_success == false`.
pub async fn gather_crime_data(
    client: &CrimeClient,
    retry: &RetryPolicy,
    lat: f64,
    lng: f64,
) -> CrimeReport {
    info!("gathering crime data for ({lat}, {lng})");

    match retry_with_backoff(retry, "crime", || client.fetch_incidents(lat, lng)).await {
        Ok(incidents) => {
            let report = aggregate_incidents(&incidents);
            info!(
                "found {} crimes in {}: {} serious, {} property, {} antisocial",
                report.total_crimes,
                report.month.as_deref().unwrap_or("unknown month"),
                report.serious_crimes,
                report.property_crimes,
                report.antisocial_behaviour
            );
            report
        }
        Err(err) => {
            error!("failed to gather crime data: {err}");
            CrimeReport::failed(FetchFailure::from(&err))
        }
    }
}

fn aggregate_incidents(incidents: &[CrimeIncident]) -> CrimeReport {
    let mut report = CrimeReport::empty();

    for incident in incidents {
        *report
            .crimes_by_category
            .entry(incident.category.clone())
            .or_insert(0) += 1;

        if report.month.is_none() {
            report.month = incident.month.clone();
        }
    }

    report.total_crimes = incidents.len() as u32;
    report.serious_crimes = sum_categories(&report.crimes_by_category, SERIOUS_CATEGORIES);
    report.property_crimes = sum_categories(&report.crimes_by_category, PROPERTY_CATEGORIES);
    report.antisocial_behaviour = report
        .crimes_by_category
        .get("anti-social-behaviour")
        .copied()
        .unwrap_or(0);
    report.api_success = true;
    report
}

fn sum_categories(counts: &BTreeMap<String, u32>, categories: &[&str]) -> u32 {
    categories
        .iter()
        .filter_map(|c| counts.get(*c))
        .sum()
}
