//! Amenity gathering: supermarkets, convenience stores and pharmacies.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::geo::distance_meters;

use super::Poi;
use super::error::FetchFailure;
use super::overpass::{OverpassClient, OverpassResponse};
use super::retry::{RetryPolicy, retry_with_backoff};

/// Default search radius around the area's station, in metres.
pub const DEFAULT_AMENITY_RADIUS_M: u32 = 1500;

/// Amenity enrichment result.
///
/// Always fully formed: on failure the lists are empty, `api_success` is
/// false and `error` carries the classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenityReport {
    /// Supermarkets, with convenience stores folded in as secondary
    /// entries (tagged `kind: "convenience"`). Sorted by distance.
    pub supermarkets: Vec<Poi>,

    /// Pharmacies, sorted by distance.
    pub pharmacies: Vec<Poi>,

    /// Restaurants, sorted by distance. Currently never populated by the
    /// query but kept in the schema for report stability.
    pub restaurants: Vec<Poi>,

    pub api_success: bool,

    #[serde(default)]
    pub error: Option<FetchFailure>,
}

impl AmenityReport {
    fn empty() -> Self {
        Self {
            supermarkets: Vec::new(),
            pharmacies: Vec::new(),
            restaurants: Vec::new(),
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

fn amenity_query(lat: f64, lng: f64, radius_m: u32) -> String {
    format!(
        r#"[out:json][timeout:45];
(
  node["shop"="supermarket"](around:{radius_m},{lat},{lng});
  way["shop"="supermarket"](around:{radius_m},{lat},{lng});
  node["shop"="convenience"](around:{radius_m},{lat},{lng});
  node["amenity"="pharmacy"](around:{radius_m},{lat},{lng});
  way["amenity"="pharmacy"](around:{radius_m},{lat},{lng});
);
out center body;"#
    )
}

/// Gather amenity data around a point.
///
/// Never fails to the caller: total query failure yields the zero-value
/// report with `api_success == false`.
pub async fn gather_amenities(
    overpass: &OverpassClient,
    retry: &RetryPolicy,
    lat: f64,
    lng: f64,
    radius_m: u32,
) -> AmenityReport {
    info!("gathering amenities for ({lat}, {lng}) within {radius_m}m");

    let query = amenity_query(lat, lng, radius_m);
    match retry_with_backoff(retry, "amenities", || overpass.query(&query)).await {
        Ok(response) => {
            let report = parse_amenities(&response, lat, lng);
            info!(
                "found {} supermarkets/convenience stores, {} pharmacies",
                report.supermarkets.len(),
                report.pharmacies.len()
            );
            if report.supermarkets.is_empty() {
                // Not a failure: a sparse-data signal worth surfacing.
                warn!("no supermarkets found within {radius_m}m, data may be sparse here");
            }
            report
        }
        Err(err) => {
            error!("failed to gather amenities: {err}");
            AmenityReport::failed(FetchFailure::from(&err))
        }
    }
}

fn parse_amenities(response: &OverpassResponse, lat: f64, lng: f64) -> AmenityReport {
    let mut report = AmenityReport::empty();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for element in &response.elements {
        let name = element
            .tag("name")
            .or_else(|| element.tag("brand"))
            .unwrap_or("Unknown");

        // Deduplicate by name; "Unknown" entries are all kept.
        if name != "Unknown" && !seen_names.insert(name) {
            continue;
        }

        let Some((elem_lat, elem_lng)) = element.position() else {
            continue;
        };

        let poi = Poi {
            name: name.to_string(),
            lat: elem_lat,
            lng: elem_lng,
            distance_m: distance_meters(lat, lng, elem_lat, elem_lng),
            kind: None,
        };

        match (element.tag("shop"), element.tag("amenity")) {
            (Some("supermarket"), _) => report.supermarkets.push(poi),
            (Some("convenience"), _) => report.supermarkets.push(Poi {
                kind: Some("convenience".to_string()),
                ..poi
            }),
            (_, Some("pharmacy")) => report.pharmacies.push(poi),
            _ => {}
        }
    }

    report.supermarkets.sort_by_key(|p| p.distance_m);
    report.pharmacies.sort_by_key(|p| p.distance_m);
    report.restaurants.sort_by_key(|p| p.distance_m);
    report.api_success = true;
    report
}
