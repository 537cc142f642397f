//! Green-space gathering: parks, gardens, reserves and woodland.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::geo::distance_meters;

use super::Poi;
use super::error::FetchFailure;
use super::overpass::{OverpassClient, OverpassResponse};
use super::retry::{RetryPolicy, retry_with_backoff};

/// Default search radius, in metres. Wider than amenities: green space a
/// short cycle away still counts.
pub const DEFAULT_NATURE_RADIUS_M: u32 = 2000;

/// Parks are capped to the nearest 10 after distance-sorting.
const MAX_PARKS: usize = 10;

/// Reserves are capped to the nearest 5.
const MAX_RESERVES: usize = 5;

/// Green-space enrichment result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatureReport {
    /// Parks and gardens, nearest first, capped to 10.
    pub parks: Vec<Poi>,

    /// Length of the capped parks list.
    pub parks_count: u32,

    /// Nature reserves, forests and woods, nearest first, capped to 5.
    pub nature_reserves: Vec<Poi>,

    /// True when any reserve/forest/wood feature was found.
    pub countryside_access: bool,

    pub api_success: bool,

    #[serde(default)]
    pub error: Option<FetchFailure>,
}

impl NatureReport {
    fn empty() -> Self {
        Self {
            parks: Vec::new(),
            parks_count: 0,
            nature_reserves: Vec::new(),
            countryside_access: false,
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

fn nature_query(lat: f64, lng: f64, radius_m: u32) -> String {
    format!(
        r#"[out:json][timeout:45];
(
  way["leisure"="park"](around:{radius_m},{lat},{lng});
  relation["leisure"="park"](around:{radius_m},{lat},{lng});
  way["leisure"="nature_reserve"](around:{radius_m},{lat},{lng});
  relation["leisure"="nature_reserve"](around:{radius_m},{lat},{lng});
  way["landuse"="forest"](around:{radius_m},{lat},{lng});
  way["leisure"="garden"](around:{radius_m},{lat},{lng});
  way["natural"="wood"](around:{radius_m},{lat},{lng});
);
out center body;"#
    )
}

/// Gather green-space data around a point.
///
/// Never fails to the caller: total query failure yields the zero-value
/// report with `api_success == false`.
pub async fn gather_nature_data(
    overpass: &OverpassClient,
    retry: &RetryPolicy,
    lat: f64,
    lng: f64,
    radius_m: u32,
) -> NatureReport {
    info!("gathering nature data for ({lat}, {lng}) within {radius_m}m");

    let query = nature_query(lat, lng, radius_m);
    match retry_with_backoff(retry, "nature", || overpass.query(&query)).await {
        Ok(response) => {
            let report = parse_nature(&response, lat, lng);
            info!(
                "found {} parks, {} nature reserves",
                report.parks.len(),
                report.nature_reserves.len()
            );
            if report.parks.is_empty() {
                info!("no named parks within {radius_m}m, limited green space here");
            }
            report
        }
        Err(err) => {
            error!("failed to gather nature data: {err}");
            NatureReport::failed(FetchFailure::from(&err))
        }
    }
}

fn parse_nature(response: &OverpassResponse, lat: f64, lng: f64) -> NatureReport {
    let mut report = NatureReport::empty();
    let mut seen_names: HashSet<&str> = HashSet::new();

    for element in &response.elements {
        // An unnamed green space is not a usable amenity.
        let Some(name) = element.tag("name") else {
            continue;
        };
        if !seen_names.insert(name) {
            continue;
        }

        let Some((elem_lat, elem_lng)) = element.position() else {
            continue;
        };

        let leisure = element.tag("leisure");
        let landuse = element.tag("landuse");
        let natural = element.tag("natural");

        let poi = Poi {
            name: name.to_string(),
            lat: elem_lat,
            lng: elem_lng,
            distance_m: distance_meters(lat, lng, elem_lat, elem_lng),
            kind: leisure.or(landuse).or(natural).map(str::to_string),
        };

        if matches!(leisure, Some("park") | Some("garden")) {
            report.parks.push(poi);
        } else if matches!(leisure, Some("nature_reserve"))
            || matches!(landuse, Some("forest"))
            || matches!(natural, Some("wood"))
        {
            report.nature_reserves.push(poi);
            report.countryside_access = true;
        }
    }

    report.parks.sort_by_key(|p| p.distance_m);
    report.parks.truncate(MAX_PARKS);
    report.nature_reserves.sort_by_key(|p| p.distance_m);
    report.nature_reserves.truncate(MAX_RESERVES);
    report.parks_count = report.parks.len() as u32;
    report.api_success = true;
    report
}

#[cfg(test)]
mod tests {
    use super::super::error::FetchError;
    use super::*;

    fn response(json: &str) -> OverpassResponse {
        serde_json::from_str(json).unwrap()
    }

    fn park(name: &str, lat: f64) -> String {
        format!(
            r#"{{"type": "way", "center": {{"lat": {lat}, "lon": -0.33}}, "tags": {{"leisure": "park", "name": "{name}"}}}}"#
        )
    }

    #[test]
    fn parks_and_reserves_are_split() {
        let resp = response(
            r#"{"elements": [
                {"type": "way", "center": {"lat": 51.751, "lon": -0.33}, "tags": {"leisure": "park", "name": "Verulamium Park"}},
                {"type": "way", "center": {"lat": 51.752, "lon": -0.33}, "tags": {"leisure": "garden", "name": "Abbey Gardens"}},
                {"type": "way", "center": {"lat": 51.753, "lon": -0.33}, "tags": {"natural": "wood", "name": "Heartwood"}}
            ]}"#,
        );

        let report = parse_nature(&resp, 51.75, -0.33);

        assert_eq!(report.parks.len(), 2);
        assert_eq!(report.parks_count, 2);
        assert_eq!(report.nature_reserves.len(), 1);
        assert!(report.countryside_access);
        assert_eq!(report.nature_reserves[0].kind.as_deref(), Some("wood"));
    }

    #[test]
    fn unnamed_features_are_discarded() {
        let resp = response(
            r#"{"elements": [
                {"type": "way", "center": {"lat": 51.751, "lon": -0.33}, "tags": {"leisure": "park"}}
            ]}"#,
        );

        let report = parse_nature(&resp, 51.75, -0.33);
        assert!(report.parks.is_empty());
        assert!(report.api_success);
    }

    #[test]
    fn duplicate_names_collapse_to_one() {
        let resp = response(
            r#"{"elements": [
                {"type": "way", "center": {"lat": 51.751, "lon": -0.33}, "tags": {"leisure": "park", "name": "The Common"}},
                {"type": "relation", "center": {"lat": 51.752, "lon": -0.33}, "tags": {"leisure": "park", "name": "The Common"}}
            ]}"#,
        );

        let report = parse_nature(&resp, 51.75, -0.33);
        assert_eq!(report.parks.len(), 1);
    }

    #[test]
    fn parks_capped_to_ten_nearest_and_count_matches() {
        let elements: Vec<String> = (0..14)
            .map(|i| park(&format!("Park {i}"), 51.75 + 0.001 * (i as f64 + 1.0)))
            .collect();
        let resp = response(&format!(r#"{{"elements": [{}]}}"#, elements.join(",")));

        let report = parse_nature(&resp, 51.75, -0.33);

        assert_eq!(report.parks.len(), 10);
        assert_eq!(report.parks_count, 10);
        // Nearest survived the cap.
        assert_eq!(report.parks[0].name, "Park 0");
        assert!(report.parks.windows(2).all(|w| w[0].distance_m <= w[1].distance_m));
    }

    #[test]
    fn no_countryside_without_reserves() {
        let resp = response(&format!(r#"{{"elements": [{}]}}"#, park("Solo Park", 51.751)));
        let report = parse_nature(&resp, 51.75, -0.33);
        assert!(!report.countryside_access);
    }

    #[test]
    fn failed_report_is_schema_complete() {
        let report = NatureReport::failed(FetchFailure::from(&FetchError::Status(503)));
        assert!(!report.api_success);
        assert_eq!(report.parks_count, 0);
        assert!(report.parks.is_empty());
        assert!(report.nature_reserves.is_empty());
        assert!(!report.countryside_access);
        assert!(report.error.is_some());
    }
}
