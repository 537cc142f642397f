//! External station source client.
//!
//! Fetches GB National Rail stations from an Overpass-style spatial query
//! service, reusing the enrichment client (and its mirror fallback) with a
//! longer timeout — the whole-country query is slow.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::enrich::{OverpassClient, OverpassConfig};

use super::error::StationError;

/// Timeout for the whole-country station query, in seconds.
const STATION_QUERY_TIMEOUT_SECS: u64 = 120;

/// Overpass query for GB rail stations on recognised national networks.
const STATION_QUERY: &str = r#"[out:json][timeout:120];
area["ISO3166-1"="GB"]->.uk;
(
  node["railway"="station"]["network"~"National Rail|Transport for Wales|ScotRail|Northern|Southeastern|Southern|Thameslink|Great Western|CrossCountry|LNER|TransPennine|Avanti"](area.uk);
);
out body;"#;

/// A rail station as held by the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDto {
    /// Station name. Not guaranteed unique across operators.
    pub name: String,

    pub lat: f64,
    pub lng: f64,

    #[serde(default)]
    pub town: Option<String>,

    #[serde(default)]
    pub operator: Option<String>,

    #[serde(default)]
    pub network: Option<String>,
}

/// Client for the external station source.
#[derive(Debug, Clone)]
pub struct StationClient {
    overpass: OverpassClient,
}

impl StationClient {
    /// Create a client against the default mirrors.
    pub fn new() -> Result<Self, StationError> {
        let overpass = OverpassClient::new(OverpassConfig::new(STATION_QUERY_TIMEOUT_SECS))
            .map_err(StationError::Fetch)?;
        Ok(Self { overpass })
    }

    /// Create a client with a custom Overpass configuration (for testing).
    pub fn with_config(config: OverpassConfig) -> Result<Self, StationError> {
        let overpass = OverpassClient::new(config).map_err(StationError::Fetch)?;
        Ok(Self { overpass })
    }

    /// Fetch all GB rail stations from the source.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        info!("fetching GB rail stations from spatial query service");

        let response = self
            .overpass
            .query(STATION_QUERY)
            .await
            .map_err(StationError::Fetch)?;

        let stations: Vec<StationDto> = response
            .elements
            .iter()
            .filter(|e| e.element_type == "node")
            .filter_map(|e| {
                let (lat, lng) = e.position()?;
                Some(StationDto {
                    name: e.tag("name").unwrap_or("Unknown").to_string(),
                    lat,
                    lng,
                    town: e
                        .tag("addr:city")
                        .or_else(|| e.tag("addr:town"))
                        .map(str::to_string),
                    operator: e.tag("operator").map(str::to_string),
                    network: e.tag("network").map(str::to_string),
                })
            })
            .collect();

        info!("fetched {} stations", stations.len());
        Ok(stations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::OverpassResponse;

    #[test]
    fn station_query_targets_gb_rail() {
        assert!(STATION_QUERY.contains(r#""railway"="station""#));
        assert!(STATION_QUERY.contains(r#""ISO3166-1"="GB""#));
        assert!(STATION_QUERY.contains("National Rail"));
    }

    #[test]
    fn node_elements_become_stations() {
        let response: OverpassResponse = serde_json::from_str(
            r#"{"elements": [
                {"type": "node", "lat": 51.75, "lon": -0.3275,
                 "tags": {"name": "St Albans City", "addr:city": "St Albans", "network": "Thameslink"}},
                {"type": "way", "center": {"lat": 51.0, "lon": 0.0}, "tags": {"name": "Not a node"}}
            ]}"#,
        )
        .unwrap();

        let stations: Vec<StationDto> = response
            .elements
            .iter()
            .filter(|e| e.element_type == "node")
            .filter_map(|e| {
                let (lat, lng) = e.position()?;
                Some(StationDto {
                    name: e.tag("name").unwrap_or("Unknown").to_string(),
                    lat,
                    lng,
                    town: e.tag("addr:city").map(str::to_string),
                    operator: None,
                    network: e.tag("network").map(str::to_string),
                })
            })
            .collect();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "St Albans City");
        assert_eq!(stations[0].town.as_deref(), Some("St Albans"));
    }

    #[test]
    fn station_dto_serde_roundtrip_tolerates_missing_metadata() {
        let json = r#"{"name": "Hitchin", "lat": 51.9467, "lng": -0.2604}"#;
        let dto: StationDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.town, None);
        assert_eq!(dto.operator, None);
    }
}
