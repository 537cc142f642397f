//! Station directory: point-in-time snapshot with spatial queries.
//!
//! A directory is loaded once per process, either from a persisted
//! snapshot or by querying the external source. Source failures degrade
//! to a hardcoded fallback list; after `load_or_refresh` the directory is
//! never empty.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::geo::{distance_km, distance_km_rounded};

use super::client::{StationClient, StationDto};
use super::error::StationError;

/// Walking speed assumed when estimating station access time, km/h.
const WALKING_SPEED_KMH: f64 = 5.0;

/// A station annotated with its distance from a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedStation {
    pub station: StationDto,

    /// Great-circle distance from the query point, km, one decimal.
    pub distance_km: f64,
}

impl RankedStation {
    /// Walking time estimate from the query point to the station, in
    /// whole minutes at 5 km/h.
    pub fn walking_minutes(&self) -> u32 {
        (self.distance_km / WALKING_SPEED_KMH * 60.0) as u32
    }
}

/// Snapshot directory of candidate rail stations.
#[derive(Debug)]
pub struct StationDirectory {
    snapshot_path: PathBuf,
    stations: Vec<StationDto>,
}

impl StationDirectory {
    /// Create an empty directory backed by the given snapshot path.
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            stations: Vec::new(),
        }
    }

    /// Load the persisted snapshot, or query the source and persist the
    /// result. A source failure substitutes the fallback list, which is
    /// persisted instead; the directory is never empty afterwards.
    pub async fn load_or_refresh(&mut self, client: &StationClient) {
        if let Some(stations) = self.load_snapshot() {
            info!("loaded {} stations from snapshot", stations.len());
            self.stations = stations;
            return;
        }
        self.refresh(client).await;
    }

    /// Query the external source, persisting the result. Falls back to
    /// the hardcoded list when the source fails or returns nothing.
    pub async fn refresh(&mut self, client: &StationClient) {
        match client.fetch_all().await {
            Ok(stations) if !stations.is_empty() => {
                self.stations = stations;
            }
            Ok(_) => {
                warn!("station source returned no stations, using fallback list");
                self.stations = fallback_stations();
            }
            Err(err) => {
                error!("station refresh failed ({err}), using fallback list");
                self.stations = fallback_stations();
            }
        }

        if let Err(err) = self.save_snapshot() {
            warn!("could not persist station snapshot: {err}");
        }
    }

    fn load_snapshot(&self) -> Option<Vec<StationDto>> {
        let contents = std::fs::read_to_string(&self.snapshot_path).ok()?;
        let stations: Vec<StationDto> = serde_json::from_str(&contents).ok()?;
        (!stations.is_empty()).then_some(stations)
    }

    fn save_snapshot(&self) -> Result<(), StationError> {
        if let Some(parent) = self.snapshot_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StationError::Snapshot {
                message: format!("failed to create snapshot directory: {e}"),
            })?;
        }

        let json =
            serde_json::to_string_pretty(&self.stations).map_err(|e| StationError::Snapshot {
                message: format!("failed to serialize snapshot: {e}"),
            })?;

        std::fs::write(&self.snapshot_path, json).map_err(|e| StationError::Snapshot {
            message: format!("failed to write snapshot: {e}"),
        })?;

        info!(
            "saved {} stations to {}",
            self.stations.len(),
            self.snapshot_path.display()
        );
        Ok(())
    }

    /// All stations within `radius_km` of a reference point, annotated
    /// with distance and sorted nearest-first.
    pub fn stations_within_radius(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Vec<RankedStation> {
        let mut nearby: Vec<RankedStation> = self
            .stations
            .iter()
            .filter_map(|s| {
                // Filter on the exact distance; the rounded value is only
                // the display annotation.
                let exact = distance_km(lat, lng, s.lat, s.lng);
                (exact <= radius_km).then(|| RankedStation {
                    station: s.clone(),
                    distance_km: distance_km_rounded(lat, lng, s.lat, s.lng),
                })
            })
            .collect();

        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby
    }

    /// The nearest station to a point, or `None` for an empty directory.
    pub fn nearest(&self, lat: f64, lng: f64) -> Option<RankedStation> {
        self.stations
            .iter()
            .map(|s| RankedStation {
                station: s.clone(),
                distance_km: distance_km_rounded(lat, lng, s.lat, s.lng),
            })
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }

    /// Number of stations in the snapshot.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the directory holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// The snapshot file path.
    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }
}

/// Minimal hardcoded list of well-known commuter stations, used when the
/// external source is unavailable.
pub fn fallback_stations() -> Vec<StationDto> {
    fn station(name: &str, lat: f64, lng: f64, town: &str) -> StationDto {
        StationDto {
            name: name.to_string(),
            lat,
            lng,
            town: Some(town.to_string()),
            operator: None,
            network: None,
        }
    }

    vec![
        station("St Albans City", 51.7500, -0.3275, "St Albans"),
        station("Hitchin", 51.9467, -0.2604, "Hitchin"),
        station("Stevenage", 51.9019, -0.2065, "Stevenage"),
        station("Welwyn Garden City", 51.8014, -0.2033, "Welwyn Garden City"),
        station("Hatfield", 51.7636, -0.2155, "Hatfield"),
        station("Potters Bar", 51.6981, -0.1803, "Potters Bar"),
        station("Luton", 51.8822, -0.4147, "Luton"),
        station("Bedford", 52.1361, -0.4797, "Bedford"),
        station("Cambridge", 52.1943, 0.1376, "Cambridge"),
        station("Peterborough", 52.5750, -0.2486, "Peterborough"),
    ]
}
