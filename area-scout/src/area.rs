//! Candidate-area domain types.
//!
//! An [`Area`] is a commuter-belt location produced by the discovery
//! pipeline. Exploration is monotonic: areas are mutated in place when
//! explored (status transition plus score) and never deleted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Exploration lifecycle state of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplorationStatus {
    /// Discovered, not yet enriched or scored.
    Pending,
    /// Enriched and scored.
    Explored,
    /// Deliberately excluded by the operator.
    Skipped,
}

/// A candidate commuter-belt area anchored to a rail station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    /// Area name, usually the town or ward.
    pub name: String,

    /// Name of the anchoring station.
    pub station: String,

    /// Total door-to-hub commute: train time plus walking buffer.
    pub commute_minutes: u32,

    /// Train time alone.
    pub train_minutes: u32,

    pub lat: f64,
    pub lng: f64,

    pub status: ExplorationStatus,

    /// Date exploration completed, if it has.
    #[serde(default)]
    pub explored_at: Option<NaiveDate>,

    /// Composite score (0-100), assigned at exploration.
    #[serde(default)]
    pub score: Option<u8>,

    /// Train changes required on the mainline segment to the hub.
    /// Zero means a direct service; `None` means route data is unknown.
    #[serde(default)]
    pub mainline_changes: Option<u32>,

    /// Human-readable summary of the route to the hub.
    #[serde(default)]
    pub route_summary: Option<String>,
}

impl Area {
    /// Mark this area explored with the given score.
    pub fn mark_explored(&mut self, score: u8, date: NaiveDate) {
        self.status = ExplorationStatus::Explored;
        self.score = Some(score);
        self.explored_at = Some(date);
    }

    /// Whether this area is still awaiting exploration.
    pub fn is_pending(&self) -> bool {
        self.status == ExplorationStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_area() -> Area {
        Area {
            name: "St Albans".to_string(),
            station: "St Albans City".to_string(),
            commute_minutes: 30,
            train_minutes: 20,
            lat: 51.75,
            lng: -0.3275,
            status: ExplorationStatus::Pending,
            explored_at: None,
            score: None,
            mainline_changes: Some(0),
            route_summary: None,
        }
    }

    #[test]
    fn mark_explored_sets_all_fields() {
        let mut area = sample_area();
        let date = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        area.mark_explored(82, date);

        assert_eq!(area.status, ExplorationStatus::Explored);
        assert_eq!(area.score, Some(82));
        assert_eq!(area.explored_at, Some(date));
        assert!(!area.is_pending());
    }

    #[test]
    fn explored_area_roundtrips_through_json() {
        let mut area = sample_area();
        area.mark_explored(82, NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());

        let json = serde_json::to_string(&area).unwrap();
        let back: Area = serde_json::from_str(&json).unwrap();

        assert_eq!(back.explored_at, area.explored_at);
        assert_eq!(back.score, Some(82));
        assert_eq!(back.status, ExplorationStatus::Explored);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ExplorationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let status: ExplorationStatus = serde_json::from_str("\"explored\"").unwrap();
        assert_eq!(status, ExplorationStatus::Explored);
    }

    #[test]
    fn optional_fields_default_on_deserialize() {
        let json = r#"{
            "name": "Hitchin",
            "station": "Hitchin",
            "commute_minutes": 45,
            "train_minutes": 35,
            "lat": 51.9467,
            "lng": -0.2604,
            "status": "pending"
        }"#;
        let area: Area = serde_json::from_str(json).unwrap();
        assert_eq!(area.score, None);
        assert_eq!(area.mainline_changes, None);
        assert_eq!(area.explored_at, None);
    }
}
