//! Commute-belt exclusion filter.
//!
//! Classifies a candidate location as inside the central-hub metro area
//! (excluded) or outside it (a genuine commuter-belt candidate). The test
//! is a deliberately permissive heuristic: a keyword-substring match on the
//! area or station name, or raw distance to the hub. It is approximate by
//! design; the keyword list is data, not logic, so it can be supplied from
//! configuration when the hand-maintained builtin drifts.

use serde::{Deserialize, Serialize};

use crate::geo::distance_km;
use crate::{HUB_LAT, HUB_LNG};

/// Name substrings marking central-London locations: borough names, inner
/// districts and termini. Matched case-insensitively.
const BUILTIN_KEYWORDS: &[&str] = &[
    "london",
    // Inner boroughs
    "westminster",
    "camden",
    "islington",
    "hackney",
    "tower hamlets",
    "greenwich",
    "lewisham",
    "southwark",
    "lambeth",
    "wandsworth",
    "hammersmith",
    "fulham",
    "kensington",
    "chelsea",
    // Outer boroughs
    "brent",
    "ealing",
    "hounslow",
    "richmond",
    "kingston",
    "merton",
    "sutton",
    "croydon",
    "bromley",
    "bexley",
    "havering",
    "barking",
    "dagenham",
    "redbridge",
    "newham",
    "waltham forest",
    "walthamstow",
    "haringey",
    "enfield",
    "barnet",
    "harrow",
    "hillingdon",
    // Districts and termini
    "euston",
    "paddington",
    "marylebone",
    "victoria",
    "waterloo",
    "liverpool street",
    "fenchurch",
    "moorgate",
    "cannon street",
    "charing cross",
    "blackfriars",
    "farringdon",
    "holborn",
    "angel",
    "old street",
    "shoreditch",
    "whitechapel",
    "bethnal green",
    "mile end",
    "bow",
    "poplar",
    "canary wharf",
    "docklands",
    "stratford",
    "leyton",
    "ilford",
    "tottenham",
    "wood green",
    "finsbury",
    "highbury",
    "dalston",
    "hampstead",
    "highgate",
    "kilburn",
    "willesden",
    "wembley",
    "acton",
    "chiswick",
    "brixton",
    "clapham",
    "balham",
    "tooting",
    "streatham",
    "peckham",
    "deptford",
    "catford",
    "putney",
    "wimbledon",
    "morden",
    "woolwich",
    "eltham",
];

fn default_min_distance_km() -> f64 {
    15.0
}

/// The hub's metro exclusion zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionZone {
    /// Case-insensitive substrings matched against area and station names.
    keywords: Vec<String>,

    /// Locations closer than this to the hub are excluded regardless of
    /// name.
    #[serde(default = "default_min_distance_km")]
    min_distance_km: f64,
}

impl ExclusionZone {
    /// Construct from an explicit keyword list and distance threshold.
    pub fn new(keywords: Vec<String>, min_distance_km: f64) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
            min_distance_km,
        }
    }

    /// The builtin keyword list with the default 15 km threshold.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            default_min_distance_km(),
        )
    }

    /// True if the location lies inside the exclusion zone.
    ///
    /// Either name matching a keyword excludes it, as does being within
    /// the distance threshold of the hub whatever it is called.
    pub fn is_in_zone(&self, name: &str, station_name: &str, lat: f64, lng: f64) -> bool {
        let name = name.to_lowercase();
        let station_name = station_name.to_lowercase();

        if self
            .keywords
            .iter()
            .any(|k| name.contains(k.as_str()) || station_name.contains(k.as_str()))
        {
            return true;
        }

        distance_km(HUB_LAT, HUB_LNG, lat, lng) < self.min_distance_km
    }

    /// Number of keywords carried (for diagnostics).
    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for ExclusionZone {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn london_bridge_excluded_by_name_at_any_distance() {
        let zone = ExclusionZone::builtin();
        // Coordinates far outside the distance threshold; the name alone
        // must exclude it.
        assert!(zone.is_in_zone("London Bridge", "London Bridge", 55.0, -3.0));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let zone = ExclusionZone::builtin();
        assert!(zone.is_in_zone("CLAPHAM JUNCTION", "Clapham Junction", 51.46, -0.17));
    }

    #[test]
    fn station_name_alone_can_exclude() {
        let zone = ExclusionZone::builtin();
        assert!(zone.is_in_zone("Somewhere", "Wimbledon", 52.5, -1.0));
    }

    #[test]
    fn nearby_station_excluded_by_distance_regardless_of_name() {
        let zone = ExclusionZone::builtin();
        // Norbury: no keyword hit, but ~13 km from King's Cross.
        assert!(zone.is_in_zone("Norbury", "Norbury", 51.4113, -0.1221));
    }

    #[test]
    fn commuter_belt_station_passes() {
        let zone = ExclusionZone::builtin();
        // St Albans: ~30 km out, no keyword match.
        assert!(!zone.is_in_zone("St Albans", "St Albans City", 51.75, -0.3275));
    }

    #[test]
    fn custom_threshold_respected() {
        let zone = ExclusionZone::new(vec![], 50.0);
        assert!(zone.is_in_zone("St Albans", "St Albans City", 51.75, -0.3275));
        let tight = ExclusionZone::new(vec![], 1.0);
        assert!(!tight.is_in_zone("St Albans", "St Albans City", 51.75, -0.3275));
    }

    #[test]
    fn builtin_list_is_substantial() {
        assert!(ExclusionZone::builtin().keyword_count() >= 80);
    }
}
