//! Discovery and exploration orchestration.
//!
//! Discovery: candidate stations near London, annotated with a travel
//! time (cache-or-fetch, with accepted values committed to the cache),
//! filtered through the exclusion zone, become pending areas. Exploration:
//! one area gets the three enrichment queries, a composite score, and an
//! explored status. Everything runs sequentially; callers own persistence
//! of the results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::area::{Area, ExplorationStatus};
use crate::commute::{CommuteCache, TravelTimeProvider, TravelTimeResolver};
use crate::config::Criteria;
use crate::enrich::{
    AmenityReport, CrimeClient, CrimeReport, DEFAULT_AMENITY_RADIUS_M, DEFAULT_NATURE_RADIUS_M,
    NatureReport, OverpassClient, RetryPolicy, gather_amenities, gather_crime_data,
    gather_nature_data,
};
use crate::routes::route_info;
use crate::stations::StationDirectory;
use crate::zone::ExclusionZone;
use crate::{LONDON_LAT, LONDON_LNG};

/// Geographic pre-filter radius for candidate stations, km from central
/// London.
const CANDIDATE_RADIUS_KM: f64 = 150.0;

/// Discover commutable areas from the station directory.
///
/// Stations with no resolvable travel time are skipped entirely rather
/// than guessed at. Freshly resolved times are committed to the cache so
/// later runs skip the providers. The result is sorted by total commute,
/// fastest first.
pub async fn discover_areas<A, B>(
    directory: &StationDirectory,
    resolver: &TravelTimeResolver<A, B>,
    cache: &mut CommuteCache,
    zone: &ExclusionZone,
    criteria: &Criteria,
) -> Vec<Area>
where
    A: TravelTimeProvider,
    B: TravelTimeProvider,
{
    let walking_buffer = criteria.commute.walking_buffer_minutes;
    let effective_max = criteria.commute.max_minutes.saturating_sub(walking_buffer);

    let candidates = directory.stations_within_radius(LONDON_LAT, LONDON_LNG, CANDIDATE_RADIUS_KM);
    info!(
        "checking {} candidate stations within {CANDIDATE_RADIUS_KM} km (effective train-time limit {effective_max} min)",
        candidates.len()
    );

    let mut areas = Vec::new();

    for (i, candidate) in candidates.iter().enumerate() {
        if (i + 1) % 50 == 0 {
            info!("checked {}/{} stations", i + 1, candidates.len());
        }

        let station = &candidate.station;
        let was_cached = cache.get(&station.name).is_some();

        let Some(train_minutes) = resolver
            .resolve(cache, &station.name, station.lat, station.lng)
            .await
        else {
            debug!("no travel time for {}, cannot evaluate", station.name);
            continue;
        };

        if !was_cached
            && let Err(err) = cache.insert(&station.name, train_minutes)
        {
            warn!("could not commit travel time for {}: {err}", station.name);
        }

        if train_minutes > effective_max {
            continue;
        }

        let name = station
            .town
            .clone()
            .unwrap_or_else(|| station.name.trim_end_matches(" Station").to_string());

        if zone.is_in_zone(&name, &station.name, station.lat, station.lng) {
            debug!("{} is inside the exclusion zone", station.name);
            continue;
        }

        let route = route_info(&station.name);

        areas.push(Area {
            name,
            station: station.name.clone(),
            commute_minutes: train_minutes + walking_buffer,
            train_minutes,
            lat: station.lat,
            lng: station.lng,
            status: ExplorationStatus::Pending,
            explored_at: None,
            score: None,
            mainline_changes: Some(route.mainline_changes),
            route_summary: Some(route.summary.to_string()),
        });
    }

    areas.sort_by_key(|a| a.commute_minutes);
    info!("found {} commutable areas", areas.len());
    areas
}

/// Everything gathered while exploring one area; the caller persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationRecord {
    pub explored_at: DateTime<Utc>,
    pub station: String,
    pub commute_minutes: u32,
    pub amenities: AmenityReport,
    pub nature: NatureReport,
    pub crime: CrimeReport,
    pub score: u8,
}

/// Explore an area: run the three gatherers, score, and mark explored.
///
/// Gatherer failures degrade the corresponding category to its neutral
/// default; they never abort the exploration.
pub async fn explore_area(
    area: &mut Area,
    overpass: &OverpassClient,
    crime_client: &CrimeClient,
    retry: &RetryPolicy,
    criteria: &Criteria,
) -> ExplorationRecord {
    info!(
        "exploring {} (station {}, {} min to hub)",
        area.name, area.station, area.commute_minutes
    );

    let amenities =
        gather_amenities(overpass, retry, area.lat, area.lng, DEFAULT_AMENITY_RADIUS_M).await;
    let nature =
        gather_nature_data(overpass, retry, area.lat, area.lng, DEFAULT_NATURE_RADIUS_M).await;
    let crime = gather_crime_data(crime_client, retry, area.lat, area.lng).await;

    let score = crate::scoring::score_area(area, &amenities, &nature, Some(&crime), criteria);
    info!("{} scores {score}/100", area.name);

    let now = Utc::now();
    area.mark_explored(score, now.date_naive());

    ExplorationRecord {
        explored_at: now,
        station: area.station.clone(),
        commute_minutes: area.commute_minutes,
        amenities,
        nature,
        crime,
        score,
    }
}

/// Index of the next area to explore: priority names first (in order),
/// then the first pending area.
pub fn next_pending_index(areas: &[Area], priority: &[String]) -> Option<usize> {
    for name in priority {
        let hit = areas
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name) && a.is_pending());
        if hit.is_some() {
            return hit;
        }
    }

    areas.iter().position(Area::is_pending)
}
