use area_scout::commute::{
    CommuteCache, DirectionsClient, DirectionsConfig, MatrixClient, MatrixConfig,
    TravelTimeResolver,
};
use area_scout::config::Criteria;
use area_scout::enrich::{CrimeClient, CrimeClientConfig, OverpassClient, OverpassConfig, RetryPolicy};
use area_scout::pipeline::{discover_areas, explore_area, next_pending_index};
use area_scout::stations::{StationClient, StationDirectory};
use area_scout::zone::ExclusionZone;

/// Default path for the criteria file.
const CRITERIA_PATH: &str = "config/criteria.yaml";

/// Where discovery state lives between runs.
const STATION_SNAPSHOT_PATH: &str = "data/stations.json";
const COMMUTE_CACHE_PATH: &str = "data/commute_times.json";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Scoring criteria, with built-in defaults when no file is present.
    let criteria = match Criteria::load(CRITERIA_PATH) {
        Ok(criteria) => criteria,
        Err(err) => {
            eprintln!("Warning: could not load {CRITERIA_PATH} ({err}), using defaults.");
            Criteria::default()
        }
    };

    // Routing providers are both optional; without either, only cached
    // travel times can be used.
    let matrix = match (
        std::env::var("TRAVELTIME_APP_ID"),
        std::env::var("TRAVELTIME_API_KEY"),
    ) {
        (Ok(app_id), Ok(api_key)) => Some(
            MatrixClient::new(MatrixConfig::new(app_id, api_key))
                .expect("Failed to create matrix client"),
        ),
        _ => {
            eprintln!("Warning: TRAVELTIME_APP_ID/TRAVELTIME_API_KEY not set.");
            None
        }
    };
    let directions = match std::env::var("GOOGLE_MAPS_API_KEY") {
        Ok(api_key) => Some(
            DirectionsClient::new(DirectionsConfig::new(api_key))
                .expect("Failed to create directions client"),
        ),
        Err(_) => {
            eprintln!("Warning: GOOGLE_MAPS_API_KEY not set.");
            None
        }
    };
    let resolver = TravelTimeResolver::new(matrix, directions);

    // Station directory: snapshot, source, or fallback list.
    let station_client = StationClient::new().expect("Failed to create station client");
    let mut directory = StationDirectory::new(STATION_SNAPSHOT_PATH);
    directory.load_or_refresh(&station_client).await;
    println!("Station directory holds {} stations", directory.len());

    let mut cache = CommuteCache::open(COMMUTE_CACHE_PATH);
    let zone = ExclusionZone::builtin();

    let mut areas = discover_areas(&directory, &resolver, &mut cache, &zone, &criteria).await;
    println!("Discovered {} commutable areas:", areas.len());
    for area in &areas {
        println!(
            "  {:<30} {:>3} min  via {}",
            area.name, area.commute_minutes, area.station
        );
    }

    // Explore the next pending area.
    let Some(index) = next_pending_index(&areas, &[]) else {
        println!("Nothing left to explore.");
        return;
    };

    let overpass =
        OverpassClient::new(OverpassConfig::default()).expect("Failed to create Overpass client");
    let crime_client =
        CrimeClient::new(CrimeClientConfig::default()).expect("Failed to create crime client");
    let retry = RetryPolicy::default();

    let record = explore_area(&mut areas[index], &overpass, &crime_client, &retry, &criteria).await;

    println!();
    println!("Explored {} ({})", areas[index].name, record.station);
    println!("  Score:        {}/100", record.score);
    println!(
        "  Supermarkets: {} (amenity data {})",
        record.amenities.supermarkets.len(),
        if record.amenities.api_success { "ok" } else { "unavailable" }
    );
    println!(
        "  Parks:        {} (countryside access: {})",
        record.nature.parks_count, record.nature.countryside_access
    );
    println!(
        "  Crimes/month: {} ({} serious)",
        record.crime.total_crimes, record.crime.serious_crimes
    );
}
