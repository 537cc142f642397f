//! Area enrichment: amenity, green-space and crime gathering.
//!
//! Each gatherer queries an external open-data service under the shared
//! retry policy and returns a schema-complete report. Gatherers never
//! propagate errors to the pipeline: a total failure becomes a report with
//! `api_success == false`, zero counts and empty lists.

mod amenities;
mod crime;
mod error;
mod nature;
mod overpass;
mod retry;

pub use amenities::{AmenityReport, DEFAULT_AMENITY_RADIUS_M, gather_amenities};
pub use crime::{CrimeClient, CrimeClientConfig, CrimeReport, gather_crime_data};
pub use error::{FailureKind, FetchError, FetchFailure};
pub use nature::{DEFAULT_NATURE_RADIUS_M, NatureReport, gather_nature_data};
pub use overpass::{DEFAULT_ENDPOINTS, OverpassClient, OverpassConfig, OverpassResponse};
pub use retry::{RetryPolicy, retry_with_backoff};

use serde::{Deserialize, Serialize};

/// A named point of interest with its distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub lat: f64,
    pub lng: f64,

    /// Great-circle distance from the queried point, in metres.
    pub distance_m: u32,

    /// Feature subtype where it matters (e.g. "convenience" for stores
    /// counted as secondary supermarkets, or the green-space kind).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}
