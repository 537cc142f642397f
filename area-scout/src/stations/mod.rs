//! Candidate station directory.
//!
//! Holds the snapshot of GB rail stations used for discovery: refresh
//! from the external source with a hardcoded fallback, radius filtering
//! against a reference point, and nearest-neighbour lookup.

mod client;
mod directory;
mod error;

pub use client::{StationClient, StationDto};
pub use directory::{RankedStation, StationDirectory, fallback_stations};
pub use error::StationError;
