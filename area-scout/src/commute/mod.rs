//! Travel-time resolution to the hub.
//!
//! A persistent cache keyed by station name fronts two independent
//! routing providers. Resolution is separate from cache commit so callers
//! can discard non-final results.

mod cache;
mod providers;
mod resolver;
mod schedule;

pub use cache::{CacheError, CommuteCache};
pub use providers::{
    DirectionsClient, DirectionsConfig, MatrixClient, MatrixConfig, ProviderError,
    TravelTimeProvider,
};
pub use resolver::TravelTimeResolver;
pub use schedule::next_weekday_8am;
