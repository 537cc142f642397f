//! Travel-time resolution with cache-first, two-provider fallback.
//!
//! Resolution and commit are separate: `resolve` never writes the cache,
//! so callers can discard non-final results (dry runs) and commit accepted
//! values themselves.

use chrono::Utc;
use tracing::{debug, warn};

use super::cache::CommuteCache;
use super::providers::TravelTimeProvider;
use super::schedule::next_weekday_8am;

/// Resolves station travel times to the hub.
///
/// Providers are optional: an unconfigured provider is skipped exactly as
/// if it had failed, and when both are absent or unavailable `resolve`
/// yields `None` — "cannot evaluate this station", never a default.
#[derive(Debug)]
pub struct TravelTimeResolver<A, B> {
    primary: Option<A>,
    fallback: Option<B>,
}

impl<A, B> TravelTimeResolver<A, B>
where
    A: TravelTimeProvider,
    B: TravelTimeProvider,
{
    /// Create a resolver from whichever providers are configured.
    pub fn new(primary: Option<A>, fallback: Option<B>) -> Self {
        Self { primary, fallback }
    }

    /// Minutes by train from the station to the hub, or `None`.
    ///
    /// Checks the cache first (case-insensitive station name); on a miss,
    /// tries the primary then the fallback provider for a next-weekday
    /// 08:00 departure. Provider errors are logged, never raised. The
    /// result is not written back to the cache.
    pub async fn resolve(
        &self,
        cache: &CommuteCache,
        station_name: &str,
        lat: f64,
        lng: f64,
    ) -> Option<u32> {
        if let Some(minutes) = cache.get(station_name) {
            debug!("cache hit for {station_name}: {minutes} min");
            return Some(minutes);
        }

        let departure = next_weekday_8am(Utc::now());

        if let Some(minutes) = Self::try_provider(self.primary.as_ref(), lat, lng, departure).await
        {
            return Some(minutes);
        }
        Self::try_provider(self.fallback.as_ref(), lat, lng, departure).await
    }

    async fn try_provider<P: TravelTimeProvider>(
        provider: Option<&P>,
        lat: f64,
        lng: f64,
        departure: chrono::DateTime<Utc>,
    ) -> Option<u32> {
        let provider = provider?;
        match provider.travel_minutes(lat, lng, departure).await {
            Ok(Some(minutes)) => Some(minutes),
            Ok(None) => {
                debug!("{} found no route", provider.name());
                None
            }
            Err(err) => {
                warn!("{} provider unavailable: {err}", provider.name());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use chrono::DateTime;
    use tempfile::tempdir;

    use super::super::providers::ProviderError;
    use super::*;

    /// Stub provider returning a fixed outcome and counting invocations.
    struct Stub {
        minutes: Result<Option<u32>, ()>,
        calls: AtomicU32,
    }

    impl Stub {
        fn returning(minutes: Option<u32>) -> Self {
            Self {
                minutes: Ok(minutes),
                calls: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                minutes: Err(()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TravelTimeProvider for Stub {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn travel_minutes(
            &self,
            _lat: f64,
            _lng: f64,
            _departure: DateTime<Utc>,
        ) -> Result<Option<u32>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.minutes {
                Ok(minutes) => Ok(*minutes),
                Err(()) => Err(ProviderError::Malformed("stub failure".into())),
            }
        }
    }

    fn empty_cache() -> (tempfile::TempDir, CommuteCache) {
        let dir = tempdir().unwrap();
        let cache = CommuteCache::open(dir.path().join("times.json"));
        (dir, cache)
    }

    #[tokio::test]
    async fn cache_hit_never_touches_providers() {
        let (_dir, mut cache) = empty_cache();
        cache.insert("St Albans City", 20).unwrap();

        let primary = Stub::failing();
        let fallback = Stub::failing();
        let resolver = TravelTimeResolver::new(Some(primary), Some(fallback));

        let minutes = resolver
            .resolve(&cache, "st albans city", 51.75, -0.3275)
            .await;

        assert_eq!(minutes, Some(20));
        assert_eq!(resolver.primary.as_ref().unwrap().calls(), 0);
        assert_eq!(resolver.fallback.as_ref().unwrap().calls(), 0);
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let (_dir, cache) = empty_cache();
        let resolver =
            TravelTimeResolver::new(Some(Stub::returning(Some(35))), Some(Stub::returning(Some(99))));

        let minutes = resolver.resolve(&cache, "Hitchin", 51.9467, -0.2604).await;

        assert_eq!(minutes, Some(35));
        assert_eq!(resolver.fallback.as_ref().unwrap().calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back() {
        let (_dir, cache) = empty_cache();
        let resolver = TravelTimeResolver::new(Some(Stub::failing()), Some(Stub::returning(Some(42))));

        let minutes = resolver.resolve(&cache, "Bedford", 52.1361, -0.4797).await;

        assert_eq!(minutes, Some(42));
        assert_eq!(resolver.primary.as_ref().unwrap().calls(), 1);
        assert_eq!(resolver.fallback.as_ref().unwrap().calls(), 1);
    }

    #[tokio::test]
    async fn no_route_from_primary_also_falls_back() {
        let (_dir, cache) = empty_cache();
        let resolver =
            TravelTimeResolver::new(Some(Stub::returning(None)), Some(Stub::returning(Some(55))));

        let minutes = resolver.resolve(&cache, "Sandy", 52.13, -0.29).await;

        assert_eq!(minutes, Some(55));
    }

    #[tokio::test]
    async fn both_unconfigured_yields_none() {
        let (_dir, cache) = empty_cache();
        let resolver: TravelTimeResolver<Stub, Stub> = TravelTimeResolver::new(None, None);

        assert_eq!(resolver.resolve(&cache, "Anywhere", 52.0, 0.0).await, None);
    }

    #[tokio::test]
    async fn both_failing_yields_none() {
        let (_dir, cache) = empty_cache();
        let resolver = TravelTimeResolver::new(Some(Stub::failing()), Some(Stub::failing()));

        assert_eq!(resolver.resolve(&cache, "Anywhere", 52.0, 0.0).await, None);
    }

    #[tokio::test]
    async fn resolve_does_not_write_the_cache() {
        let (_dir, cache) = empty_cache();
        let resolver =
            TravelTimeResolver::new(Some(Stub::returning(Some(35))), None::<Stub>);

        resolver.resolve(&cache, "Hitchin", 51.9467, -0.2604).await;

        assert!(cache.is_empty());
    }
}
