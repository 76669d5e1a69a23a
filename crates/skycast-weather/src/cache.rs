//! TTL cache for forecast documents.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::WeatherError;
use crate::types::ForecastDocument;

/// Outcome of a cache-aside lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Served from an unexpired cache entry.
    Hit(ForecastDocument),
    /// Computed live and stored during this call.
    Computed(ForecastDocument),
}

impl Lookup {
    /// The document plus whether it was computed live.
    pub fn into_parts(self) -> (ForecastDocument, bool) {
        match self {
            Self::Hit(data) => (data, false),
            Self::Computed(data) => (data, true),
        }
    }
}

/// Trait for TTL-bounded forecast stores.
///
/// `fetch_or_compute` returns the stored value while unexpired;
/// otherwise it runs `compute`, stores the result under `key` with
/// `ttl`, and reports it as computed. Implementations should collapse
/// concurrent misses for the same key into a single compute where the
/// backing store allows it; duplicate computes on a race are tolerated
/// otherwise (writes are idempotent within the TTL window).
#[allow(async_fn_in_trait)]
pub trait ForecastCache {
    /// # Errors
    /// A compute failure propagates and nothing is stored.
    async fn fetch_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<Lookup, WeatherError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ForecastDocument, WeatherError>>;
}

struct Entry {
    data: ForecastDocument,
    expires_at: Instant,
}

/// In-process TTL store.
///
/// The map lock is held across the compute future, so concurrent misses
/// collapse into a single compute and the waiters observe a hit.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForecastCache for MemoryCache {
    async fn fetch_or_compute<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<Lookup, WeatherError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ForecastDocument, WeatherError>>,
    {
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(key) {
            if Instant::now() < entry.expires_at {
                debug!(key, "cache hit");
                return Ok(Lookup::Hit(entry.data.clone()));
            }
            debug!(key, "cache entry expired");
        } else {
            debug!(key, "cache miss");
        }

        let data = compute().await?;
        entries.insert(
            key.to_string(),
            Entry {
                data: data.clone(),
                expires_at: Instant::now() + ttl,
            },
        );

        Ok(Lookup::Computed(data))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::{CurrentConditions, DailyForecast};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(30 * 60);

    fn document(temp_f: f64) -> ForecastDocument {
        ForecastDocument {
            current: Some(CurrentConditions {
                temp_f,
                condition: None,
                last_updated: None,
            }),
            forecast: Some(DailyForecast {
                forecastday: vec![],
            }),
        }
    }

    #[tokio::test]
    async fn test_miss_computes_and_stores() {
        let cache = MemoryCache::new();
        let calls = AtomicUsize::new(0);

        let calls = &calls;
        let lookup = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(document(75.9))
            })
            .await
            .unwrap();

        assert_eq!(lookup, Lookup::Computed(document(75.9)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hit_within_ttl_skips_compute() {
        let cache = MemoryCache::new();
        let calls = AtomicUsize::new(0);

        let calls = &calls;
        for _ in 0..2 {
            cache
                .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(document(75.9))
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = MemoryCache::new();

        let first = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async {
                Ok(document(75.9))
            })
            .await
            .unwrap();
        let second = cache
            .fetch_or_compute("weather_forecast/10001", TTL, || async {
                Ok(document(61.3))
            })
            .await
            .unwrap();

        assert_eq!(first, Lookup::Computed(document(75.9)));
        assert_eq!(second, Lookup::Computed(document(61.3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_recomputed() {
        let cache = MemoryCache::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(document(75.9))
            })
            .await
            .unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;

        let lookup = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(document(80.1))
            })
            .await
            .unwrap();

        assert_eq!(lookup, Lookup::Computed(document(80.1)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_survives_until_ttl() {
        let cache = MemoryCache::new();

        cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async {
                Ok(document(75.9))
            })
            .await
            .unwrap();

        tokio::time::advance(TTL - Duration::from_secs(1)).await;

        let lookup = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async {
                panic!("compute must not run for an unexpired entry")
            })
            .await
            .unwrap();

        assert_eq!(lookup, Lookup::Hit(document(75.9)));
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let cache = MemoryCache::new();
        let calls = AtomicUsize::new(0);
        let calls = &calls;

        let failed = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(WeatherError::Api {
                    status: 500,
                    message: "boom".into(),
                })
            })
            .await;
        assert!(failed.is_err());

        let lookup = cache
            .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(document(75.9))
            })
            .await
            .unwrap();

        // The failed attempt left the slot empty, so the retry computes.
        assert_eq!(lookup, Lookup::Computed(document(75.9)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_collapse_to_one_compute() {
        let cache = Arc::new(MemoryCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..2 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .fetch_or_compute("weather_forecast/83702", TTL, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(25)).await;
                        Ok(document(75.9))
                    })
                    .await
                    .unwrap()
            }));
        }

        let mut computed = 0;
        let mut hits = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Lookup::Computed(_) => computed += 1,
                Lookup::Hit(_) => hits += 1,
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(computed, 1);
        assert_eq!(hits, 1);
    }
}
