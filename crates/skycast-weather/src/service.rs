//! Cache-aside forecast orchestration.

use skycast_geocoding::Location;
use tracing::debug;

use crate::cache::ForecastCache;
use crate::client::WeatherClient;
use crate::config::ForecastConfig;
use crate::error::WeatherError;
use crate::types::Forecast;

/// Namespace prefix for forecast cache keys.
const CACHE_KEY_PREFIX: &str = "weather_forecast/";

/// Cache-aside forecast lookup keyed by postal code.
pub struct ForecastService<W, C> {
    client: W,
    cache: C,
    config: ForecastConfig,
}

impl<W: WeatherClient, C: ForecastCache> ForecastService<W, C> {
    pub fn new(client: W, cache: C, config: ForecastConfig) -> Self {
        Self {
            client,
            cache,
            config,
        }
    }

    /// Fetch the forecast for a resolved location.
    ///
    /// Returns `Ok(None)` without touching the network or the cache when
    /// there is no location or it lacks a postal code, the mandatory
    /// cache key and API parameter.
    ///
    /// # Errors
    /// An upstream fetch failure propagates, so callers can tell "no
    /// location" (`Ok(None)`) from "location found but fetch failed".
    pub async fn forecast_for(
        &self,
        location: Option<&Location>,
    ) -> Result<Option<Forecast>, WeatherError> {
        let Some(postal_code) = location.and_then(|loc| loc.postal_code.as_deref()) else {
            debug!("no postal code; skipping forecast lookup");
            return Ok(None);
        };

        // One cache slot per postal code, however many distinct
        // street/city inputs map to it.
        let key = format!("{CACHE_KEY_PREFIX}{postal_code}");

        let lookup = self
            .cache
            .fetch_or_compute(&key, self.config.ttl, || {
                self.client.fetch(postal_code, self.config.days)
            })
            .await?;

        let (data, fresh) = lookup.into_parts();
        debug!(postal_code, fresh, "forecast ready");

        Ok(Some(Forecast::new(postal_code, data, fresh)))
    }
}
