//! Forecast service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::WeatherError;

/// Endpoint root of the default upstream forecast API.
pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

const DEFAULT_DAYS: u8 = 3;
const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// Upstream forecast horizon limit; the API caps requests at two weeks.
const MAX_DAYS: u8 = 14;

/// Configuration for the upstream weather API and the forecast cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Credential for upstream auth.
    pub api_key: String,

    /// Endpoint root of the forecast API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Forecast horizon in days.
    #[serde(default = "default_days")]
    pub days: u8,

    /// Expiration attached to cached forecasts.
    #[serde(default = "default_ttl")]
    pub ttl: Duration,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_days() -> u8 {
    DEFAULT_DAYS
}

fn default_ttl() -> Duration {
    DEFAULT_TTL
}

impl ForecastConfig {
    /// Config with defaults for everything but the API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            days: default_days(),
            ttl: default_ttl(),
        }
    }

    /// Check field values before constructing clients.
    ///
    /// # Errors
    /// `WeatherError::Config` naming the offending field.
    pub fn validate(&self) -> Result<(), WeatherError> {
        if self.api_key.trim().is_empty() {
            return Err(WeatherError::Config("api_key must not be empty".into()));
        }
        if Url::parse(&self.base_url).is_err() {
            return Err(WeatherError::Config(format!(
                "base_url is not a valid URL: {}",
                self.base_url
            )));
        }
        if self.days == 0 || self.days > MAX_DAYS {
            return Err(WeatherError::Config(format!(
                "days must be between 1 and {MAX_DAYS}, got {}",
                self.days
            )));
        }
        if self.ttl.is_zero() {
            return Err(WeatherError::Config("ttl must be non-zero".into()));
        }
        Ok(())
    }
}
