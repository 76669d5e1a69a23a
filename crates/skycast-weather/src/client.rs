//! Upstream forecast API client.

use std::time::Duration;

use tracing::instrument;

use crate::config::ForecastConfig;
use crate::error::WeatherError;
use crate::types::ForecastDocument;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Trait for forecast providers.
///
/// A fetch either yields a parsed document or fails; non-2xx responses
/// and malformed bodies are errors, never a silently empty document.
#[allow(async_fn_in_trait)]
pub trait WeatherClient {
    /// Fetch a `days`-day forecast for a postal code.
    async fn fetch(&self, postal_code: &str, days: u8) -> Result<ForecastDocument, WeatherError>;
}

/// HTTP client for the forecast API.
pub struct WeatherApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    /// Build a client from validated configuration.
    ///
    /// # Errors
    /// Propagates configuration and HTTP-client construction failures.
    pub fn new(config: &ForecastConfig) -> Result<Self, WeatherError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl WeatherClient for WeatherApiClient {
    #[instrument(skip(self), level = "info")]
    async fn fetch(&self, postal_code: &str, days: u8) -> Result<ForecastDocument, WeatherError> {
        let url = format!(
            "{}/forecast.json?key={}&q={}&days={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(postal_code),
            days,
        );

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::InvalidResponse(e.to_string()))
    }
}
