//! Geocoding provider seam and the Nominatim-backed client.
//!
//! Uses Nominatim (OpenStreetMap) - free, no API key required. Any
//! provider that can return city/state/postal code/coordinates per
//! candidate is substitutable via [`GeoClient`].

use std::time::Duration;

use serde::Deserialize;
use tracing::instrument;

use crate::error::GeocodingError;

const NOMINATIM_BASE: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skycast/0.1.0 (https://github.com/skycast)";
const MAX_RESULTS: u8 = 5;

/// A geocoding request: forward (free-text address) or reverse
/// (coordinate pair).
#[derive(Debug, Clone, PartialEq)]
pub enum GeoQuery {
    Address(String),
    Coordinates { latitude: f64, longitude: f64 },
}

/// One geocoder result. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoCandidate {
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Trait for geocoding providers.
///
/// Zero candidates is `Ok` with an empty vector; transport failures and
/// non-2xx responses are errors. Callers rely on that distinction: an
/// empty result is user-correctable, an error is transient.
#[allow(async_fn_in_trait)]
pub trait GeoClient {
    /// Search for candidates matching the query, best match first.
    async fn search(&self, query: &GeoQuery) -> Result<Vec<GeoCandidate>, GeocodingError>;
}

/// Nominatim (OpenStreetMap) geocoder.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    /// Create a client against the public Nominatim instance.
    pub fn new() -> Result<Self, GeocodingError> {
        Self::with_base_url(NOMINATIM_BASE)
    }

    /// Create a client against a specific Nominatim endpoint
    /// (self-hosted instance, or a mock server in tests).
    pub fn with_base_url(base_url: &str) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn forward(&self, address: &str) -> Result<Vec<GeoCandidate>, GeocodingError> {
        let url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(address),
            MAX_RESULTS,
        );

        let response = self.client.get(&url).send().await?;
        let places: Vec<NominatimPlace> = Self::handle_response(response).await?;

        Ok(places
            .into_iter()
            .filter_map(NominatimPlace::into_candidate)
            .collect())
    }

    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeoCandidate>, GeocodingError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=jsonv2&addressdetails=1",
            self.base_url, latitude, longitude,
        );

        let response = self.client.get(&url).send().await?;
        // The reverse endpoint returns a single place; an unmatched
        // coordinate comes back as a bare `{"error": ...}` document,
        // which maps to zero candidates.
        let place: NominatimPlace = Self::handle_response(response).await?;

        Ok(place.into_candidate().into_iter().collect())
    }

    async fn handle_response<T>(response: reqwest::Response) -> Result<T, GeocodingError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GeocodingError::InvalidResponse(e.to_string()))
    }
}

impl GeoClient for NominatimClient {
    #[instrument(skip(self), level = "info")]
    async fn search(&self, query: &GeoQuery) -> Result<Vec<GeoCandidate>, GeocodingError> {
        match query {
            GeoQuery::Address(address) => self.forward(address).await,
            GeoQuery::Coordinates {
                latitude,
                longitude,
            } => self.reverse(*latitude, *longitude).await,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Option<String>,
    lon: Option<String>,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl NominatimPlace {
    fn into_candidate(self) -> Option<GeoCandidate> {
        if self.lat.is_none() && self.address.is_none() {
            return None;
        }

        let latitude = self.lat.as_deref().and_then(|v| v.parse().ok());
        let longitude = self.lon.as_deref().and_then(|v| v.parse().ok());
        let address = self.address.unwrap_or_default();

        Some(GeoCandidate {
            // Prefer city > town > village > municipality for the
            // primary place name.
            city: address
                .city
                .or(address.town)
                .or(address.village)
                .or(address.municipality),
            state: address.state,
            postal_code: address.postcode,
            latitude,
            longitude,
        })
    }
}
