//! Address resolution with reverse-geocoding fallback.

use tracing::{debug, warn};

use crate::client::{GeoCandidate, GeoClient, GeoQuery};
use crate::error::GeocodingError;
use crate::location::Location;

/// Resolves raw address fields into a [`Location`].
///
/// Every call hits the provider live; geocoding results are not cached.
pub struct LocationResolver<G> {
    geo: G,
}

impl<G: GeoClient> LocationResolver<G> {
    pub fn new(geo: G) -> Self {
        Self { geo }
    }

    /// Resolve address fields to a location.
    ///
    /// City is required; street and state are optional. `Ok(None)` means
    /// the geocoder had no candidates for the address, which the
    /// presentation layer renders as "address not found".
    ///
    /// # Errors
    /// Returns `GeocodingError::MissingCity` for a blank city. Transport
    /// and provider failures on the primary lookup propagate; a failed
    /// reverse lookup only degrades the result (postal code absent).
    pub async fn resolve(
        &self,
        street: Option<&str>,
        city: &str,
        state: Option<&str>,
    ) -> Result<Option<Location>, GeocodingError> {
        if city.trim().is_empty() {
            return Err(GeocodingError::MissingCity);
        }

        let query = join_address_parts(street, city, state);
        debug!(%query, "resolving address");

        let candidates = self.geo.search(&GeoQuery::Address(query)).await?;
        let Some(candidate) = candidates.into_iter().next() else {
            debug!("no geocoding candidates");
            return Ok(None);
        };

        let GeoCandidate {
            city: resolved_city,
            state: resolved_state,
            postal_code,
            latitude,
            longitude,
        } = candidate;

        // A postal code is needed for the forecast cache key. When the
        // input was too coarse to carry one (e.g. just a city and
        // state), fall back to a reverse lookup on the coordinates.
        let mut postal_code = present(postal_code);
        if postal_code.is_none() {
            if let (Some(lat), Some(lon)) = (latitude, longitude) {
                postal_code = self.reverse_postal_code(lat, lon).await;
            }
        }

        Ok(Some(Location {
            street: street
                .filter(|s| !s.trim().is_empty())
                .map(String::from),
            city: resolved_city,
            state: resolved_state,
            postal_code,
            latitude,
            longitude,
        }))
    }

    async fn reverse_postal_code(&self, latitude: f64, longitude: f64) -> Option<String> {
        let query = GeoQuery::Coordinates {
            latitude,
            longitude,
        };
        match self.geo.search(&query).await {
            Ok(results) => present(results.into_iter().next().and_then(|c| c.postal_code)),
            Err(e) => {
                warn!(error = %e, "reverse postal-code lookup failed");
                None
            }
        }
    }
}

/// Join the non-blank parts of (street, city, state) with ", ".
fn join_address_parts(street: Option<&str>, city: &str, state: Option<&str>) -> String {
    [street, Some(city), state]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Geocoders sometimes return empty postal codes; treat them as absent.
fn present(postal_code: Option<String>) -> Option<String> {
    postal_code.filter(|code| !code.trim().is_empty())
}
