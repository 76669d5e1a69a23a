//! Resolved location value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic location resolved from user-entered address fields.
///
/// All fields are optional: a geocoder candidate may carry any subset of
/// them. Constructed once by [`crate::LocationResolver`] and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street line as typed by the user, not re-derived from the geocoder.
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Location {
    /// Whether this location can be used for a forecast lookup.
    ///
    /// Requires coordinates and a postal code; the postal code doubles as
    /// the forecast cache key.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some() && self.postal_code.is_some()
    }
}

impl fmt::Display for Location {
    /// Joins the present components with ", ", omitting absent ones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [&self.street, &self.city, &self.state, &self.postal_code]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}
