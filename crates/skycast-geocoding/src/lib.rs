//! Address resolution for Skycast.
//!
//! Turns free-text address input into a postal-coded [`Location`] via a
//! geocoding provider, with a reverse-geocoding fallback for inputs that
//! resolve to coordinates without a postal code.

pub mod client;
pub mod error;
pub mod location;
pub mod resolver;

pub use client::{GeoCandidate, GeoClient, GeoQuery, NominatimClient};
pub use error::GeocodingError;
pub use location::Location;
pub use resolver::LocationResolver;
