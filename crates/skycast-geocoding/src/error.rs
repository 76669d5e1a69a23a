//! Geocoding-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("City is required")]
    MissingCity,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Geocoder error: {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid geocoder response: {0}")]
    InvalidResponse(String),
}

impl GeocodingError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCity => "Please enter a city.",
            Self::Network(_) => "Network error. Check your connection.",
            Self::Api { .. } => "Address lookup failed. Please try again.",
            Self::InvalidResponse(_) => "Address lookup returned unexpected data.",
        }
    }
}
