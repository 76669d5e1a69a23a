//! Weather-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Weather API error: {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid forecast response: {0}")]
    InvalidResponse(String),

    #[error("Forecast data is missing the current or daily section")]
    MalformedData,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Network error. Check your connection.",
            Self::Api { .. } => "Forecast unavailable. Please try again.",
            Self::InvalidResponse(_) => "The weather service returned unexpected data.",
            Self::MalformedData => "Forecast data is incomplete.",
            Self::Config(_) => "The weather service is misconfigured.",
        }
    }
}
