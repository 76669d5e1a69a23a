//! Forecast service for Skycast.
//!
//! Cache-aside retrieval of multi-day forecasts keyed by postal code,
//! with explicit freshness reporting and a TTL-bounded cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use cache::{ForecastCache, Lookup, MemoryCache};
pub use client::{WeatherApiClient, WeatherClient};
pub use config::ForecastConfig;
pub use error::WeatherError;
pub use service::ForecastService;
pub use types::{Forecast, ForecastDocument, ForecastReport};
