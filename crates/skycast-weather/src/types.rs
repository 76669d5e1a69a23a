//! Forecast document schema and the `Forecast` wrapper.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// Upstream timestamp format for `last_updated`.
const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Raw forecast payload from the upstream provider.
///
/// Both top-level sections are optional so that structurally incomplete
/// bodies (upstream error payloads, stale cache entries) still
/// deserialize; presence is validated once by [`Forecast::report`], not
/// at each accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub forecast: Option<DailyForecast>,
}

/// Current-conditions section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_f: f64,
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Daily-forecast section: one entry per requested day, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_f: f64,
    pub mintemp_f: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
}

/// A forecast for one postal code, plus how it was obtained.
///
/// Constructed once per request by the forecast service and never
/// mutated. The cache stores only the raw [`ForecastDocument`], never
/// this wrapper.
#[derive(Debug, Clone)]
pub struct Forecast {
    postal_code: String,
    data: ForecastDocument,
    fresh: bool,
}

impl Forecast {
    pub fn new(postal_code: impl Into<String>, data: ForecastDocument, fresh: bool) -> Self {
        Self {
            postal_code: postal_code.into(),
            data,
            fresh,
        }
    }

    /// Postal code the forecast was fetched and cached under.
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// The raw document, as stored in the cache.
    pub fn data(&self) -> &ForecastDocument {
        &self.data
    }

    /// True when this value was computed by a live upstream call during
    /// the current request; false when it was served from cache.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Whether both the current-conditions and daily-forecast sections
    /// are structurally present.
    pub fn success(&self) -> bool {
        self.report().is_ok()
    }

    pub fn error(&self) -> bool {
        !self.success()
    }

    /// Validated view over the document; the single structural check.
    ///
    /// # Errors
    /// `WeatherError::MalformedData` when either section is missing.
    pub fn report(&self) -> Result<ForecastReport<'_>, WeatherError> {
        match (&self.data.current, &self.data.forecast) {
            (Some(current), Some(daily)) => Ok(ForecastReport {
                current,
                days: &daily.forecastday,
            }),
            _ => Err(WeatherError::MalformedData),
        }
    }
}

/// Accessors over a structurally validated forecast document.
///
/// Day accessors take a zero-based index into the fetched range. An
/// out-of-range index is a caller bug (asking for a day beyond the
/// requested horizon) and panics rather than returning a default.
#[derive(Debug, Clone, Copy)]
pub struct ForecastReport<'a> {
    current: &'a CurrentConditions,
    days: &'a [ForecastDay],
}

impl ForecastReport<'_> {
    pub fn current_temp(&self) -> f64 {
        self.current.temp_f
    }

    /// Number of days in the fetched range.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// # Panics
    /// If `day` is outside the fetched range.
    pub fn high_temp_for_day(&self, day: usize) -> f64 {
        self.days[day].day.maxtemp_f
    }

    /// # Panics
    /// If `day` is outside the fetched range.
    pub fn low_temp_for_day(&self, day: usize) -> f64 {
        self.days[day].day.mintemp_f
    }

    /// # Panics
    /// If `day` is outside the fetched range.
    pub fn conditions_for_day(&self, day: usize) -> &str {
        &self.days[day].day.condition.text
    }

    /// # Panics
    /// If `day` is outside the fetched range.
    pub fn date_for_day(&self, day: usize) -> NaiveDate {
        self.days[day].date
    }

    /// Upstream observation time of the current conditions, when the
    /// provider included one.
    pub fn fetched_at(&self) -> Option<NaiveDateTime> {
        self.current
            .last_updated
            .as_deref()
            .and_then(|ts| NaiveDateTime::parse_from_str(ts, LAST_UPDATED_FORMAT).ok())
    }
}
