//! Weather provider integrations.
//!
//! Defines the two provider seams the route pipeline depends on (location
//! search and daily forecast retrieval) and the AccuWeather implementation
//! of both.

pub mod accuweather;

use async_trait::async_trait;

use crate::types::{ForecastError, Horizon, LocationKey, RawForecast};

/// Maps a city name to the provider's location identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Resolve a city name. The provider's first match wins.
    ///
    /// Returns `LocationNotFound` for an empty match list and a
    /// status/transport/parse error otherwise; callers treat all of them
    /// as "not found" for the current run.
    async fn resolve(&self, city: &str) -> Result<LocationKey, ForecastError>;
}

/// Retrieves a multi-day forecast for a resolved location.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Fetch the raw daily forecast for `days` days.
    async fn fetch(&self, key: &LocationKey, days: Horizon) -> Result<RawForecast, ForecastError>;
}
