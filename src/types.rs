//! Shared types for the route forecast service.
//!
//! These types form the data model used across all modules. The provider
//! clients, the orchestrator, the presentation adapter and the dashboard
//! all depend on this module and nothing else in the crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::cities;

// ---------------------------------------------------------------------------
// Request inputs
// ---------------------------------------------------------------------------

/// Number of forecast days requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Horizon {
    One,
    Three,
    #[default]
    Five,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::One, Horizon::Three, Horizon::Five];

    pub fn days(self) -> u8 {
        match self {
            Horizon::One => 1,
            Horizon::Three => 3,
            Horizon::Five => 5,
        }
    }

    /// Dropdown label shown by the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Horizon::One => "1 день",
            Horizon::Three => "3 дня",
            Horizon::Five => "5 дней",
        }
    }
}

impl TryFrom<u8> for Horizon {
    type Error = ForecastError;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Horizon::One),
            3 => Ok(Horizon::Three),
            5 => Ok(Horizon::Five),
            other => Err(ForecastError::InvalidRoute(format!(
                "unsupported forecast horizon: {other} days (expected 1, 3 or 5)"
            ))),
        }
    }
}

impl From<Horizon> for u8 {
    fn from(h: Horizon) -> u8 {
        h.days()
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}day", self.days())
    }
}

/// A weather parameter the user can choose to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    Temperature,
    WindSpeed,
    Precipitation,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [
        Parameter::Temperature,
        Parameter::WindSpeed,
        Parameter::Precipitation,
    ];

    /// Checklist / legend label, with the display unit.
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Temperature => "Температура (°C)",
            Parameter::WindSpeed => "Скорость ветра (м/с)",
            Parameter::Precipitation => "Осадки (%)",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Temperature => write!(f, "temperature"),
            Parameter::WindSpeed => write!(f, "wind_speed"),
            Parameter::Precipitation => write!(f, "precipitation"),
        }
    }
}

fn all_parameters() -> Vec<Parameter> {
    Parameter::ALL.to_vec()
}

/// The five inputs of a forecast update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub intermediates: Vec<String>,
    #[serde(default)]
    pub days: Horizon,
    #[serde(default = "all_parameters")]
    pub parameters: Vec<Parameter>,
}

impl RouteRequest {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            intermediates: Vec::new(),
            days: Horizon::default(),
            parameters: all_parameters(),
        }
    }

    pub fn with_intermediates<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.intermediates = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_days(mut self, days: Horizon) -> Self {
        self.days = days;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Route points in entered order: start, intermediates, end.
    pub fn points(&self) -> Vec<String> {
        let mut points = Vec::with_capacity(self.intermediates.len() + 2);
        points.push(self.start.clone());
        points.extend(self.intermediates.iter().cloned());
        points.push(self.end.clone());
        points
    }

    /// Route points with repeats removed, keeping the first occurrence.
    pub fn unique_points(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.points()
            .into_iter()
            .filter(|city| seen.insert(city.clone()))
            .collect()
    }

    /// Check that every point is a known city.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(ForecastError::InvalidRoute(
                "route needs both a start and an end city".into(),
            ));
        }
        for city in self.points() {
            if cities::find(&city).is_none() {
                return Err(ForecastError::UnknownCity(city));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

/// A city from the static route table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

/// Provider-assigned location identifier. Only meaningful within one run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey(pub String);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Forecast data
// ---------------------------------------------------------------------------

/// Unmodified daily-forecast payload. The schema belongs to the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast(pub serde_json::Value);

impl RawForecast {
    /// `null`, `{}`, `[]` or `""`: a 200 response that carries no forecast.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// One day of forecast data for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Maximum temperature in °C.
    pub temperature: Option<f64>,
    /// Daytime wind speed.
    pub wind_speed: Option<f64>,
    /// Daytime precipitation probability, percent.
    pub precipitation_probability: Option<i64>,
}

/// Forecast days for one city, in provider order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityForecast {
    pub points: Vec<ForecastPoint>,
}

impl CityForecast {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ForecastPoint> {
        self.points.first()
    }

    pub fn dates(&self) -> Vec<String> {
        self.points.iter().map(|p| p.date.clone()).collect()
    }

    pub fn temperatures(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.temperature).collect()
    }

    pub fn wind_speeds(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.wind_speed).collect()
    }

    pub fn precipitation_probs(&self) -> Vec<Option<i64>> {
        self.points.iter().map(|p| p.precipitation_probability).collect()
    }

    /// The four parallel sequences, as served to renderers.
    pub fn series(&self) -> CitySeries {
        CitySeries {
            dates: self.dates(),
            temperatures: self.temperatures(),
            wind_speeds: self.wind_speeds(),
            precipitation_probs: self.precipitation_probs(),
        }
    }
}

/// Column-oriented view of a [`CityForecast`]. All vectors share one length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySeries {
    pub dates: Vec<String>,
    pub temperatures: Vec<Option<f64>>,
    pub wind_speeds: Vec<Option<f64>>,
    pub precipitation_probs: Vec<Option<i64>>,
}

// ---------------------------------------------------------------------------
// Route result
// ---------------------------------------------------------------------------

/// Pipeline step at which a city dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Location,
    Forecast,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Location => write!(f, "location"),
            FailureStage::Forecast => write!(f, "forecast"),
        }
    }
}

/// A city excluded from the result, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityFailure {
    pub city: String,
    pub stage: FailureStage,
    pub detail: String,
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    PartialSuccess,
    TotalFailure,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "SUCCESS"),
            RunOutcome::PartialSuccess => write!(f, "PARTIAL_SUCCESS"),
            RunOutcome::TotalFailure => write!(f, "TOTAL_FAILURE"),
        }
    }
}

/// Success / error indicator pair shown to the user.
///
/// Exactly one of the two is set. Any failed city raises `error`, even when
/// other cities produced data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub success: bool,
    pub error: bool,
}

/// Aggregated output of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResult {
    /// Route points in entered order, repeats included.
    pub points: Vec<String>,
    pub days: Horizon,
    pub parameters: Vec<Parameter>,
    /// Forecasts for cities that resolved and fetched successfully.
    pub forecasts: BTreeMap<String, CityForecast>,
    /// Excluded cities, in route order.
    pub failures: Vec<CityFailure>,
}

impl RouteResult {
    /// At least one resolved city failed to deliver a forecast.
    pub fn partial_failure(&self) -> bool {
        self.failures
            .iter()
            .any(|f| f.stage == FailureStage::Forecast)
    }

    /// At least one city failed at either step.
    pub fn any_failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// No city produced a forecast.
    pub fn total_failure(&self) -> bool {
        self.forecasts.is_empty()
    }

    pub fn outcome(&self) -> RunOutcome {
        if self.total_failure() {
            RunOutcome::TotalFailure
        } else if self.any_failed() {
            RunOutcome::PartialSuccess
        } else {
            RunOutcome::Success
        }
    }

    pub fn signal(&self) -> Signal {
        let success = self.outcome() == RunOutcome::Success;
        Signal {
            success,
            error: !success,
        }
    }

    pub fn forecast(&self, city: &str) -> Option<&CityForecast> {
        self.forecasts.get(city)
    }

    pub fn failed_cities(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.city.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for route forecasting.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Provider error ({endpoint}): HTTP {status}: {body}")]
    ProviderStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Transport error ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    #[error("Unexpected response ({endpoint}): {message}")]
    Parse { endpoint: String, message: String },

    #[error("Empty response ({endpoint})")]
    EmptyPayload { endpoint: String },

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}

impl ForecastError {
    /// Whether the error comes from the request itself rather than the provider.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ForecastError::UnknownCity(_) | ForecastError::InvalidRoute(_)
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
