//! Mock weather provider for integration testing.
//!
//! Provides a deterministic implementation of both provider seams that
//! resolves cities to known keys and serves generated daily forecasts,
//! all in-memory with no external dependencies.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use route_forecast::provider::{ForecastClient, LocationResolver};
use route_forecast::types::{ForecastError, Horizon, LocationKey, RawForecast};

/// A mock provider for deterministic testing.
///
/// Cities, failures and the call log are fully controllable from test code.
pub struct MockProvider {
    keys: HashMap<String, String>,
    first_day: NaiveDate,
    /// Location keys whose forecast request answers with this status.
    failing_keys: Arc<Mutex<HashMap<String, u16>>>,
    /// If set, every call returns a transport error with this message.
    force_error: Arc<Mutex<Option<String>>>,
    resolved: Arc<Mutex<Vec<String>>>,
    fetched: Arc<Mutex<Vec<(String, u8)>>>,
}

impl MockProvider {
    /// Create a mock resolving the default city set.
    pub fn new() -> Self {
        Self::with_cities(&[
            ("Москва", "294021"),
            ("Санкт-Петербург", "295212"),
            ("Новосибирск", "294459"),
            ("Екатеринбург", "295863"),
            ("Нижний Новгород", "294199"),
        ])
    }

    /// Create a mock that knows only the given `(city, key)` pairs.
    pub fn with_cities(cities: &[(&str, &str)]) -> Self {
        Self {
            keys: cities
                .iter()
                .map(|(c, k)| (c.to_string(), k.to_string()))
                .collect(),
            first_day: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            failing_keys: Arc::new(Mutex::new(HashMap::new())),
            force_error: Arc::new(Mutex::new(None)),
            resolved: Arc::new(Mutex::new(Vec::new())),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the forecast request for `city` answer with `status`.
    pub fn fail_forecast(&self, city: &str, status: u16) {
        if let Some(key) = self.keys.get(city) {
            self.failing_keys.lock().unwrap().insert(key.clone(), status);
        }
    }

    /// Force all subsequent calls to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Clear any forced error.
    pub fn clear_error(&self) {
        *self.force_error.lock().unwrap() = None;
    }

    /// Cities passed to `resolve`, in call order.
    pub fn resolved_cities(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }

    /// `(key, days)` pairs passed to `fetch`, in call order.
    pub fn fetch_calls(&self) -> Vec<(String, u8)> {
        self.fetched.lock().unwrap().clone()
    }

    /// Distinct keys fetched so far.
    pub fn fetched_keys(&self) -> HashSet<String> {
        self.fetch_calls().into_iter().map(|(k, _)| k).collect()
    }

    fn forced(&self, endpoint: &str) -> Result<(), ForecastError> {
        match self.force_error.lock().unwrap().as_ref() {
            Some(msg) => Err(ForecastError::Transport {
                endpoint: endpoint.into(),
                message: msg.clone(),
            }),
            None => Ok(()),
        }
    }

    /// A provider-shaped payload of `days` entries. Values depend on the
    /// key so cities are distinguishable.
    fn payload(&self, key: &str, days: u8) -> Value {
        let base: f64 = key.chars().filter_map(|c| c.to_digit(10)).sum::<u32>() as f64;
        let daily: Vec<Value> = (0..days as i64)
            .map(|d| {
                let date = self.first_day + Duration::days(d);
                json!({
                    "Date": format!("{date}T07:00:00+03:00"),
                    "Temperature": {
                        "Minimum": {"Value": base - 5.0, "Unit": "C"},
                        "Maximum": {"Value": base + d as f64, "Unit": "C"}
                    },
                    "Day": {
                        "Wind": {"Speed": {"Value": 10.0 + d as f64, "Unit": "km/h"}},
                        "PrecipitationProbability": 10 * (d + 1)
                    },
                    "Night": {
                        "Wind": {"Speed": {"Value": 3.0, "Unit": "km/h"}},
                        "PrecipitationProbability": 0
                    }
                })
            })
            .collect();
        json!({ "Headline": {"Text": "mock"}, "DailyForecasts": daily })
    }
}

#[async_trait]
impl LocationResolver for MockProvider {
    async fn resolve(&self, city: &str) -> Result<LocationKey, ForecastError> {
        self.resolved.lock().unwrap().push(city.to_string());
        self.forced("location search")?;

        self.keys
            .get(city)
            .map(|k| LocationKey(k.clone()))
            .ok_or_else(|| ForecastError::LocationNotFound(city.to_string()))
    }
}

#[async_trait]
impl ForecastClient for MockProvider {
    async fn fetch(&self, key: &LocationKey, days: Horizon) -> Result<RawForecast, ForecastError> {
        self.fetched
            .lock()
            .unwrap()
            .push((key.to_string(), days.days()));
        self.forced("daily forecast")?;

        if let Some(status) = self.failing_keys.lock().unwrap().get(key.as_str()) {
            return Err(ForecastError::ProviderStatus {
                endpoint: "daily forecast".into(),
                status: *status,
                body: "mock failure".into(),
            });
        }
        Ok(RawForecast(self.payload(key.as_str(), days.days())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_resolve_known_and_unknown() {
        let provider = MockProvider::new();
        let key = provider.resolve("Москва").await.unwrap();
        assert_eq!(key.as_str(), "294021");
        assert!(matches!(
            provider.resolve("Казань").await,
            Err(ForecastError::LocationNotFound(_))
        ));
        assert_eq!(provider.resolved_cities(), vec!["Москва", "Казань"]);
    }

    #[tokio::test]
    async fn test_mock_payload_has_requested_days() {
        let provider = MockProvider::new();
        let raw = provider
            .fetch(&LocationKey("294021".into()), Horizon::Three)
            .await
            .unwrap();
        let daily = raw.0["DailyForecasts"].as_array().unwrap();
        assert_eq!(daily.len(), 3);
        assert_eq!(daily[2]["Date"], "2024-05-03T07:00:00+03:00");
    }

    #[tokio::test]
    async fn test_mock_failing_forecast() {
        let provider = MockProvider::new();
        provider.fail_forecast("Москва", 503);
        let err = provider
            .fetch(&LocationKey("294021".into()), Horizon::One)
            .await
            .unwrap_err();
        assert!(matches!(err, ForecastError::ProviderStatus { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_mock_forced_error() {
        let provider = MockProvider::new();
        provider.set_error("simulated outage");
        assert!(provider.resolve("Москва").await.is_err());

        provider.clear_error();
        assert!(provider.resolve("Москва").await.is_ok());
    }
}
