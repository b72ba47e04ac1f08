//! AccuWeather location search and daily forecast client.
//!
//! API: `https://dataservice.accuweather.com`
//! Auth: `apikey` query parameter.
//! Endpoints used:
//! - `GET /locations/v1/cities/search?q=<city>&language=<lang>`
//! - `GET /forecasts/v1/daily/{1,3,5}day/{key}?language=<lang>&metric=true`
//!
//! Only HTTP 200 counts as success. No retry is attempted; a failed call is
//! terminal for that city in the current run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{ForecastClient, LocationResolver};
use crate::config::ProviderConfig;
use crate::types::{ForecastError, Horizon, LocationKey, RawForecast};

const LOCATION_SEARCH: &str = "location search";
const DAILY_FORECAST: &str = "daily forecast";

/// One element of the location search response. Only the key is used.
#[derive(Debug, Deserialize)]
struct LocationMatch {
    #[serde(rename = "Key")]
    key: String,
}

/// AccuWeather client implementing both provider seams.
pub struct AccuWeatherClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    language: String,
    metric: bool,
}

impl AccuWeatherClient {
    /// Create a client from provider settings and an injected API key.
    pub fn new(config: &ProviderConfig, api_key: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("route-forecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for AccuWeather")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
            metric: config.metric,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/locations/v1/cities/search", self.base_url)
    }

    fn forecast_url(&self, key: &LocationKey, days: Horizon) -> String {
        format!(
            "{}/forecasts/v1/daily/{days}/{}",
            self.base_url,
            urlencoding::encode(key.as_str())
        )
    }

    /// GET `url` and decode a 200 body as JSON.
    ///
    /// Any other status is returned as `ProviderStatus` with the response
    /// body. Transport errors are stripped of their URL, which carries the
    /// API key.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ForecastError> {
        debug!(endpoint, url = %url, "Provider request");

        let resp = self
            .http
            .get(url)
            .query(&[("apikey", self.api_key.expose_secret().as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| ForecastError::Transport {
                endpoint: endpoint.into(),
                message: e.without_url().to_string(),
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            error!(endpoint, status = status.as_u16(), body = %body, "Provider returned an error status");
            return Err(ForecastError::ProviderStatus {
                endpoint: endpoint.into(),
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>().await.map_err(|e| ForecastError::Parse {
            endpoint: endpoint.into(),
            message: e.without_url().to_string(),
        })
    }
}

#[async_trait]
impl LocationResolver for AccuWeatherClient {
    async fn resolve(&self, city: &str) -> Result<LocationKey, ForecastError> {
        let url = self.search_url();
        let matches: Vec<LocationMatch> = self
            .get_json(
                LOCATION_SEARCH,
                &url,
                &[("q", city), ("language", self.language.as_str())],
            )
            .await
            .inspect_err(|e| error!(city, error = %e, "Location lookup failed"))?;

        match matches.into_iter().next() {
            Some(first) => {
                info!(city, key = %first.key, "Location key resolved");
                Ok(LocationKey(first.key))
            }
            None => {
                warn!(city, "No location found for city");
                Err(ForecastError::LocationNotFound(city.to_string()))
            }
        }
    }
}

#[async_trait]
impl ForecastClient for AccuWeatherClient {
    async fn fetch(&self, key: &LocationKey, days: Horizon) -> Result<RawForecast, ForecastError> {
        let url = self.forecast_url(key, days);
        let metric = if self.metric { "true" } else { "false" };
        let payload: serde_json::Value = self
            .get_json(
                DAILY_FORECAST,
                &url,
                &[("language", self.language.as_str()), ("metric", metric)],
            )
            .await
            .inspect_err(|e| error!(key = %key, days = days.days(), error = %e, "Forecast fetch failed"))?;

        let raw = RawForecast(payload);
        if raw.is_empty() {
            error!(key = %key, days = days.days(), "Forecast response carried no data");
            return Err(ForecastError::EmptyPayload {
                endpoint: DAILY_FORECAST.into(),
            });
        }

        info!(key = %key, days = days.days(), "Forecast received");
        Ok(raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
