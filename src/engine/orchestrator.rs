//! Route orchestrator.
//!
//! Runs resolve → fetch → normalize for every distinct city on the route
//! and folds the per-city outcomes into a [`RouteResult`]. A city that
//! fails at either step is recorded as a [`CityFailure`] and excluded; the
//! run itself never aborts. An empty forecast body counts as a failed fetch.
//!
//! Cities are independent, so their pipelines run concurrently with a
//! bounded fan-out. Completion order does not leak into the result:
//! forecasts are keyed by city name and failures are sorted by route
//! position before returning.

use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::normalizer;
use crate::provider::{ForecastClient, LocationResolver};
use crate::types::{
    CityFailure, CityForecast, FailureStage, ForecastError, Horizon, RouteRequest, RouteResult,
};

/// Per-city pipeline result, tagged with the city's first route position.
struct CityOutcome {
    position: usize,
    city: String,
    result: Result<CityForecast, CityFailure>,
}

/// Drives the provider clients for a whole route.
pub struct RouteOrchestrator {
    resolver: Arc<dyn LocationResolver>,
    client: Arc<dyn ForecastClient>,
    max_concurrency: usize,
}

impl RouteOrchestrator {
    /// `max_concurrency` is clamped to at least 1; 1 reproduces strictly
    /// sequential processing.
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        client: Arc<dyn ForecastClient>,
        max_concurrency: usize,
    ) -> Self {
        Self {
            resolver,
            client,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Fetch and normalize forecasts for every city on the route.
    pub async fn run(&self, request: &RouteRequest) -> RouteResult {
        let cities = request.unique_points();
        let days = request.days;
        info!(
            cities = cities.len(),
            days = days.days(),
            concurrency = self.max_concurrency,
            "Starting route forecast"
        );

        let outcomes: Vec<CityOutcome> = stream::iter(cities.into_iter().enumerate())
            .map(|(position, city)| async move {
                let result = self.process_city(&city, days).await;
                CityOutcome {
                    position,
                    city,
                    result,
                }
            })
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let result = merge(request, outcomes);

        info!(
            forecasts = result.forecasts.len(),
            failed = result.failures.len(),
            outcome = %result.outcome(),
            "Route forecast complete"
        );
        result
    }

    /// Resolve, fetch and normalize one city.
    async fn process_city(&self, city: &str, days: Horizon) -> Result<CityForecast, CityFailure> {
        let key = self
            .resolver
            .resolve(city)
            .await
            .map_err(|e| failure(city, FailureStage::Location, e))?;

        let raw = self
            .client
            .fetch(&key, days)
            .await
            .map_err(|e| failure(city, FailureStage::Forecast, e))?;
        if raw.is_empty() {
            return Err(failure(
                city,
                FailureStage::Forecast,
                ForecastError::EmptyPayload {
                    endpoint: "daily forecast".into(),
                },
            ));
        }

        let forecast = normalizer::normalize(&raw);
        debug!(city, key = %key, points = forecast.len(), "City forecast normalized");
        Ok(forecast)
    }
}

fn failure(city: &str, stage: FailureStage, error: ForecastError) -> CityFailure {
    warn!(city, stage = %stage, error = %error, "City excluded from route");
    CityFailure {
        city: city.to_string(),
        stage,
        detail: error.to_string(),
    }
}

/// Fold per-city outcomes, in any order, into a deterministic result.
fn merge(request: &RouteRequest, mut outcomes: Vec<CityOutcome>) -> RouteResult {
    outcomes.sort_by_key(|o| o.position);

    let mut forecasts = BTreeMap::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(forecast) => {
                forecasts.insert(outcome.city, forecast);
            }
            Err(failed) => failures.push(failed),
        }
    }

    RouteResult {
        points: request.points(),
        days: request.days,
        parameters: request.parameters.clone(),
        forecasts,
        failures,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
