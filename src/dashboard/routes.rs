//! Dashboard API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`;
//! nothing in it is mutated by requests, so every forecast run starts fresh.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::cities::{self, CITIES};
use crate::engine::RouteOrchestrator;
use crate::presentation::{build_chart, build_map, ChartFigure, MapFigure};
use crate::types::{
    City, CityFailure, CitySeries, ForecastError, Horizon, Parameter, RouteRequest, RunOutcome,
    Signal,
};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub orchestrator: RouteOrchestrator,
}

impl DashboardState {
    pub fn new(orchestrator: RouteOrchestrator) -> Self {
        Self { orchestrator }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub run_id: Uuid,
    pub generated_at: String,
    pub outcome: RunOutcome,
    pub signal: Signal,
    pub points: Vec<String>,
    pub days: Horizon,
    pub parameters: Vec<Parameter>,
    pub forecasts: BTreeMap<String, CitySeries>,
    pub failures: Vec<CityFailure>,
    /// `None` when no city produced data.
    pub chart: Option<ChartFigure>,
    /// `None` when no city produced data.
    pub map: Option<MapFigure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionEntry<T> {
    pub value: T,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionsResponse {
    pub horizons: Vec<OptionEntry<Horizon>>,
    pub parameters: Vec<OptionEntry<Parameter>>,
    pub default_start: &'static str,
    pub default_end: &'static str,
    pub default_days: Horizon,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error returned by handlers as `{ "error": ... }` with a status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        if e.is_validation() {
            Self::bad_request(e.to_string())
        } else {
            Self::internal(e.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/forecast
pub async fn post_forecast(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "Rejected forecast request body");
        ApiError::bad_request(e.body_text())
    })?;
    request.validate().inspect_err(|e| warn!(error = %e, "Rejected forecast request"))?;

    let run_id = Uuid::new_v4();
    let span = info_span!("route_run", %run_id, start = %request.start, end = %request.end);
    let result = state.orchestrator.run(&request).instrument(span).await;

    let outcome = result.outcome();
    let (chart, map) = if result.total_failure() {
        (None, None)
    } else {
        (Some(build_chart(&result)), Some(build_map(&result)?))
    };

    info!(%run_id, outcome = %outcome, "Forecast response ready");

    Ok(Json(ForecastResponse {
        run_id,
        generated_at: chrono::Utc::now().to_rfc3339(),
        outcome,
        signal: result.signal(),
        forecasts: result
            .forecasts
            .iter()
            .map(|(city, f)| (city.clone(), f.series()))
            .collect(),
        points: result.points,
        days: result.days,
        parameters: result.parameters,
        failures: result.failures,
        chart,
        map,
    }))
}

/// GET /api/cities
pub async fn get_cities() -> Json<&'static [City]> {
    Json(CITIES)
}

/// GET /api/options
pub async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        horizons: Horizon::ALL
            .into_iter()
            .map(|h| OptionEntry { value: h, label: h.label() })
            .collect(),
        parameters: Parameter::ALL
            .into_iter()
            .map(|p| OptionEntry { value: p, label: p.label() })
            .collect(),
        default_start: cities::default_start().name,
        default_end: cities::default_end().name,
        default_days: Horizon::default(),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
