//! Presentation adapter.
//!
//! Turns a [`RouteResult`] into renderer-agnostic figure descriptions: a
//! time-series chart and a route map. Figures are plain serializable data;
//! the dashboard page draws them, but any charting library could.

pub mod chart;
pub mod map;

pub use chart::{build_chart, Axis, ChartFigure, ChartTrace, LineStyle, TraceKind};
pub use map::{build_map, MapFigure, MapMarker, RouteLine};

use crate::types::{CityForecast, RouteResult};

/// Placeholder for a value the provider did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Cities that produced data, in route order, each once.
fn cities_with_data(result: &RouteResult) -> Vec<(&str, &CityForecast)> {
    let mut seen = std::collections::HashSet::new();
    result
        .points
        .iter()
        .filter(|city| seen.insert(city.as_str()))
        .filter_map(|city| result.forecast(city).map(|f| (city.as_str(), f)))
        .collect()
}
