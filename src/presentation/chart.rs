//! Time-series chart: one trace per city and selected parameter.

use serde::Serialize;

use super::cities_with_data;
use crate::types::{CityForecast, Parameter, RouteResult};

pub const CHART_TITLE: &str = "Прогноз погоды по маршруту";
const X_AXIS_TITLE: &str = "Дата";
const Y_AXIS_TITLE: &str = "Температура (°C) / Скорость ветра (м/с)";
const Y2_AXIS_TITLE: &str = "Осадки (%)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Line,
    Bar,
}

/// Which y-axis a trace is plotted against. Percentages go on the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dotted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTrace {
    pub name: String,
    pub city: String,
    pub parameter: Parameter,
    pub kind: TraceKind,
    pub axis: Axis,
    pub style: LineStyle,
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartFigure {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y2_title: String,
    pub traces: Vec<ChartTrace>,
}

/// Build the chart for all cities with data.
///
/// Traces are grouped by city in route order; within a city they follow
/// temperature, wind, precipitation regardless of selection order.
pub fn build_chart(result: &RouteResult) -> ChartFigure {
    let selected: Vec<Parameter> = Parameter::ALL
        .into_iter()
        .filter(|p| result.parameters.contains(p))
        .collect();

    let traces = cities_with_data(result)
        .into_iter()
        .flat_map(|(city, forecast)| {
            selected
                .iter()
                .map(move |&parameter| trace(city, forecast, parameter))
        })
        .collect();

    ChartFigure {
        title: CHART_TITLE.into(),
        x_title: X_AXIS_TITLE.into(),
        y_title: Y_AXIS_TITLE.into(),
        y2_title: Y2_AXIS_TITLE.into(),
        traces,
    }
}

fn trace(city: &str, forecast: &CityForecast, parameter: Parameter) -> ChartTrace {
    let (kind, axis, style, y) = match parameter {
        Parameter::Temperature => (
            TraceKind::Line,
            Axis::Primary,
            LineStyle::Solid,
            forecast.temperatures(),
        ),
        Parameter::WindSpeed => (
            TraceKind::Bar,
            Axis::Primary,
            LineStyle::Solid,
            forecast.wind_speeds(),
        ),
        Parameter::Precipitation => (
            TraceKind::Line,
            Axis::Secondary,
            LineStyle::Dotted,
            forecast
                .precipitation_probs()
                .into_iter()
                .map(|p| p.map(|v| v as f64))
                .collect(),
        ),
    };

    ChartTrace {
        name: format!("{city} {}", parameter.label()),
        city: city.to_string(),
        parameter,
        kind,
        axis,
        style,
        x: forecast.dates(),
        y,
    }
}
