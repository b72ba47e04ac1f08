//! Route map: a polyline through every route point plus one marker per
//! city with data. Coordinates come from the static city table.

use serde::Serialize;

use super::{cities_with_data, NOT_AVAILABLE};
use crate::cities;
use crate::types::{ForecastError, ForecastPoint, RouteResult};

pub const MAP_TITLE: &str = "Маршрут с прогнозами погоды";
const ROUTE_NAME: &str = "Маршрут";
const MAP_STYLE: &str = "open-street-map";
const MAP_CENTER: (f64, f64) = (56.0, 50.0);
const MAP_ZOOM: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLine {
    pub name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFigure {
    pub title: String,
    pub style: String,
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub route: RouteLine,
    pub markers: Vec<MapMarker>,
}

/// Build the map. Fails only if a route point is missing from the city
/// table, which request validation rules out.
pub fn build_map(result: &RouteResult) -> Result<MapFigure, ForecastError> {
    let mut lat = Vec::with_capacity(result.points.len());
    let mut lon = Vec::with_capacity(result.points.len());
    for name in &result.points {
        let city = cities::find(name).ok_or_else(|| ForecastError::UnknownCity(name.clone()))?;
        lat.push(city.lat);
        lon.push(city.lon);
    }

    let markers = cities_with_data(result)
        .into_iter()
        .map(|(name, forecast)| {
            let city = cities::find(name).ok_or_else(|| ForecastError::UnknownCity(name.into()))?;
            Ok(MapMarker {
                city: name.to_string(),
                lat: city.lat,
                lon: city.lon,
                hover_text: hover_text(name, forecast.first()),
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(MapFigure {
        title: MAP_TITLE.into(),
        style: MAP_STYLE.into(),
        center_lat: MAP_CENTER.0,
        center_lon: MAP_CENTER.1,
        zoom: MAP_ZOOM,
        route: RouteLine {
            name: ROUTE_NAME.into(),
            lat,
            lon,
        },
        markers,
    })
}

/// Marker tooltip with the first forecast day's values.
fn hover_text(city: &str, first: Option<&ForecastPoint>) -> String {
    let temp = value_or_na(first.and_then(|p| p.temperature));
    let wind = value_or_na(first.and_then(|p| p.wind_speed));
    let precip = value_or_na(first.and_then(|p| p.precipitation_probability));
    format!("{city}<br>Температура: {temp}°C<br>Ветер: {wind} м/с<br>Осадки: {precip}%")
}

fn value_or_na<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
