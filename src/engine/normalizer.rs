//! Raw forecast payload → per-city series.
//!
//! Walks the provider's `DailyForecasts` list and pulls four values out of
//! each day. Missing nested fields become `None` at that position; days are
//! never dropped, so all four sequences stay the same length.

use serde_json::Value;

use crate::types::{CityForecast, ForecastPoint, RawForecast};

const TEMPERATURE_MAX: &str = "/Temperature/Maximum/Value";
const DAY_WIND_SPEED: &str = "/Day/Wind/Speed/Value";
const DAY_PRECIPITATION: &str = "/Day/PrecipitationProbability";

/// Length of `YYYY-MM-DD`.
const DATE_LEN: usize = 10;

/// Convert one city's raw payload into a [`CityForecast`].
pub fn normalize(raw: &RawForecast) -> CityForecast {
    let points = raw
        .0
        .get("DailyForecasts")
        .and_then(Value::as_array)
        .map(|days| days.iter().map(normalize_day).collect())
        .unwrap_or_default();

    CityForecast { points }
}

fn normalize_day(day: &Value) -> ForecastPoint {
    ForecastPoint {
        date: day
            .get("Date")
            .and_then(Value::as_str)
            .map(calendar_date)
            .unwrap_or_default(),
        temperature: day.pointer(TEMPERATURE_MAX).and_then(Value::as_f64),
        wind_speed: day.pointer(DAY_WIND_SPEED).and_then(Value::as_f64),
        precipitation_probability: day.pointer(DAY_PRECIPITATION).and_then(as_percent),
    }
}

/// Date portion of an ISO-8601 timestamp: the first ten characters.
pub fn calendar_date(timestamp: &str) -> String {
    timestamp.chars().take(DATE_LEN).collect()
}

fn as_percent(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
}
