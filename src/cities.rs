//! Static route city table.
//!
//! Names double as provider search queries and as keys for map
//! coordinates. Coordinates are never sent to the provider.

use crate::types::City;

pub const CITIES: &[City] = &[
    City { name: "Москва", lat: 55.7558, lon: 37.6173 },
    City { name: "Санкт-Петербург", lat: 59.9343, lon: 30.3351 },
    City { name: "Новосибирск", lat: 55.0084, lon: 82.9357 },
    City { name: "Екатеринбург", lat: 56.8389, lon: 60.6057 },
    City { name: "Нижний Новгород", lat: 56.2965, lon: 43.9361 },
];

/// Look up a city by exact display name.
pub fn find(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.name == name)
}

/// Default start point offered by the dashboard.
pub fn default_start() -> &'static City {
    &CITIES[0]
}

/// Default end point offered by the dashboard.
pub fn default_end() -> &'static City {
    &CITIES[CITIES.len() - 1]
}
