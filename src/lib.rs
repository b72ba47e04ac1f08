//! Route Forecast: weather along a multi-city travel route.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod cities;
pub mod config;
pub mod types;
pub mod provider;
pub mod engine;
pub mod presentation;
pub mod dashboard;
