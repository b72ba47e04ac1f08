//! Core engine: the resolve → fetch → normalize pipeline for a route.

pub mod normalizer;
pub mod orchestrator;

pub use orchestrator::RouteOrchestrator;
