//! Integration tests: the route pipeline end to end.

mod mock_provider;
mod route_pipeline;
