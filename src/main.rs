//! Route Forecast: weather along a multi-city travel route.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the AccuWeather client into the route orchestrator and serves
//! the dashboard until Ctrl+C.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use route_forecast::config::{self, ConfigSource};
use route_forecast::dashboard::{self, DashboardState};
use route_forecast::engine::RouteOrchestrator;
use route_forecast::provider::accuweather::AccuWeatherClient;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let (cfg, source) = config::AppConfig::load_or_default(CONFIG_PATH)?;

    init_logging(&cfg);

    if source == ConfigSource::Defaults {
        warn!(path = CONFIG_PATH, "Config file not found, using defaults");
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %cfg.provider.base_url,
        language = %cfg.provider.language,
        max_concurrency = cfg.route.max_concurrency,
        "Route Forecast starting up"
    );

    // One client serves both provider seams
    let client = Arc::new(AccuWeatherClient::new(&cfg.provider, cfg.provider_api_key())?);
    let orchestrator = RouteOrchestrator::new(client.clone(), client, cfg.route.max_concurrency);
    let state = Arc::new(DashboardState::new(orchestrator));

    dashboard::serve(state, &cfg.dashboard.host, cfg.dashboard.port).await?;

    info!("Route Forecast shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber. `RUST_LOG` overrides the
/// configured filter.
fn init_logging(cfg: &config::AppConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter));

    if cfg.logging.json {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
