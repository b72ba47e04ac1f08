//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section has defaults, so a missing file or a partial file is fine.
//! The provider API key is referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub route: RouteConfig,
    pub dashboard: DashboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub language: String,
    pub metric: bool,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dataservice.accuweather.com".into(),
            api_key_env: "ACCUWEATHER_API_KEY".into(),
            language: "ru".into(),
            metric: true,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RouteConfig {
    /// Upper bound on cities processed at the same time.
    pub max_concurrency: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { max_concurrency: 4 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8050,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "route_forecast=info".into(),
            json: false,
        }
    }
}

/// Where a loaded [`AppConfig`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// No config file; every value is a built-in default.
    Defaults,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise use built-in defaults.
    ///
    /// Runs before logging is initialised, so the caller reports the
    /// returned [`ConfigSource`].
    pub fn load_or_default(path: &str) -> Result<(Self, ConfigSource)> {
        if Path::new(path).exists() {
            Ok((Self::load(path)?, ConfigSource::File))
        } else {
            Ok((Self::default(), ConfigSource::Defaults))
        }
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.provider.base_url.starts_with("http://")
            && !self.provider.base_url.starts_with("https://")
        {
            anyhow::bail!(
                "provider.base_url must be an HTTP or HTTPS URL, got {:?}",
                self.provider.base_url
            );
        }
        if self.route.max_concurrency == 0 {
            anyhow::bail!("route.max_concurrency must be at least 1");
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Provider API key from the configured environment variable.
    ///
    /// A missing key is not an error: requests will be rejected by the
    /// provider and reported per city.
    pub fn provider_api_key(&self) -> SecretString {
        match Self::resolve_env(&self.provider.api_key_env) {
            Ok(key) => SecretString::new(key),
            Err(e) => {
                warn!(error = %e, "No provider API key configured; requests will fail authorization");
                SecretString::new(String::new())
            }
        }
    }
}
