//! Effective runtime settings.
//!
//! Precedence for the endpoint is command-line flag, then the
//! `HEADSTART_ENDPOINT` environment variable, then the config file, then the
//! built-in default. The timeout follows the same order minus the
//! environment.

use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::core::config::data::Config;

pub const ENDPOINT_ENV_VAR: &str = "HEADSTART_ENDPOINT";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub idle_timeout: Option<Duration>,
    pub greeting: String,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEndpoint {
    pub endpoint: String,
    pub reason: String,
}

impl fmt::Display for InvalidEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid chat endpoint '{}': {}",
            self.endpoint, self.reason
        )
    }
}

impl std::error::Error for InvalidEndpoint {}

impl Settings {
    pub fn from_environment(config: &Config, overrides: &Overrides) -> Result<Self, InvalidEndpoint> {
        Self::resolve(config, overrides, std::env::var(ENDPOINT_ENV_VAR).ok())
    }

    pub fn resolve(
        config: &Config,
        overrides: &Overrides,
        env_endpoint: Option<String>,
    ) -> Result<Self, InvalidEndpoint> {
        let endpoint = overrides
            .endpoint
            .clone()
            .or(env_endpoint)
            .map(|endpoint| endpoint.trim().to_string())
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| config.endpoint().to_string());
        validate_endpoint(&endpoint)?;

        let idle_timeout = match overrides.timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => config.idle_timeout(),
        };

        Ok(Self {
            endpoint,
            idle_timeout,
            greeting: config.greeting().to_string(),
            services: config.services(),
        })
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), InvalidEndpoint> {
    let invalid = |reason: String| InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
