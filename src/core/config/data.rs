use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/chat";

/// Idle timeout applied to the response headers and to every body chunk.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_GREETING: &str =
    "Hi! I'm the Headstarter support assistant. How can I help you today?";

pub const DEFAULT_SERVICES: [&str; 3] = ["Service 1", "Service 2", "Service 3"];

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Chat endpoint that receives the conversation as a JSON array
    pub endpoint: Option<String>,
    /// Seconds to wait for the next piece of a reply; 0 waits forever
    pub timeout_secs: Option<u64>,
    /// Assistant message that opens every consultation
    pub greeting: Option<String>,
    /// Services listed on the recommendations page
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

/// Keys accepted by `headstart set` / `headstart unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Endpoint,
    TimeoutSecs,
    Greeting,
    Services,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Endpoint,
        ConfigKey::TimeoutSecs,
        ConfigKey::Greeting,
        ConfigKey::Services,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Endpoint => "endpoint",
            ConfigKey::TimeoutSecs => "timeout-secs",
            ConfigKey::Greeting => "greeting",
            ConfigKey::Services => "services",
        }
    }

    /// Field name in `config.toml`.
    pub fn toml_name(self) -> &'static str {
        match self {
            ConfigKey::TimeoutSecs => "timeout_secs",
            other => other.as_str(),
        }
    }

    /// Accepts the command-line spelling or the TOML field name, in any case.
    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| {
            candidate.as_str().eq_ignore_ascii_case(key)
                || candidate.toml_name().eq_ignore_ascii_case(key)
        })
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

impl Config {
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.trim().is_empty())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        match self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(DEFAULT_GREETING)
    }

    pub fn services(&self) -> Vec<String> {
        if self.services.is_empty() {
            DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect()
        } else {
            self.services.clone()
        }
    }

    /// Apply `headstart set <key> <values...>`.
    pub fn set_value(&mut self, key: ConfigKey, values: &[String]) -> Result<(), String> {
        let joined = values.join(" ");
        let joined = joined.trim();
        if joined.is_empty() {
            return Err(format!("A value is required for {}", key.as_str()));
        }

        match key {
            ConfigKey::Endpoint => self.endpoint = Some(joined.to_string()),
            ConfigKey::TimeoutSecs => {
                let secs = joined
                    .parse::<u64>()
                    .map_err(|_| format!("timeout-secs must be a whole number, got '{joined}'"))?;
                self.timeout_secs = Some(secs);
            }
            ConfigKey::Greeting => self.greeting = Some(joined.to_string()),
            ConfigKey::Services => {
                self.services = joined
                    .split(',')
                    .map(str::trim)
                    .filter(|service| !service.is_empty())
                    .map(ToOwned::to_owned)
                    .collect();
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::Endpoint => self.endpoint = None,
            ConfigKey::TimeoutSecs => self.timeout_secs = None,
            ConfigKey::Greeting => self.greeting = None,
            ConfigKey::Services => self.services.clear(),
        }
    }
}
