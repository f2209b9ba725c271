//! Configuration for the portal lifecycle coordinator.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DAY_MS;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for the coordinator and its sub-behaviors.
///
/// Missing keys in a TOML file fall back to [`PortalConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Display name used in startup logs.
    pub app_name: String,
    /// Well-known URL of the background worker script.
    pub worker_url: String,
    /// Days a dismissed install banner stays suppressed.
    pub install_cooldown_days: u32,
    /// Storage key of the dismissal timestamp.
    pub dismissed_key: String,
    /// Storage key of the last-visited record.
    pub last_visited_key: String,
    /// Confirmation text shown when a new version is installed.
    pub update_message: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            app_name: "Servicetechniker Portal".to_string(),
            worker_url: "sw.js".to_string(),
            install_cooldown_days: 7,
            dismissed_key: "installBannerDismissed".to_string(),
            last_visited_key: "lastVisited".to_string(),
            update_message: "Eine neue Version ist verfügbar. Jetzt aktualisieren?".to_string(),
        }
    }
}

impl PortalConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker script URL.
    #[must_use]
    pub fn with_worker_url(mut self, url: impl Into<String>) -> Self {
        self.worker_url = url.into();
        self
    }

    /// Sets the install banner cooldown in days.
    #[must_use]
    pub const fn with_install_cooldown_days(mut self, days: u32) -> Self {
        self.install_cooldown_days = days;
        self
    }

    /// Sets the reload confirmation text.
    #[must_use]
    pub fn with_update_message(mut self, message: impl Into<String>) -> Self {
        self.update_message = message.into();
        self
    }

    /// Cooldown in epoch milliseconds.
    pub fn install_cooldown_ms(&self) -> i64 {
        i64::from(self.install_cooldown_days) * DAY_MS
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_url.trim().is_empty() {
            return Err(ConfigError::Invalid("worker_url must not be empty".into()));
        }
        if self.dismissed_key.is_empty() || self.last_visited_key.is_empty() {
            return Err(ConfigError::Invalid("storage keys must not be empty".into()));
        }
        if self.dismissed_key == self.last_visited_key {
            return Err(ConfigError::Invalid(format!(
                "dismissed_key and last_visited_key share the key {:?}",
                self.dismissed_key
            )));
        }
        Ok(())
    }
}
