//! Coordinator configuration
//!
//! Loaded through [`ConfigLoader`]: defaults, then an optional file, then
//! `TABLEHUB__*` environment variables (e.g. `TABLEHUB__LOGGING__LEVEL=debug`).

use crate::errors::{Result, SessionError};
use serde::Deserialize;
use std::path::Path;
use tablehub_infra_common::config::ConfigLoader;
use tablehub_infra_common::logging::{parse_level, setup_logging, LogFormat, LoggingConfig};

pub const ENV_PREFIX: &str = "TABLEHUB";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Capacity of the outbound lobby event channel
    pub event_capacity: usize,
    /// Re-attach disconnected spectators to their tables on reconnect
    pub reattach_spectators: bool,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    /// Per-target overrides, e.g. `["tablehub_session_core=debug"]`
    pub directives: Vec<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            event_capacity: 256,
            reattach_spectators: true,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            directives: Vec::new(),
        }
    }
}

impl CoordinatorConfig {
    /// Load from defaults, an optional file, and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut loader = ConfigLoader::new(ENV_PREFIX);
        if let Some(path) = path {
            loader = loader.with_file(path, true);
        }
        let config: Self = loader.load()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse an inline TOML document, ignoring the environment.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = ConfigLoader::from_toml_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_capacity == 0 {
            return Err(SessionError::Config("event_capacity must be greater than 0".into()));
        }
        self.logging_config()?.env_filter()?;
        Ok(())
    }

    pub fn logging_config(&self) -> Result<LoggingConfig> {
        let level = parse_level(&self.logging.level)?;
        let config = self
            .logging
            .directives
            .iter()
            .fold(LoggingConfig::new(level), |config, directive| {
                config.directive(directive.as_str())
            });
        Ok(config.format(self.logging.format))
    }

    /// Install the global `tracing` subscriber described by this config and
    /// log the startup line.
    pub fn init_logging(&self) -> Result<()> {
        setup_logging(&self.logging_config()?)?;
        tracing::info!(
            "Starting tablehub session coordinator v{} (event capacity {}, spectator re-attach {})",
            env!("CARGO_PKG_VERSION"),
            self.event_capacity,
            if self.reattach_spectators { "on" } else { "off" }
        );
        Ok(())
    }
}
