use crate::errors::types::{Error, Result};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Separator between the prefix and nested keys in environment variables,
/// e.g. `TABLEHUB__LOGGING__LEVEL=debug`.
pub const ENV_SEPARATOR: &str = "__";

/// Builds a configuration value from layered sources.
///
/// Later sources override earlier ones; environment variables are always
/// applied last.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Create a loader whose environment overrides use `env_prefix`.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: Some(env_prefix.into()),
        }
    }

    /// Create a loader that ignores the environment entirely.
    pub fn without_env() -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: None,
        }
    }

    /// Add a configuration file. A missing file is not an error unless `required`.
    pub fn with_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self.builder.add_source(File::from(path).required(required));
        self
    }

    /// Add an inline TOML document.
    pub fn with_toml(mut self, contents: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(contents, FileFormat::Toml));
        self
    }

    /// Resolve all sources into `T`.
    pub fn load<T: DeserializeOwned>(self) -> Result<T> {
        let mut builder = self.builder;
        if let Some(prefix) = self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let resolved = builder.build()?;
        resolved
            .try_deserialize::<T>()
            .map_err(|e| Error::Config(format!("Failed to deserialize config: {}", e)))
    }

    /// Shorthand for loading a TOML string without environment overrides.
    pub fn from_toml_str<T: DeserializeOwned>(contents: &str) -> Result<T> {
        Self::without_env().with_toml(contents).load()
    }
}
