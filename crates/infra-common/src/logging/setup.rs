use crate::errors::types::{Error, Result};
use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

/// Encoding of emitted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process-wide subscriber settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Base verbosity for every target
    pub level: Level,
    pub format: LogFormat,
    /// Per-target overrides such as `tablehub_session_core=debug`
    pub directives: Vec<String>,
    /// Report the source file and line of each event
    pub source_location: bool,
    /// Emit an event when a span opens and closes
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl LoggingConfig {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            format: LogFormat::Text,
            directives: Vec::new(),
            source_location: false,
            span_events: false,
        }
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn source_location(mut self, enabled: bool) -> Self {
        self.source_location = enabled;
        self
    }

    pub fn span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// `RUST_LOG`, then the base level, then each override in order.
    pub fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::from_default_env().add_directive(self.level.into());
        for raw in &self.directives {
            let directive: Directive = raw
                .parse()
                .map_err(|e| Error::Validation(format!("bad log directive `{}`: {}", raw, e)))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }
}

/// Install the global `tracing` subscriber.
///
/// Fails with [`Error::Initialization`] if one is already installed, so
/// tests and embedding binaries can call it without coordinating.
pub fn setup_logging(config: &LoggingConfig) -> Result<()> {
    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = fmt::Subscriber::builder()
        .with_env_filter(config.env_filter()?)
        .with_span_events(span_events)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| Error::Initialization(format!("subscriber already installed: {}", e)))?;

    tracing::debug!(level = %config.level, format = ?config.format, "logging initialized");
    Ok(())
}

/// Parse a level name (`trace` .. `error`, any case).
pub fn parse_level(name: &str) -> Result<Level> {
    name.trim()
        .parse()
        .map_err(|_| Error::Validation(format!("unknown log level `{}`", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("debug").unwrap(), Level::DEBUG);
        assert_eq!(parse_level(" WARN ").unwrap(), Level::WARN);
    }

    #[test]
    fn unknown_level_is_a_validation_error() {
        let err = parse_level("chatty").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn overrides_are_checked_when_building_the_filter() {
        let config = LoggingConfig::new(Level::INFO).directive("tablehub_session_core=debug");
        assert!(config.env_filter().is_ok());

        let config = config.directive("tablehub_session_core=shouty");
        assert!(matches!(config.env_filter(), Err(Error::Validation(_))));
    }

    #[test]
    fn format_names_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: LogFormat,
        }
        let parsed: Wrapper = ::config::Config::builder()
            .add_source(::config::File::from_str(
                "format = \"json\"",
                ::config::FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize())
            .unwrap();
        assert_eq!(parsed.format, LogFormat::Json);
    }

    #[test]
    fn second_install_is_an_error() {
        // Either this call or an earlier test installed the subscriber.
        let _ = setup_logging(&LoggingConfig::default());
        let again = setup_logging(&LoggingConfig::default());
        assert!(matches!(again, Err(Error::Initialization(_))));
    }
}
