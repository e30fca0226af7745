/*!
Logging

Standardized `tracing` setup for tablehub binaries and tests.
*/

pub mod setup;

pub use setup::{parse_level, setup_logging, LogFormat, LoggingConfig};
