/*!
Common infrastructure for the tablehub server.

This crate holds the pieces every other tablehub crate leans on:

- [`errors`]: the shared infrastructure error type
- [`logging`]: `tracing` subscriber setup
- [`config`]: layered configuration loading (defaults, file, environment)
*/

pub mod config;
pub mod errors;
pub mod logging;

pub use errors::{Error, Result};
