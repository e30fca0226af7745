/*!
Error Handling

Standardized error types for the tablehub infrastructure layer.
*/

pub mod types;

pub use types::{Error, Result};
