/*!
Configuration System

Layered configuration loading for tablehub components:

- Built-in defaults (via `#[serde(default)]` on the target type)
- An optional configuration file (format picked from the extension)
- Inline TOML snippets
- Environment variables with a component prefix
*/

pub mod loader;

pub use loader::ConfigLoader;
