//! Configuration for the bookfeed pipeline
//!
//! Configuration can be assembled from several sources:
//! - built-in defaults
//! - a configuration file (TOML, YAML or JSON, picked by extension)
//! - environment variables with the `BOOKFEED_` prefix
//!
//! Sources are applied in the order they were added to [`ConfigLoader`].

pub mod env_loader;
pub mod file_loader;
mod loader;
mod model;
pub mod timeouts;

#[cfg(test)]
mod tests;

pub use file_loader::ConfigFormat;
pub use loader::{ConfigLoader, ConfigSource};
pub use model::{
    CacheConfig, ClientConfig, Config, LogFormat, LoggingConfig, RecommendationConfig,
    StreamConfig,
};
