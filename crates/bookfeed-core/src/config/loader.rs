//! Configuration loader builder

use super::model::Config;
use super::{env_loader, file_loader};
use crate::error::FeedResult;
use std::path::{Path, PathBuf};

/// A place configuration can come from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults; replaces everything loaded so far
    Default,
    /// A configuration file; replaces everything loaded so far
    File(PathBuf),
    /// `BOOKFEED_*` variables; overrides individual fields
    Environment,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Load configuration from all sources, then validate it
    pub fn load(self) -> FeedResult<Config> {
        let mut config = Config::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    tracing::debug!("loading default config");
                    config = Config::default();
                }
                ConfigSource::File(path) => {
                    tracing::debug!(path = %path.display(), "loading config from file");
                    config = file_loader::load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("applying environment overrides");
                    env_loader::apply_env(&mut config)?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}
