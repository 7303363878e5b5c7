//! Configuration files
//!
//! The format is picked from the extension: `.toml`, `.yaml`/`.yml` or
//! `.json`. A file without an extension is read as JSON.

use super::model::Config;
use crate::error::{FeedError, FeedResult, UnifiedError};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> FeedResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") | None => Ok(Self::Json),
            Some(other) => Err(FeedError::config_with_context(
                format!("Unsupported config file extension '.{}'", other),
                "Expected .toml, .yaml, .yml or .json",
            )),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Deserialize a whole [`Config`]; absent sections keep their defaults
    pub fn parse(self, content: &str) -> FeedResult<Config> {
        match self {
            Self::Toml => Ok(toml::from_str(content)?),
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
            Self::Json => serde_json::from_str(content)
                .map_err(|e| FeedError::config(format!("Invalid JSON: {}", e))),
        }
    }
}

/// Load and validate the configuration stored at `path`.
///
/// A missing file yields the defaults. Errors carry the file path in their
/// context.
pub fn load_from_file(path: &Path) -> FeedResult<Config> {
    let format = ConfigFormat::from_path(path)?;
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(FeedError::config_with_context(
                format!("Failed to read config file: {}", e),
                format!("Reading '{}'", path.display()),
            ));
        }
    };

    let config = format
        .parse(&content)
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|e| attribute_to_file(&e, path))?;

    tracing::debug!(path = %path.display(), format = format.name(), "config file loaded");
    Ok(config)
}

fn attribute_to_file(error: &FeedError, path: &Path) -> FeedError {
    let context = match error.context() {
        Some(context) => format!("{} in '{}'", context, path.display()),
        None => format!("Loading '{}'", path.display()),
    };
    FeedError::config_with_context(error.message(), context)
}
