//! From trait implementations for FeedError conversions

use super::types::FeedError;

impl From<std::io::Error> for FeedError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for FeedError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {}", error))
    }
}

impl From<serde_yaml::Error> for FeedError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("Invalid YAML: {}", error))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string());
        if let Some(status) = error.status() {
            return Self::Http {
                message: error.to_string(),
                url,
                status_code: Some(status.as_u16()),
                details: None,
            };
        }
        if error.is_decode() {
            return Self::json_with_context(error.to_string(), "Decoding response body");
        }
        // Builder errors (bad URL, bad header) are caller mistakes, not transport failures
        if error.is_builder() {
            return Self::invalid_input(error.to_string());
        }
        Self::Connection {
            message: error.to_string(),
            url,
        }
    }
}
