use super::*;
use crate::error::UnifiedError;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_defaults_match_pipeline_constants() {
    let config = Config::default();
    assert_eq!(config.client.request_timeout, Duration::from_secs(10));
    assert_eq!(config.client.max_retries, 2);
    assert_eq!(config.client.retry_delay, Duration::from_secs(1));
    assert_eq!(config.cache.capacity, 100);
    assert_eq!(config.cache.sweep_interval, Duration::from_secs(300));
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_from_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bookfeed.toml");
    fs::write(
        &path,
        r#"
[client]
base_url = "https://shop.example.com"
request_timeout = "3s"
max_retries = 4

[cache]
capacity = 20
default_ttl = "1m"
"#,
    )
    .unwrap();

    let config = ConfigLoader::new().with_file(&path).load().unwrap();
    assert_eq!(config.client.base_url, "https://shop.example.com");
    assert_eq!(config.client.request_timeout, Duration::from_secs(3));
    assert_eq!(config.client.max_retries, 4);
    assert_eq!(config.cache.capacity, 20);
    assert_eq!(config.cache.default_ttl, Duration::from_secs(60));
    // untouched sections keep their defaults
    assert_eq!(config.stream, StreamConfig::default());
}

#[test]
fn test_load_from_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bookfeed.yaml");
    fs::write(
        &path,
        "logging:\n  level: debug\n  format: json\nstream:\n  books_path: /feed/books\n",
    )
    .unwrap();

    let config = ConfigLoader::new().with_file(&path).load().unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.stream.books_path, "/feed/books");
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_file(temp_dir.path().join("absent.json"))
        .load()
        .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let error = ConfigLoader::new().with_file(&path).load().unwrap_err();
    assert!(matches!(error, crate::error::FeedError::Config { .. }));
}

#[test]
fn test_env_overrides() {
    let vars: HashMap<&str, &str> = HashMap::from([
        (env_loader::BASE_URL, "https://api.example.com"),
        (env_loader::REQUEST_TIMEOUT, "250ms"),
        (env_loader::MAX_RETRIES, "0"),
        (env_loader::CACHE_CAPACITY, "5"),
    ]);
    let mut config = Config::default();
    env_loader::apply_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.client.base_url, "https://api.example.com");
    assert_eq!(config.client.request_timeout, Duration::from_millis(250));
    assert_eq!(config.client.max_retries, 0);
    assert_eq!(config.cache.capacity, 5);
}

#[test]
fn test_env_override_rejects_garbage() {
    let mut config = Config::default();
    let result = env_loader::apply_overrides(&mut config, |name| {
        (name == env_loader::MAX_RETRIES).then(|| "many".to_string())
    });
    assert!(result.is_err());
}

#[test]
fn test_validation_rejects_empty_base_url() {
    let config = ClientConfig::new("  ");
    assert!(config.validate().is_err());
}

#[test]
fn test_config_format_from_extension() {
    use std::path::Path;

    assert_eq!(ConfigFormat::from_path(Path::new("a/bookfeed.toml")).unwrap(), ConfigFormat::Toml);
    assert_eq!(ConfigFormat::from_path(Path::new("bookfeed.YML")).unwrap(), ConfigFormat::Yaml);
    assert_eq!(ConfigFormat::from_path(Path::new("bookfeed.json")).unwrap(), ConfigFormat::Json);
    assert_eq!(ConfigFormat::from_path(Path::new("bookfeedrc")).unwrap(), ConfigFormat::Json);
    assert!(ConfigFormat::from_path(Path::new("bookfeed.ini")).is_err());
}

#[test]
fn test_unsupported_extension_is_rejected_before_reading() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bookfeed.ini");
    fs::write(&path, "[client]\nbase_url = x\n").unwrap();

    let error = ConfigLoader::new().with_file(&path).load().unwrap_err();
    assert!(error.message().contains(".ini"));
}

#[test]
fn test_invalid_section_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bookfeed.toml");
    fs::write(&path, "[cache]\ncapacity = 0\n").unwrap();

    let error = file_loader::load_from_file(&path).unwrap_err();
    assert_eq!(error.message(), "cache capacity must be at least 1");
    assert!(error.context().unwrap().contains("bookfeed.toml"));
}

#[test]
fn test_parse_reports_format_in_message() {
    let error = ConfigFormat::Toml.parse("client = [").unwrap_err();
    assert!(error.message().starts_with("Invalid TOML"));
    let error = ConfigFormat::Json.parse("{").unwrap_err();
    assert!(error.message().starts_with("Invalid JSON"));
}
