//! Unit tests for ServerConfig file loading

use sabbath_repository::StoreBackend;
use sabbath_server::config::{LogFormat, ServerConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent");

    let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();

    assert_eq!(config.port, 8000);
    assert_eq!(config.store.backend, StoreBackend::Memory);
}

#[test]
fn test_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("server.yaml"),
        r#"
host: 127.0.0.1
port: 9100
log_format: json
store:
  backend: mongodb
  url: mongodb://localhost:27017
  database_name: sabbath
  timeout_ms: 1500
"#,
    )
    .unwrap();

    let path = temp_dir.path().join("server");
    let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9100);
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.log_level, "info");
    assert_eq!(config.store.backend, StoreBackend::MongoDb);
    assert_eq!(config.store.url.as_deref(), Some("mongodb://localhost:27017"));
    assert_eq!(config.store.database_name.as_deref(), Some("sabbath"));
    assert_eq!(config.store.timeout_ms, 1500);
}

#[test]
fn test_toml_file_partial() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("server.toml"),
        r#"
port = 8200

[store]
timeout_ms = 300
"#,
    )
    .unwrap();

    let path = temp_dir.path().join("server");
    let config = ServerConfig::load_from(path.to_str().unwrap()).unwrap();

    assert_eq!(config.port, 8200);
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.store.backend, StoreBackend::Memory);
    assert_eq!(config.store.timeout_ms, 300);
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("server.yaml"), "port: [not, a, port").unwrap();

    let path = temp_dir.path().join("server");
    assert!(ServerConfig::load_from(path.to_str().unwrap()).is_err());
}
