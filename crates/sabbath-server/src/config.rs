//! Server configuration

use anyhow::Context;
use sabbath_repository::{StoreBackend, StoreConfig};
use serde::{Deserialize, Serialize};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port (HTTP)
    pub port: u16,

    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Document store configuration
    pub store: StoreConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            store: StoreConfig::memory(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, `config/server.*` and environment variables
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        let mut config = Self::load_from("config/server")?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from an optional config file (any format the `config` crate
    /// recognises, extension optional) layered under `SABBATH_*` variables.
    ///
    /// Nested keys use `__`, e.g. `SABBATH_STORE__TIMEOUT_MS=2000`.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("SABBATH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    /// Apply the conventional `PORT`, `DATABASE_URL` and `DATABASE_NAME`
    /// variables on top of the loaded configuration.
    ///
    /// A `mongodb://` or `mongodb+srv://` URL also selects the MongoDB backend.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(port = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
                self.store.backend = StoreBackend::MongoDb;
            }
            self.store.url = Some(url);
        }

        if let Some(name) = lookup("DATABASE_NAME").filter(|n| !n.is_empty()) {
            self.store.database_name = Some(name);
        }
    }

    /// Address to bind, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
