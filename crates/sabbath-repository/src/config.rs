//! Store configuration types
//!
//! Selects the backend and bounds every store call with a timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Store backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store (data is lost on restart)
    #[default]
    Memory,
    /// MongoDB (requires the `mongodb` feature)
    MongoDb,
}

fn default_timeout_ms() -> u64 {
    5_000
}

/// Store configuration
///
/// # Examples
///
/// ```rust
/// use sabbath_repository::{StoreBackend, StoreConfig};
///
/// let config = StoreConfig::memory();
/// assert_eq!(config.backend, StoreBackend::Memory);
///
/// let config = StoreConfig::mongodb("mongodb://localhost:27017", "sabbath")
///     .with_timeout_ms(2_000);
/// assert_eq!(config.timeout().as_millis(), 2_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend type
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection URL (required for MongoDb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Database name (required for MongoDb)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,

    /// Upper bound for any single store call, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl StoreConfig {
    /// In-memory store configuration
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            url: None,
            database_name: None,
            timeout_ms: default_timeout_ms(),
        }
    }

    /// MongoDB store configuration
    pub fn mongodb(url: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::MongoDb,
            url: Some(url.into()),
            database_name: Some(database_name.into()),
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
