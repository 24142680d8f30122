//! Document store construction from configuration

use anyhow::Result;
use sabbath_repository::{DocumentStore, InMemoryStore, StoreBackend, StoreConfig, TimeoutStore};
use std::sync::Arc;
use tracing::info;

/// Build the configured store, bounded by the configured timeout.
///
/// Connecting does not fail when the backend is down: the driver connects
/// lazily, so an unreachable database surfaces later as `StorageUnavailable`.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    let timeout = config.timeout();

    let store: Arc<dyn DocumentStore> = match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store (data is lost on restart)");
            Arc::new(TimeoutStore::new(InMemoryStore::new(), timeout))
        }
        StoreBackend::MongoDb => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("store.url (or DATABASE_URL) is required for MongoDB"))?;
            let database_name = config.database_name.as_deref().ok_or_else(|| {
                anyhow::anyhow!("store.database_name (or DATABASE_NAME) is required for MongoDB")
            })?;

            #[cfg(feature = "mongodb")]
            {
                use sabbath_repository::MongoStore;

                info!(database = database_name, "Using MongoDB document store");
                let mongo = MongoStore::connect(url, database_name, timeout)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to create MongoDB store: {}", e))?;
                Arc::new(TimeoutStore::new(mongo, timeout))
            }
            #[cfg(not(feature = "mongodb"))]
            {
                let _ = (url, database_name);
                tracing::warn!("MongoDB store feature not enabled");
                return Err(anyhow::anyhow!(
                    "Enable 'mongodb' feature to use the MongoDB document store"
                ));
            }
        }
    };

    Ok(store)
}
