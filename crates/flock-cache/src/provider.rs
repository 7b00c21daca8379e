//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use tracing::info;

use flock_core::config::cache::CacheConfig;
use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;

/// Ephemeral store manager that wraps the configured backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store backend.
    inner: Arc<dyn EphemeralStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let inner: Arc<dyn EphemeralStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis ephemeral store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory ephemeral store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn EphemeralStore>) -> Self {
        Self { inner: store }
    }

    /// Get the shared backend handle.
    pub fn store(&self) -> Arc<dyn EphemeralStore> {
        Arc::clone(&self.inner)
    }
}
