//! Lazily established, process-wide handle to the todo collection.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::config::{StoreConfig, COLLECTION_NAME, DATABASE_NAME};
use crate::store::{MongoStore, RedisStore, StoreError, StoreResult, TodoStore};

/// Opens a new handle to the todo collection.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> StoreResult<Arc<dyn TodoStore>>;
}

#[async_trait]
impl Connector for StoreConfig {
    async fn connect(&self) -> StoreResult<Arc<dyn TodoStore>> {
        let store: Arc<dyn TodoStore> = match self {
            StoreConfig::Mongo { uri } => {
                Arc::new(MongoStore::connect(uri, DATABASE_NAME, COLLECTION_NAME).await?)
            }
            StoreConfig::Redis { url } => {
                Arc::new(RedisStore::connect(url, DATABASE_NAME, COLLECTION_NAME).await?)
            }
        };
        Ok(store)
    }
}

/// Connects on first use and caches the handle for the rest of the process.
///
/// Concurrent first callers wait on a single attempt. A failed attempt is not
/// cached, so the next caller tries again.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    store: OnceCell<Arc<dyn TodoStore>>,
}

impl ConnectionManager {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            store: OnceCell::new(),
        }
    }

    pub async fn ensure_connected(&self) -> StoreResult<Arc<dyn TodoStore>> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let store = self.connector.connect().await?;
                tracing::info!(
                    database = DATABASE_NAME,
                    collection = COLLECTION_NAME,
                    "Connected to document store"
                );
                Ok::<_, StoreError>(store)
            })
            .await?;

        Ok(Arc::clone(store))
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }
}
