use async_trait::async_trait;
use narrate_core::store::{SnapshotStore, StoreConfig, StoreError, StoreFactory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::repository::SqliteSnapshotStore;

const MEMORY: &str = ":memory:";

/// [`StoreFactory`] for SQLite.
///
/// Register it with a [`narrate_core::store::StoreRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use narrate_core::store::StoreRegistry;
/// use narrate_db_sqlite::SqliteStoreFactory;
///
/// let mut registry = StoreRegistry::new();
/// registry.register(Box::new(SqliteStoreFactory));
/// ```
pub struct SqliteStoreFactory;

impl SqliteStoreFactory {
    async fn open(connection_string: &str) -> Result<SqliteSnapshotStore, StoreError> {
        if connection_string == MEMORY {
            // Every pooled connection to :memory: is a separate database.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect("sqlite::memory:")
                .await
                .map_err(|e| StoreError::Connection(e.to_string()))?;
            return Ok(SqliteSnapshotStore::new_with_pool(pool));
        }

        if connection_string.starts_with("sqlite:") {
            return SqliteSnapshotStore::new(connection_string).await;
        }

        // Bare path: read-write, created if missing.
        let options = SqliteConnectOptions::new()
            .filename(connection_string)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(format!("{connection_string}: {e}")))?;
        Ok(SqliteSnapshotStore::new_with_pool(pool))
    }
}

#[async_trait]
impl StoreFactory for SqliteStoreFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Accepted connection strings:
    /// * a file path such as `"taxnarrate.db"`, created if it does not exist;
    /// * `":memory:"` for a single-connection in-memory database;
    /// * a full sqlx URL starting with `sqlite:`.
    async fn create(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn SnapshotStore>, StoreError> {
        let store = Self::open(&config.connection_string).await?;
        store.run_migrations().await?;
        info!(database = %config.connection_string, "sqlite store ready");
        Ok(Box::new(store))
    }
}
