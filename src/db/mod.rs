pub mod mapper;
pub mod queries;
pub mod repository;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ClientError, Result};

pub use repository::ClientRepository;

/// Name of the table holding client rows.
pub const CLIENTS_TABLE: &str = "clients";

/// Handle to the clients database.
///
/// The pool is capped at one connection that is never recycled, so every
/// clone of the handle talks to the same SQLite connection.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

impl Database {
    /// Open (creating if needed) the database file at `path` and make sure
    /// the schema exists. The parent directory is created as well.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::StorageUnavailable(sqlx::Error::Io(e)))?;
        }

        info!(path = %path.display(), "opening clients database");
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        Self::connect_with(options).await
    }

    /// Private in-memory database, used by tests.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(ClientError::StorageUnavailable)?;

        Self::connect_with(options).await
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        Self::open(config.database_path()).await
    }

    async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    // LIKE searches are case sensitive
                    sqlx::query("PRAGMA case_sensitive_like = ON")
                        .execute(conn)
                        .await?;
                    Ok(())
                })
            })
            .connect_with(options)
            .await
            .map_err(ClientError::StorageUnavailable)?;

        let db = Self { pool };
        db.ensure_schema().await?;

        Ok(db)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(&queries::create_table(CLIENTS_TABLE))
            .execute(self.get_pool())
            .await
            .map_err(ClientError::StorageUnavailable)?;
        debug!(table = CLIENTS_TABLE, "schema ensured");

        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

static SHARED: Mutex<Option<Arc<Database>>> = Mutex::const_new(None);

/// Process-wide database handle.
///
/// The first call opens the configured file and ensures the schema; every
/// later call returns the same handle until [`shutdown`] is called.
pub async fn acquire(config: &Config) -> Result<Arc<Database>> {
    let mut slot = SHARED.lock().await;
    if let Some(db) = slot.as_ref() {
        debug!("using existing database handle");
        return Ok(Arc::clone(db));
    }

    let db = Arc::new(Database::from_config(config).await?);
    *slot = Some(Arc::clone(&db));
    info!("database handle ready");

    Ok(db)
}

/// Close the shared handle. The next [`acquire`] opens a fresh one.
pub async fn shutdown() {
    if let Some(db) = SHARED.lock().await.take() {
        db.close().await;
        info!("database handle closed");
    }
}
