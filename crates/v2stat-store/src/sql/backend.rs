//! SQL traffic store backend.

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::debug;

use super::config::StoreConfig;
use super::queries::{self, Queries};
use crate::StoreError;

/// Database type enum for query selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// PostgreSQL database.
    PostgreSQL,
    /// MySQL/MariaDB database.
    MySQL,
    /// SQLite database.
    SQLite,
}

impl DatabaseType {
    /// Detect database type from URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if url.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    pub(crate) fn queries(self) -> &'static Queries {
        match self {
            Self::PostgreSQL => &queries::POSTGRES,
            Self::MySQL => &queries::MYSQL,
            Self::SQLite => &queries::SQLITE,
        }
    }
}

/// SQL-backed traffic store.
///
/// Owns the connection pool and the store configuration. All operations
/// borrow `&self`, so one store can be shared between the poll loop and
/// readers.
///
/// # Example
///
/// ```ignore
/// use v2stat_store::{StatsStore, StoreConfig};
///
/// let store = StatsStore::connect(StoreConfig::new("sqlite://traffic.db?mode=rwc")).await?;
/// store.init_schema().await?;
/// ```
pub struct StatsStore {
    pool: AnyPool,
    db_type: DatabaseType,
    config: StoreConfig,
}

impl StatsStore {
    /// Connect to the database.
    ///
    /// This does not create the schema; call [`StatsStore::init_schema`].
    pub async fn connect(config: StoreConfig) -> Result<Self, StoreError> {
        // Install database drivers for the "any" pool
        sqlx::any::install_default_drivers();

        let db_type = DatabaseType::from_url(&config.database_url)
            .ok_or_else(|| StoreError::UnsupportedUrl(redact_url(&config.database_url)))?;

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(&config.database_url)
            .await?;

        // WAL lets readers run while a poll cycle is being written.
        if db_type == DatabaseType::SQLite && !is_sqlite_memory(&config.database_url) {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
        }

        Ok(Self {
            pool,
            db_type,
            config,
        })
    }

    /// Create tables and indexes if they do not exist.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        for stmt in self.queries().schema {
            sqlx::query(*stmt).execute(&self.pool).await?;
        }
        debug!(db_type = ?self.db_type, "schema initialized");
        Ok(())
    }

    /// Get the connection pool (for advanced usage).
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Get database type.
    pub fn database_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Offset applied to timestamps when grouping into hours.
    pub fn bucket_offset_secs(&self) -> i64 {
        self.config.bucket_offset_secs
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub(crate) fn queries(&self) -> &'static Queries {
        self.db_type.queries()
    }
}

fn is_sqlite_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Strip credentials from a URL before it ends up in an error message.
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

// Debug implementation (don't leak credentials)
impl std::fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsStore")
            .field("db_type", &self.db_type)
            .field("max_connections", &self.config.max_connections)
            .field("bucket_offset_secs", &self.config.bucket_offset_secs)
            .finish_non_exhaustive()
    }
}
