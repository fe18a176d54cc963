//! # mediadex-db
//!
//! PostgreSQL shard-store layer for mediadex.
//!
//! This crate provides:
//! - Connection pool management (one pool per shard)
//! - The [`ShardStore`] implementation over a `file_record` table
//! - The raw ranked-search collaborator used by the federated index
//! - An in-memory store for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediadex_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect(
//!         "postgres://localhost/mediadex_primary",
//!         "postgres://localhost/mediadex_secondary",
//!     )
//!     .await?;
//!
//!     println!("primary holds {} files", db.primary.count().await?);
//!     Ok(())
//! }
//! ```

pub mod files;
pub mod memory;
pub mod pool;
pub mod query;

// Test fixtures for integration tests
// Note: always compiled so integration tests (in tests/) can use
// DEFAULT_TEST_DATABASE_URL.
pub mod test_fixtures;

// Re-export core types
pub use mediadex_core::*;

pub use files::PgFileRepository;
pub use memory::{MemoryRankedQuery, MemoryShardStore};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use query::PgRankedQuery;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Shard database URLs, one per physical partition.
#[derive(Debug, Clone)]
pub struct ShardUrls {
    pub primary: String,
    pub secondary: String,
}

impl ShardUrls {
    /// Read shard URLs from `MEDIADEX_PRIMARY_DATABASE_URL` and
    /// `MEDIADEX_SECONDARY_DATABASE_URL`.
    pub fn from_env() -> Result<Self> {
        let primary = std::env::var("MEDIADEX_PRIMARY_DATABASE_URL")
            .map_err(|_| Error::Config("MEDIADEX_PRIMARY_DATABASE_URL is not set".into()))?;
        let secondary = std::env::var("MEDIADEX_SECONDARY_DATABASE_URL")
            .map_err(|_| Error::Config("MEDIADEX_SECONDARY_DATABASE_URL is not set".into()))?;
        Ok(Self { primary, secondary })
    }
}

/// Combined database context over both shards.
pub struct Database {
    /// Primary (canonical) shard pool.
    pub primary_pool: sqlx::Pool<sqlx::Postgres>,
    /// Secondary shard pool.
    pub secondary_pool: sqlx::Pool<sqlx::Postgres>,
    /// Canonical shard store.
    pub primary: PgFileRepository,
    /// Secondary shard store.
    pub secondary: PgFileRepository,
    /// Raw ranked-search collaborator over both shards.
    pub query: PgRankedQuery,
}

impl Database {
    /// Create a new Database from two existing pools.
    pub fn new(
        primary_pool: sqlx::Pool<sqlx::Postgres>,
        secondary_pool: sqlx::Pool<sqlx::Postgres>,
    ) -> Self {
        Self {
            primary: PgFileRepository::new(primary_pool.clone(), Shard::Primary),
            secondary: PgFileRepository::new(secondary_pool.clone(), Shard::Secondary),
            query: PgRankedQuery::new(primary_pool.clone(), secondary_pool.clone()),
            primary_pool,
            secondary_pool,
        }
    }

    /// Connect both shards with default pool configuration.
    pub async fn connect(primary_url: &str, secondary_url: &str) -> Result<Self> {
        let primary_pool = create_pool(Shard::Primary, primary_url).await?;
        let secondary_pool = create_pool(Shard::Secondary, secondary_url).await?;
        Ok(Self::new(primary_pool, secondary_pool))
    }

    /// Connect both shards with custom pool configuration.
    pub async fn connect_with_config(urls: &ShardUrls, config: PoolConfig) -> Result<Self> {
        let primary_pool =
            create_pool_with_config(Shard::Primary, &urls.primary, config.clone()).await?;
        let secondary_pool =
            create_pool_with_config(Shard::Secondary, &urls.secondary, config).await?;
        Ok(Self::new(primary_pool, secondary_pool))
    }

    /// Run pending migrations on both shards.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        let migrator = sqlx::migrate!("../../migrations");
        migrator
            .run(&self.primary_pool)
            .await
            .map_err(|e| Error::StoreUnavailable(sqlx::Error::Migrate(Box::new(e))))?;
        migrator
            .run(&self.secondary_pool)
            .await
            .map_err(|e| Error::StoreUnavailable(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }
}
