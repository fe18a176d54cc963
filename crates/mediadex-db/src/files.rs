//! Shard store implementation over PostgreSQL.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};

use mediadex_core::{
    CompiledPattern, Error, FileRecord, FileRef, Result, Shard, ShardStore,
};

/// PostgreSQL implementation of [`ShardStore`].
///
/// One instance per shard; the shard label tags results and log events and
/// never influences query semantics. Patterns are validated client-side
/// before reaching this type and evaluated server-side with the `~*`
/// operator, matching the case-insensitive contract.
pub struct PgFileRepository {
    pool: Pool<Postgres>,
    shard: Shard,
}

impl PgFileRepository {
    /// Create a new repository over the given pool, labeled with `shard`.
    pub fn new(pool: Pool<Postgres>, shard: Shard) -> Self {
        Self { pool, shard }
    }

    fn row_to_ref(row: &sqlx::postgres::PgRow) -> FileRef {
        FileRef {
            file_id: row.get("file_id"),
            file_name: row.get("file_name"),
        }
    }
}

#[async_trait]
impl ShardStore for PgFileRepository {
    fn shard(&self) -> Shard {
        self.shard
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM file_record")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::StoreUnavailable)?;
        Ok(row.get("n"))
    }

    #[instrument(skip(self, record), fields(shard = self.shard.as_str(), file_id = %record.file_id))]
    async fn insert(&self, record: &FileRecord) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO file_record (file_id, file_name, file_size, mime_type, caption)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (file_id) DO NOTHING",
        )
        .bind(&record.file_id)
        .bind(&record.file_name)
        .bind(record.file_size)
        .bind(&record.mime_type)
        .bind(&record.caption)
        .execute(&self.pool)
        .await
        .map_err(Error::StoreUnavailable)?;

        let inserted = result.rows_affected() == 1;
        if !inserted {
            debug!(
                subsystem = "db",
                component = "files",
                shard = self.shard.as_str(),
                file_id = %record.file_id,
                "Duplicate file id within shard, insert skipped"
            );
        }
        Ok(inserted)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<FileRef>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT file_id, file_name FROM file_record WHERE file_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::StoreUnavailable)?;

        Ok(rows.iter().map(Self::row_to_ref).collect())
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT file_id FROM file_record")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::StoreUnavailable)?;
        Ok(rows.iter().map(|r| r.get("file_id")).collect())
    }

    async fn find_by_pattern(&self, pattern: &CompiledPattern) -> Result<Vec<FileRef>> {
        let rows = sqlx::query(
            "SELECT file_id, file_name FROM file_record
             WHERE file_name ~* $1
             ORDER BY file_name",
        )
        .bind(pattern.source())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::StoreUnavailable)?;

        Ok(rows.iter().map(Self::row_to_ref).collect())
    }

    #[instrument(skip(self, ids), fields(shard = self.shard.as_str(), id_count = ids.len()))]
    async fn delete_by_ids(&self, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM file_record WHERE file_id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(Error::StoreUnavailable)?;

        debug!(
            subsystem = "db",
            component = "files",
            op = "delete_by_ids",
            shard = self.shard.as_str(),
            removed_count = result.rows_affected(),
            "Bulk delete finished"
        );
        Ok(result.rows_affected())
    }
}
