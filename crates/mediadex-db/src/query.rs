//! Raw ranked-search collaborator over both shards.
//!
//! Splits the query into words, requires every word to appear in the file
//! name (case-insensitive), and returns primary-shard matches followed by
//! secondary-shard matches. Duplicate `file_id`s across the shards are
//! returned as-is; deduplication belongs to the federated layer.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use mediadex_core::{Error, FileRecord, RankedQuery, RawMatches, Result};

use crate::escape_like;

/// Word-match ranked query over the two shard databases.
pub struct PgRankedQuery {
    primary: Pool<Postgres>,
    secondary: Pool<Postgres>,
}

impl PgRankedQuery {
    /// Create a new collaborator over the two shard pools.
    pub fn new(primary: Pool<Postgres>, secondary: Pool<Postgres>) -> Self {
        Self { primary, secondary }
    }

    /// Build the WHERE clause for a word-AND filter: one ILIKE term per
    /// word, parameters $1..$n.
    fn build_filter(words: &[String]) -> String {
        let mut clause = String::from("TRUE");
        for idx in 1..=words.len() {
            clause.push_str(&format!(" AND file_name ILIKE ${} ESCAPE '\\'", idx));
        }
        clause
    }

    async fn shard_count(pool: &Pool<Postgres>, words: &[String]) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) AS n FROM file_record WHERE {}",
            Self::build_filter(words)
        );
        let mut q = sqlx::query(&sql);
        for word in words {
            q = q.bind(format!("%{}%", escape_like(word)));
        }
        let row = q
            .fetch_one(pool)
            .await
            .map_err(Error::StoreUnavailable)?;
        Ok(row.get("n"))
    }

    async fn shard_fetch(
        pool: &Pool<Postgres>,
        words: &[String],
        limit: u32,
    ) -> Result<Vec<FileRecord>> {
        let sql = format!(
            "SELECT file_id, file_name, file_size, mime_type, caption
             FROM file_record
             WHERE {}
             ORDER BY file_name
             LIMIT ${}",
            Self::build_filter(words),
            words.len() + 1
        );
        let mut q = sqlx::query(&sql);
        for word in words {
            q = q.bind(format!("%{}%", escape_like(word)));
        }
        q = q.bind(i64::from(limit));

        let rows = q
            .fetch_all(pool)
            .await
            .map_err(Error::StoreUnavailable)?;

        Ok(rows
            .into_iter()
            .map(|row| FileRecord {
                file_id: row.get("file_id"),
                file_name: row.get("file_name"),
                file_size: row.get("file_size"),
                mime_type: row.get("mime_type"),
                caption: row.get("caption"),
            })
            .collect())
    }
}

#[async_trait]
impl RankedQuery for PgRankedQuery {
    async fn raw_search(&self, query: &str, limit: u32) -> Result<RawMatches> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if words.is_empty() {
            return Ok(RawMatches::default());
        }

        let primary_total = Self::shard_count(&self.primary, &words).await?;
        let secondary_total = Self::shard_count(&self.secondary, &words).await?;

        let mut records = Self::shard_fetch(&self.primary, &words, limit).await?;
        if (records.len() as u32) < limit {
            let remaining = limit - records.len() as u32;
            records.extend(Self::shard_fetch(&self.secondary, &words, remaining).await?);
        }

        debug!(
            subsystem = "db",
            component = "query",
            op = "raw_search",
            query,
            result_count = records.len(),
            "Raw search collected"
        );

        Ok(RawMatches {
            records,
            total_count: primary_total + secondary_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_no_words() {
        assert_eq!(PgRankedQuery::build_filter(&[]), "TRUE");
    }

    #[test]
    fn test_build_filter_numbers_params() {
        let words = vec!["matrix".to_string(), "1080p".to_string()];
        let clause = PgRankedQuery::build_filter(&words);
        assert!(clause.contains("file_name ILIKE $1"));
        assert!(clause.contains("file_name ILIKE $2"));
        assert!(!clause.contains("$3"));
    }
}
