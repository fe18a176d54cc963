//! In-memory shard store for deterministic testing.
//!
//! Backs the federated-index and admin test suites without a database.
//! Tracks how many store queries were issued (so fail-before-I/O contracts
//! can be asserted) and can be switched unavailable to simulate a
//! connection outage.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mediadex_core::{
    CompiledPattern, Error, FileRecord, FileRef, RankedQuery, RawMatches, Result, Shard,
    ShardStore,
};

/// In-memory implementation of [`ShardStore`].
///
/// Clones share the same underlying records, availability flag, and query
/// counter.
#[derive(Clone)]
pub struct MemoryShardStore {
    shard: Shard,
    records: Arc<Mutex<Vec<FileRecord>>>,
    available: Arc<AtomicBool>,
    query_count: Arc<AtomicUsize>,
}

impl MemoryShardStore {
    /// Create an empty store labeled with `shard`.
    pub fn new(shard: Shard) -> Self {
        Self {
            shard,
            records: Arc::new(Mutex::new(Vec::new())),
            available: Arc::new(AtomicBool::new(true)),
            query_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Seed the store with records (insertion order preserved).
    pub fn with_records(self, records: Vec<FileRecord>) -> Self {
        {
            let mut guard = self.records.lock().unwrap();
            *guard = records;
        }
        self
    }

    /// Flip availability; when unavailable every operation returns
    /// `Error::StoreUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of store operations issued so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the current records.
    pub fn records(&self) -> Vec<FileRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check(&self) -> Result<()> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::StoreUnavailable(sqlx::Error::PoolClosed))
        }
    }
}

#[async_trait]
impl ShardStore for MemoryShardStore {
    fn shard(&self) -> Shard {
        self.shard
    }

    async fn count(&self) -> Result<i64> {
        self.check()?;
        Ok(self.records.lock().unwrap().len() as i64)
    }

    async fn insert(&self, record: &FileRecord) -> Result<bool> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        if records.iter().any(|r| r.file_id == record.file_id) {
            return Ok(false);
        }
        records.push(record.clone());
        Ok(true)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<FileRef>> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| ids.contains(&r.file_id))
            .map(FileRecord::to_ref)
            .collect())
    }

    async fn all_ids(&self) -> Result<Vec<String>> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records.iter().map(|r| r.file_id.clone()).collect())
    }

    async fn find_by_pattern(&self, pattern: &CompiledPattern) -> Result<Vec<FileRef>> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|r| pattern.is_match(&r.file_name))
            .map(FileRecord::to_ref)
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<u64> {
        self.check()?;
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !ids.contains(&r.file_id));
        Ok((before - records.len()) as u64)
    }
}

/// In-memory [`RankedQuery`] over two [`MemoryShardStore`]s.
///
/// Matches are case-insensitive word-containment on the file name, primary
/// shard first, the same contract as the PostgreSQL collaborator.
#[derive(Clone)]
pub struct MemoryRankedQuery {
    primary: MemoryShardStore,
    secondary: MemoryShardStore,
}

impl MemoryRankedQuery {
    pub fn new(primary: MemoryShardStore, secondary: MemoryShardStore) -> Self {
        Self { primary, secondary }
    }

    fn matches(record: &FileRecord, words: &[String]) -> bool {
        let name = record.file_name.to_lowercase();
        words.iter().all(|w| name.contains(w.as_str()))
    }
}

#[async_trait]
impl RankedQuery for MemoryRankedQuery {
    async fn raw_search(&self, query: &str, limit: u32) -> Result<RawMatches> {
        let words: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            return Ok(RawMatches::default());
        }

        // The availability check below doubles as the query-count bump.
        self.primary.check()?;
        self.secondary.check()?;

        let mut matched: Vec<FileRecord> = self
            .primary
            .records()
            .into_iter()
            .filter(|r| Self::matches(r, &words))
            .collect();
        let secondary_matched: Vec<FileRecord> = self
            .secondary
            .records()
            .into_iter()
            .filter(|r| Self::matches(r, &words))
            .collect();

        let total_count = (matched.len() + secondary_matched.len()) as i64;
        matched.extend(secondary_matched);
        matched.truncate(limit as usize);

        Ok(RawMatches {
            records: matched,
            total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> FileRecord {
        FileRecord {
            file_id: id.to_string(),
            file_name: name.to_string(),
            file_size: 100,
            mime_type: None,
            caption: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_within_shard() {
        let store = MemoryShardStore::new(Shard::Primary);
        assert!(store.insert(&record("a1", "x.mp4")).await.unwrap());
        assert!(!store.insert(&record("a1", "renamed.mp4")).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_pattern() {
        let store = MemoryShardStore::new(Shard::Primary).with_records(vec![
            record("a1", "Matrix.1999.mkv"),
            record("b2", "inception.mp4"),
        ]);
        let pattern = CompiledPattern::new("matrix").unwrap();
        let hits = store.find_by_pattern(&pattern).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].file_id, "a1");
    }

    #[tokio::test]
    async fn test_unavailable_store_errors() {
        let store = MemoryShardStore::new(Shard::Secondary);
        store.set_available(false);
        let err = store.count().await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_query_count_tracks_operations() {
        let store = MemoryShardStore::new(Shard::Primary);
        assert_eq!(store.query_count(), 0);
        store.count().await.unwrap();
        store.all_ids().await.unwrap();
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_by_ids_returns_removed_count() {
        let store = MemoryShardStore::new(Shard::Secondary).with_records(vec![
            record("a1", "x.mp4"),
            record("b2", "y.mp4"),
            record("c3", "z.mp4"),
        ]);
        let removed = store
            .delete_by_ids(&["a1".to_string(), "c3".to_string(), "zz".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_ranked_query_word_and_semantics() {
        let primary = MemoryShardStore::new(Shard::Primary)
            .with_records(vec![record("a1", "The Matrix 1080p.mkv")]);
        let secondary = MemoryShardStore::new(Shard::Secondary)
            .with_records(vec![record("b2", "Matrix Reloaded 720p.mkv")]);
        let query = MemoryRankedQuery::new(primary, secondary);

        let raw = query.raw_search("matrix 1080p", 10).await.unwrap();
        assert_eq!(raw.records.len(), 1);
        assert_eq!(raw.records[0].file_id, "a1");
        assert_eq!(raw.total_count, 1);
    }

    #[tokio::test]
    async fn test_memory_ranked_query_duplicates_pass_through() {
        let primary =
            MemoryShardStore::new(Shard::Primary).with_records(vec![record("a1", "x.mp4")]);
        let secondary =
            MemoryShardStore::new(Shard::Secondary).with_records(vec![record("a1", "x.mp4")]);
        let query = MemoryRankedQuery::new(primary, secondary);

        let raw = query.raw_search("x", 10).await.unwrap();
        // Raw results keep the cross-shard duplicate; dedup is downstream.
        assert_eq!(raw.records.len(), 2);
        assert_eq!(raw.total_count, 2);
    }
}
