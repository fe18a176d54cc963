//! Federated operations over the two file-index shards.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use mediadex_core::{
    defaults, CleanupReport, CompiledPattern, FileRef, IndexStatus, RankedQuery, Result,
    SearchPage, Shard, ShardStore,
};

use crate::dedup::{dedup_by_file_id, paginate};

/// Summary of cross-shard duplicates, with a bounded sample of names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Number of file ids present in both shards.
    pub total: usize,
    /// First `limit` duplicates resolved to their display names.
    pub samples: Vec<FileRef>,
}

/// Composition of the two shard stores and the ranked-search collaborator.
///
/// The index owns no records, only the merge/dedup/reconcile logic. Every
/// operation is read-mostly and stateless between calls; any shard failure
/// aborts the whole federated operation with no partial merge.
pub struct FederatedIndex {
    primary: Arc<dyn ShardStore>,
    secondary: Arc<dyn ShardStore>,
    query: Arc<dyn RankedQuery>,
}

impl FederatedIndex {
    /// Compose the index from its collaborators. The first store is the
    /// canonical shard: cleanup never deletes from it.
    pub fn new(
        primary: Arc<dyn ShardStore>,
        secondary: Arc<dyn ShardStore>,
        query: Arc<dyn RankedQuery>,
    ) -> Self {
        Self {
            primary,
            secondary,
            query,
        }
    }

    /// Per-shard record counts. Side-effect-free.
    pub async fn status(&self) -> Result<IndexStatus> {
        let (primary, secondary) =
            futures::try_join!(self.primary.count(), self.secondary.count())?;
        Ok(IndexStatus { primary, secondary })
    }

    /// File ids present in both shards, sorted for deterministic reporting.
    #[instrument(skip(self))]
    pub async fn find_duplicates(&self) -> Result<Vec<String>> {
        let (primary_ids, secondary_ids) =
            futures::try_join!(self.primary.all_ids(), self.secondary.all_ids())?;
        let primary_ids: HashSet<String> = primary_ids.into_iter().collect();
        let secondary_ids: HashSet<String> = secondary_ids.into_iter().collect();

        let mut duplicates: Vec<String> = primary_ids
            .intersection(&secondary_ids)
            .cloned()
            .collect();
        duplicates.sort();

        debug!(
            subsystem = "index",
            component = "federated",
            op = "find_duplicates",
            result_count = duplicates.len(),
            "Duplicate sweep finished"
        );
        Ok(duplicates)
    }

    /// Duplicate ids resolved to a bounded sample of display names.
    pub async fn duplicate_report(&self, limit: usize) -> Result<DuplicateReport> {
        let duplicates = self.find_duplicates().await?;
        let sample_ids: Vec<String> = duplicates.iter().take(limit).cloned().collect();
        let samples = if sample_ids.is_empty() {
            Vec::new()
        } else {
            self.primary.find_by_ids(&sample_ids).await?
        };
        Ok(DuplicateReport {
            total: duplicates.len(),
            samples,
        })
    }

    /// Ranked search, deduplicated by `file_id` and paginated.
    ///
    /// The collaborator may return the same content once per shard; the
    /// page returned here never carries two records with the same
    /// `file_id`. `total_count` remains the collaborator's raw total.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        max_results: u32,
        offset: u32,
    ) -> Result<SearchPage> {
        let start = Instant::now();

        // Over-fetch so a page can still be filled after dedup collapses
        // cross-shard copies.
        let fetch_limit = (offset + max_results).saturating_mul(defaults::SEARCH_OVERFETCH);
        let raw = self.query.raw_search(query, fetch_limit).await?;
        let total_count = raw.total_count;

        let deduped = dedup_by_file_id(raw.records);
        let (records, next_offset) = paginate(deduped, max_results, offset);

        info!(
            subsystem = "index",
            component = "federated",
            op = "search",
            query,
            result_count = records.len(),
            total_count,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search page assembled"
        );

        Ok(SearchPage {
            records,
            next_offset,
            total_count,
        })
    }

    /// Case-insensitive pattern match over both shards, each result tagged
    /// with its origin shard (display only).
    ///
    /// A malformed pattern fails with `InvalidPattern` before any store is
    /// queried.
    pub async fn find_by_pattern(&self, pattern: &str) -> Result<Vec<(FileRef, Shard)>> {
        let compiled = CompiledPattern::new(pattern)?;

        let (primary_hits, secondary_hits) = futures::try_join!(
            self.primary.find_by_pattern(&compiled),
            self.secondary.find_by_pattern(&compiled)
        )?;

        let mut results: Vec<(FileRef, Shard)> = Vec::new();
        results.extend(primary_hits.into_iter().map(|r| (r, self.primary.shard())));
        results.extend(
            secondary_hits
                .into_iter()
                .map(|r| (r, self.secondary.shard())),
        );

        debug!(
            subsystem = "index",
            component = "federated",
            op = "find_by_pattern",
            result_count = results.len(),
            "Pattern sweep finished"
        );
        Ok(results)
    }

    /// Remove secondary-shard copies of records the canonical shard holds.
    ///
    /// Directional by design: the canonical (primary) shard is never
    /// touched. Idempotent: a second run with no intervening writes
    /// removes nothing.
    #[instrument(skip(self))]
    pub async fn cleanup_duplicates(&self) -> Result<CleanupReport> {
        let start = Instant::now();
        let canonical_ids = self.primary.all_ids().await?;
        if canonical_ids.is_empty() {
            return Ok(CleanupReport { removed: 0 });
        }

        let removed = self.secondary.delete_by_ids(&canonical_ids).await?;
        if removed > 0 {
            info!(
                subsystem = "index",
                component = "federated",
                op = "cleanup",
                removed_count = removed,
                duration_ms = start.elapsed().as_millis() as u64,
                "Removed duplicate records from secondary shard"
            );
        } else {
            debug!(
                subsystem = "index",
                component = "federated",
                op = "cleanup",
                "No duplicates to remove"
            );
        }
        Ok(CleanupReport { removed })
    }
}

impl Clone for FederatedIndex {
    fn clone(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            query: self.query.clone(),
        }
    }
}
