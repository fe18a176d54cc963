//! Core traits for mediadex abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability: the per-shard
//! store, the raw ranked-search collaborator, and the chat protocol.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PATTERN COMPILATION
// =============================================================================

/// A validated, case-insensitive file-name pattern.
///
/// Compilation happens once, before any store is queried, so a malformed
/// pattern fails with `Error::InvalidPattern` and zero I/O. Store
/// implementations may evaluate the pattern themselves (in-memory) or ship
/// the original source to the database's regex engine.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: regex::Regex,
    source: String,
}

impl CompiledPattern {
    /// Compile `pattern` case-insensitively.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = regex::RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            regex,
            source: pattern.to_string(),
        })
    }

    /// The original pattern text, for engines that compile server-side.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Test a file name against the pattern.
    pub fn is_match(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }
}

// =============================================================================
// SHARD STORE
// =============================================================================

/// Uniform query/insert/delete interface over one physical shard.
///
/// All operations are read-committed against the underlying store; there is
/// no transactional guarantee across calls. Connection or query failures
/// surface as `Error::StoreUnavailable`.
#[async_trait]
pub trait ShardStore: Send + Sync {
    /// Which shard this store serves.
    fn shard(&self) -> Shard;

    /// Number of records in the shard.
    async fn count(&self) -> Result<i64>;

    /// Insert a record. Returns `false` when `file_id` already exists in
    /// this shard (within-shard uniqueness; cross-shard duplicates are
    /// allowed and reconciled by cleanup).
    async fn insert(&self, record: &FileRecord) -> Result<bool>;

    /// Fetch the `{file_id, file_name}` projection for the given ids.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<FileRef>>;

    /// Every file id in the shard, for duplicate detection sweeps.
    async fn all_ids(&self) -> Result<Vec<String>>;

    /// Records whose file name matches the pre-compiled pattern.
    async fn find_by_pattern(&self, pattern: &CompiledPattern) -> Result<Vec<FileRef>>;

    /// Delete all records with the given ids; returns the deleted count.
    async fn delete_by_ids(&self, ids: &[String]) -> Result<u64>;
}

// =============================================================================
// RANKED SEARCH COLLABORATOR
// =============================================================================

/// Raw matches from the ranking collaborator, before dedup/pagination.
#[derive(Debug, Clone, Default)]
pub struct RawMatches {
    /// May contain the same `file_id` more than once when the content
    /// exists in multiple shards.
    pub records: Vec<FileRecord>,
    /// Total matches as reported per shard, summed (pre-dedup).
    pub total_count: i64,
}

/// External ranking/query collaborator backing `FederatedIndex::search`.
///
/// The collaborator owns tokenisation and ordering; the federated layer
/// owns dedup and pagination.
#[async_trait]
pub trait RankedQuery: Send + Sync {
    /// Fetch up to `limit` raw matches for `query`.
    async fn raw_search(&self, query: &str, limit: u32) -> Result<RawMatches>;
}

// =============================================================================
// CHAT PROTOCOL
// =============================================================================

/// Narrow chat-protocol surface consumed by the scheduler and interceptor.
///
/// The core only consumes these operations; the wire format belongs to the
/// implementing client.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Send a text message; returns the delivered message envelope.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<OutboundMessage>;

    /// Delete the given messages from a chat.
    async fn delete_messages(&self, chat_id: i64, message_ids: &[i64]) -> Result<()>;

    /// Look up a user's membership status in a chat.
    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<MemberStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_compiled_pattern_case_insensitive() {
        let p = CompiledPattern::new(r"\.mp4$").unwrap();
        assert!(p.is_match("movie.MP4"));
        assert!(p.is_match("movie.mp4"));
        assert!(!p.is_match("movie.mkv"));
    }

    #[test]
    fn test_compiled_pattern_keeps_source() {
        let p = CompiledPattern::new("matrix").unwrap();
        assert_eq!(p.source(), "matrix");
    }

    #[test]
    fn test_compiled_pattern_invalid_syntax() {
        let err = CompiledPattern::new("[unterminated").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern(_)));
    }

    #[test]
    fn test_raw_matches_default() {
        let raw = RawMatches::default();
        assert!(raw.records.is_empty());
        assert_eq!(raw.total_count, 0);
    }
}
