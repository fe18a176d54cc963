//! Core data models for mediadex.
//!
//! These types are shared across all mediadex crates and represent the
//! indexed file records, shard labels, search pages, deletion-task state,
//! and the narrow chat-protocol surface the scheduler consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// FILE INDEX TYPES
// =============================================================================

/// One indexed file.
///
/// `file_id` is the content identity used for duplicate detection. It is
/// unique within a shard; cross-shard uniqueness is not enforced at write
/// time and is reconciled after the fact by the cleanup operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: String,
    pub file_name: String,
    pub file_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl FileRecord {
    /// Narrow projection used by duplicate detection and pattern search.
    pub fn to_ref(&self) -> FileRef {
        FileRef {
            file_id: self.file_id.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// `{file_id, file_name}` projection of a [`FileRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub file_id: String,
    pub file_name: String,
}

/// Label for one physical partition of the file index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shard {
    /// Canonical shard; cleanup never deletes from it.
    Primary,
    Secondary,
}

impl Shard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shard::Primary => "primary",
            Shard::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of deduplicated search results.
///
/// No two records in a page share a `file_id`. `total_count` is the raw
/// collaborator-reported total (summed across shards, before dedup), which
/// is what the surrounding system has always displayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub records: Vec<FileRecord>,
    /// Offset of the next page over the deduplicated sequence; `None` when
    /// the result set is exhausted.
    pub next_offset: Option<u32>,
    pub total_count: i64,
}

/// Per-shard record counts from `FederatedIndex::status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexStatus {
    pub primary: i64,
    pub secondary: i64,
}

impl IndexStatus {
    pub fn total(&self) -> i64 {
        self.primary + self.secondary
    }
}

/// Outcome of a duplicate cleanup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Records removed from the secondary shard.
    pub removed: u64,
}

// =============================================================================
// DELETION TASK TYPES
// =============================================================================

/// Identity of a scheduled deletion: one live task per key at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub chat_id: i64,
    pub message_id: i64,
}

impl TaskKey {
    pub fn new(chat_id: i64, message_id: i64) -> Self {
        Self {
            chat_id,
            message_id,
        }
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.chat_id, self.message_id)
    }
}

/// Origin of a message enrolled for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A user message the bot replied to.
    User,
    /// A message the bot itself sent.
    Bot,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Bot => "bot",
        }
    }
}

/// Lifecycle state of a deletion task.
///
/// `Pending` is the only state kept in the scheduler's task table; the
/// terminal states are reported through events and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    Pending,
    Cancelled,
    Completed,
    Failed,
}

/// Handle returned by `DeletionScheduler::schedule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    pub key: TaskKey,
    /// Generation tag; a superseding schedule for the same key gets a new id.
    pub task_id: Uuid,
}

/// Snapshot of one pending deletion, for status reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionTask {
    pub key: TaskKey,
    pub kind: MessageKind,
    pub scheduled_at: DateTime<Utc>,
    pub state: TaskState,
}

// =============================================================================
// CHAT-PROTOCOL TYPES
// =============================================================================

/// Chat classification; deletions are only enrolled for group-type chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Group and supergroup chats are subject to auto-deletion.
    pub fn is_group(&self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// The chat a message landed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A successfully sent outbound message, as reported by the chat protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub message_id: i64,
    pub chat: Chat,
}

/// Options for an outbound send.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOptions {
    /// When set, the send is a reply and the replied-to user message is
    /// enrolled for deletion alongside the bot's own message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

impl SendOptions {
    pub fn reply_to(message_id: i64) -> Self {
        Self {
            reply_to_message_id: Some(message_id),
        }
    }
}

/// Membership status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    Restricted,
    Left,
    Kicked,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> FileRecord {
        FileRecord {
            file_id: id.to_string(),
            file_name: name.to_string(),
            file_size: 1024,
            mime_type: Some("video/mp4".to_string()),
            caption: None,
        }
    }

    #[test]
    fn test_file_record_to_ref() {
        let r = record("abc", "movie.mp4");
        let fr = r.to_ref();
        assert_eq!(fr.file_id, "abc");
        assert_eq!(fr.file_name, "movie.mp4");
    }

    #[test]
    fn test_shard_display() {
        assert_eq!(Shard::Primary.to_string(), "primary");
        assert_eq!(Shard::Secondary.to_string(), "secondary");
    }

    #[test]
    fn test_index_status_total() {
        let status = IndexStatus {
            primary: 1,
            secondary: 2,
        };
        assert_eq!(status.total(), 3);
    }

    #[test]
    fn test_task_key_display() {
        let key = TaskKey::new(100, 7);
        assert_eq!(key.to_string(), "100/7");
    }

    #[test]
    fn test_task_key_hash_equality() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TaskKey::new(1, 2), "a");
        assert_eq!(map.get(&TaskKey::new(1, 2)), Some(&"a"));
        assert_eq!(map.get(&TaskKey::new(1, 3)), None);
    }

    #[test]
    fn test_chat_kind_is_group() {
        assert!(ChatKind::Group.is_group());
        assert!(ChatKind::Supergroup.is_group());
        assert!(!ChatKind::Private.is_group());
        assert!(!ChatKind::Channel.is_group());
    }

    #[test]
    fn test_chat_kind_serialization() {
        let json = serde_json::to_string(&ChatKind::Supergroup).unwrap();
        assert_eq!(json, "\"supergroup\"");
        let back: ChatKind = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(back, ChatKind::Private);
    }

    #[test]
    fn test_chat_kind_field_rename() {
        let chat: Chat =
            serde_json::from_str(r#"{"id": -100, "type": "group", "title": "Films"}"#).unwrap();
        assert_eq!(chat.kind, ChatKind::Group);
        assert_eq!(chat.title.as_deref(), Some("Films"));
    }

    #[test]
    fn test_send_options_reply_to() {
        let opts = SendOptions::reply_to(55);
        assert_eq!(opts.reply_to_message_id, Some(55));
        assert_eq!(SendOptions::default().reply_to_message_id, None);
    }

    #[test]
    fn test_search_page_serialization() {
        let page = SearchPage {
            records: vec![record("a1", "x.mp4")],
            next_offset: Some(10),
            total_count: 42,
        };
        let json = serde_json::to_string(&page).unwrap();
        let back: SearchPage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.records.len(), 1);
        assert_eq!(back.next_offset, Some(10));
        assert_eq!(back.total_count, 42);
    }

    #[test]
    fn test_message_kind_as_str() {
        assert_eq!(MessageKind::User.as_str(), "user");
        assert_eq!(MessageKind::Bot.as_str(), "bot");
    }
}
