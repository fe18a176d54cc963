//! Default values shared across mediadex crates.

/// Total auto-delete delay in seconds.
pub const AUTO_DELETE_DELAY_SECS: u64 = 20;

/// Countdown checkpoints, in seconds-remaining before expiry. A checkpoint
/// is only emitted when it fits strictly inside the configured delay.
pub const COUNTDOWN_CHECKPOINTS_SECS: [u64; 3] = [10, 5, 1];

/// Whether auto-deletion is enabled when no configuration is provided.
pub const AUTO_DELETE_ENABLED: bool = true;

/// Default page size for federated search.
pub const SEARCH_MAX_RESULTS: u32 = 20;

/// Over-fetch multiplier for raw search: the collaborator may return
/// cross-shard duplicates, so the federated layer requests extra rows to
/// fill a page after dedup.
pub const SEARCH_OVERFETCH: u32 = 2;

/// Sample size for duplicate reports.
pub const DUPLICATE_SAMPLE_LIMIT: usize = 10;

/// Capacity of the scheduler event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default maximum number of connections per shard pool.
pub const POOL_MAX_CONNECTIONS: u32 = 10;

/// Default pool connect timeout in seconds.
pub const POOL_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle timeout for pooled connections in seconds.
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 600;

/// Request timeout for the chat-protocol HTTP client in seconds.
pub const CHAT_REQUEST_TIMEOUT_SECS: u64 = 30;
