//! Structured logging field name constants for mediadex.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (failed delete, dropped enrolment) |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration (per-record hits) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "index", "db", "scheduler", "chat", "admin"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "federated", "pool", "countdown", "interceptor"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "cleanup", "schedule", "cancel"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Shard label ("primary" / "secondary").
pub const SHARD: &str = "shard";

/// Chat the message belongs to.
pub const CHAT_ID: &str = "chat_id";

/// Message being tracked or deleted.
pub const MESSAGE_ID: &str = "message_id";

/// Origin of a tracked message ("user" / "bot").
pub const MESSAGE_KIND: &str = "kind";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of records removed by a cleanup or bulk delete.
pub const REMOVED_COUNT: &str = "removed_count";

/// Seconds remaining before a scheduled deletion fires.
pub const REMAINING_SECS: &str = "remaining_secs";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
