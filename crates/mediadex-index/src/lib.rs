//! # mediadex-index
//!
//! Federated two-shard file index.
//!
//! This crate provides:
//! - [`FederatedIndex`]: unified status, search, pattern-match, and
//!   duplicate detection/cleanup over two independently writable shards
//! - Order-preserving dedup and pagination of ranked search results
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mediadex_index::FederatedIndex;
//!
//! let index = FederatedIndex::new(primary, secondary, query);
//! let page = index.search("matrix 1080p", 20, 0).await?;
//! assert!(page.records.iter().map(|r| &r.file_id).all_unique());
//! ```

pub mod dedup;
pub mod federated;

// Re-export core types
pub use mediadex_core::*;

pub use dedup::{dedup_by_file_id, paginate};
pub use federated::{DuplicateReport, FederatedIndex};
