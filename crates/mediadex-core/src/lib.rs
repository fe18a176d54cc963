//! # mediadex-core
//!
//! Core types, traits, and abstractions for the mediadex file index.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other mediadex crates depend on: file records and
//! shard labels, search pages, deletion-task types, the chat-protocol
//! types, and the `ShardStore` / `RankedQuery` / `ChatApi` interfaces.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
