//! # mediadex-telegram
//!
//! Bot API chat-protocol client for mediadex.
//!
//! Implements the narrow [`ChatApi`](mediadex_core::ChatApi) surface the
//! deletion scheduler and send interceptor consume: send, bulk delete, and
//! member lookup. A scriptable mock lives in [`mock`] for tests.

pub mod client;
pub mod mock;

// Re-export core types
pub use mediadex_core::*;

pub use client::{BotClient, DEFAULT_API_URL};
pub use mock::{MockCall, MockChatApi};
