//! # mediadex-autodelete
//!
//! Time-bounded message-lifecycle scheduler with cancellation.
//!
//! This crate provides:
//! - [`DeletionScheduler`]: per-key delayed deletions with staged countdown
//!   notifications, cancellation, and supersession
//! - [`SendInterceptor`]: a [`ChatApi`](mediadex_core::ChatApi) decorator
//!   that enrolls outbound group messages automatically
//! - [`AutoDeleteToggle`]: the shared runtime on/off switch
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mediadex_autodelete::{DeletionScheduler, SchedulerConfig, SendInterceptor};
//!
//! let scheduler = Arc::new(DeletionScheduler::new(chat.clone(), SchedulerConfig::from_env()));
//! let sender = SendInterceptor::new(chat, scheduler.clone());
//!
//! // Every group send through `sender` is now enrolled for deletion.
//! let mut events = scheduler.events();
//! while let Ok(event) = events.recv().await {
//!     println!("Event: {:?}", event);
//! }
//! ```

pub mod config;
pub mod interceptor;
pub mod scheduler;
pub mod toggle;

// Re-export core types
pub use mediadex_core::*;

pub use config::{countdown_checkpoints, SchedulerConfig};
pub use interceptor::SendInterceptor;
pub use scheduler::{DeletionScheduler, SchedulerEvent};
pub use toggle::AutoDeleteToggle;
