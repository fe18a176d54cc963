//! Mock chat-protocol client for deterministic testing.
//!
//! Records every call for assertion and can be scripted to fail specific
//! operations, so scheduler and interceptor behavior can be exercised
//! without a network.
//!
//! ## Usage
//!
//! ```rust
//! use mediadex_telegram::mock::MockChatApi;
//! use mediadex_core::{ChatApi, ChatKind, SendOptions};
//!
//! # async fn example() {
//! let chat = MockChatApi::new().with_chat_kind(ChatKind::Group);
//! let sent = chat.send_message(-100, "hi", &SendOptions::default()).await.unwrap();
//! assert_eq!(chat.sent_count(), 1);
//! # }
//! ```

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use mediadex_core::{
    Chat, ChatApi, ChatKind, Error, MemberStatus, OutboundMessage, Result, SendOptions,
};

/// One recorded call against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Send {
        chat_id: i64,
        text: String,
        reply_to: Option<i64>,
    },
    Delete {
        chat_id: i64,
        message_ids: Vec<i64>,
    },
    GetMember {
        chat_id: i64,
        user_id: i64,
    },
}

/// Mock implementation of [`ChatApi`]. Clones share state.
#[derive(Clone)]
pub struct MockChatApi {
    chat_kind: Arc<Mutex<ChatKind>>,
    chat_title: Arc<Mutex<Option<String>>>,
    member_status: Arc<Mutex<MemberStatus>>,
    fail_send: Arc<AtomicBool>,
    fail_delete: Arc<AtomicBool>,
    next_message_id: Arc<AtomicI64>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockChatApi {
    /// Create a mock that sends into a supergroup and never fails.
    pub fn new() -> Self {
        Self {
            chat_kind: Arc::new(Mutex::new(ChatKind::Supergroup)),
            chat_title: Arc::new(Mutex::new(Some("Test Group".to_string()))),
            member_status: Arc::new(Mutex::new(MemberStatus::Member)),
            fail_send: Arc::new(AtomicBool::new(false)),
            fail_delete: Arc::new(AtomicBool::new(false)),
            next_message_id: Arc::new(AtomicI64::new(1)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the chat kind reported for sent messages.
    pub fn with_chat_kind(self, kind: ChatKind) -> Self {
        *self.chat_kind.lock().unwrap() = kind;
        self
    }

    /// Set the member status returned by `get_chat_member`.
    pub fn with_member_status(self, status: MemberStatus) -> Self {
        *self.member_status.lock().unwrap() = status;
        self
    }

    /// Make subsequent sends fail.
    pub fn set_fail_send(&self, fail: bool) {
        self.fail_send.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent deletes fail.
    pub fn set_fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// All recorded calls.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of successful sends.
    pub fn sent_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Send { .. }))
            .count()
    }

    /// Message ids passed to `delete_messages`, flattened.
    pub fn deleted_ids(&self) -> Vec<i64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MockCall::Delete { message_ids, .. } => Some(message_ids.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl Default for MockChatApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatApi for MockChatApi {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<OutboundMessage> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(Error::Chat("mock send failure".to_string()));
        }
        self.calls.lock().unwrap().push(MockCall::Send {
            chat_id,
            text: text.to_string(),
            reply_to: options.reply_to_message_id,
        });
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        Ok(OutboundMessage {
            message_id,
            chat: Chat {
                id: chat_id,
                kind: *self.chat_kind.lock().unwrap(),
                title: self.chat_title.lock().unwrap().clone(),
            },
        })
    }

    async fn delete_messages(&self, chat_id: i64, message_ids: &[i64]) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Error::Chat("mock delete failure".to_string()));
        }
        self.calls.lock().unwrap().push(MockCall::Delete {
            chat_id,
            message_ids: message_ids.to_vec(),
        });
        Ok(())
    }

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<MemberStatus> {
        self.calls
            .lock()
            .unwrap()
            .push(MockCall::GetMember { chat_id, user_id });
        Ok(*self.member_status.lock().unwrap())
    }
}
