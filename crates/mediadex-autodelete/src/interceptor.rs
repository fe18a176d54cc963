//! Outbound-send decorator that enrolls messages for deletion.
//!
//! Wraps a [`ChatApi`] at construction time instead of patching shared
//! behavior at runtime. Enrolment is best-effort and fully isolated from
//! the primary send path: whatever happens while enrolling, the original
//! send result is returned to the caller unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use mediadex_core::{
    ChatApi, MemberStatus, MessageKind, OutboundMessage, Result, SendOptions, TaskKey,
};

use crate::scheduler::DeletionScheduler;

/// [`ChatApi`] decorator that schedules auto-deletion for group messages.
pub struct SendInterceptor {
    inner: Arc<dyn ChatApi>,
    scheduler: Arc<DeletionScheduler>,
}

impl SendInterceptor {
    /// Wrap `inner` so successful group sends are enrolled with `scheduler`.
    pub fn new(inner: Arc<dyn ChatApi>, scheduler: Arc<DeletionScheduler>) -> Self {
        Self { inner, scheduler }
    }

    /// Enroll a delivered message (and the user message it replied to).
    ///
    /// Never fails: the scheduler declines silently when the feature is
    /// off, and private/channel chats are exempt.
    async fn enroll(&self, message: &OutboundMessage, options: &SendOptions) {
        if !message.chat.kind.is_group() {
            debug!(
                subsystem = "scheduler",
                component = "interceptor",
                chat_id = message.chat.id,
                "Not a group chat, skipping auto-delete enrolment"
            );
            return;
        }

        let bot_key = TaskKey::new(message.chat.id, message.message_id);
        self.scheduler.schedule(bot_key, MessageKind::Bot).await;

        if let Some(reply_to) = options.reply_to_message_id {
            let user_key = TaskKey::new(message.chat.id, reply_to);
            self.scheduler.schedule(user_key, MessageKind::User).await;
        }
    }
}

#[async_trait]
impl ChatApi for SendInterceptor {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendOptions,
    ) -> Result<OutboundMessage> {
        let message = self.inner.send_message(chat_id, text, options).await?;
        self.enroll(&message, options).await;
        Ok(message)
    }

    async fn delete_messages(&self, chat_id: i64, message_ids: &[i64]) -> Result<()> {
        self.inner.delete_messages(chat_id, message_ids).await
    }

    async fn get_chat_member(&self, chat_id: i64, user_id: i64) -> Result<MemberStatus> {
        self.inner.get_chat_member(chat_id, user_id).await
    }
}
