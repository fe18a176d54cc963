//! Send-interceptor tests: enrolment rules and failure isolation.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use mediadex_autodelete::{
    AutoDeleteToggle, DeletionScheduler, SchedulerConfig, SendInterceptor,
};
use mediadex_core::{ChatApi, ChatKind, Error, SendOptions, TaskKey};
use mediadex_telegram::MockChatApi;

fn wrap(chat: &MockChatApi, config: SchedulerConfig) -> (SendInterceptor, Arc<DeletionScheduler>) {
    let scheduler = Arc::new(DeletionScheduler::new(Arc::new(chat.clone()), config));
    (
        SendInterceptor::new(Arc::new(chat.clone()), scheduler.clone()),
        scheduler,
    )
}

#[tokio::test(start_paused = true)]
async fn test_group_send_enrolls_bot_message() {
    let chat = MockChatApi::new().with_chat_kind(ChatKind::Supergroup);
    let (sender, scheduler) = wrap(&chat, SchedulerConfig::default());

    let message = sender
        .send_message(-100, "results", &SendOptions::default())
        .await
        .unwrap();
    assert!(scheduler
        .is_pending(TaskKey::new(-100, message.message_id))
        .await);

    sleep(Duration::from_secs(21)).await;
    assert_eq!(chat.deleted_ids(), vec![message.message_id]);
}

#[tokio::test(start_paused = true)]
async fn test_group_reply_enrolls_both_messages() {
    let chat = MockChatApi::new().with_chat_kind(ChatKind::Group);
    let (sender, scheduler) = wrap(&chat, SchedulerConfig::default());

    let message = sender
        .send_message(-100, "results", &SendOptions::reply_to(42))
        .await
        .unwrap();
    assert_eq!(scheduler.pending_count().await, 2);
    assert!(scheduler.is_pending(TaskKey::new(-100, 42)).await);

    sleep(Duration::from_secs(21)).await;
    let mut deleted = chat.deleted_ids();
    deleted.sort();
    assert_eq!(deleted, vec![message.message_id, 42]);
}

#[tokio::test(start_paused = true)]
async fn test_private_chat_is_exempt() {
    let chat = MockChatApi::new().with_chat_kind(ChatKind::Private);
    let (sender, scheduler) = wrap(&chat, SchedulerConfig::default());

    sender
        .send_message(500, "dm", &SendOptions::reply_to(42))
        .await
        .unwrap();
    assert_eq!(scheduler.pending_count().await, 0);

    sleep(Duration::from_secs(30)).await;
    assert!(chat.deleted_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_channel_is_exempt() {
    let chat = MockChatApi::new().with_chat_kind(ChatKind::Channel);
    let (sender, scheduler) = wrap(&chat, SchedulerConfig::default());

    sender
        .send_message(-200, "post", &SendOptions::default())
        .await
        .unwrap();
    assert_eq!(scheduler.pending_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_inner_send_failure_propagates_unchanged() {
    let chat = MockChatApi::new();
    chat.set_fail_send(true);
    let (sender, scheduler) = wrap(&chat, SchedulerConfig::default());

    let err = sender
        .send_message(-100, "results", &SendOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Chat(_)));
    assert_eq!(scheduler.pending_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_disabled_feature_still_returns_send_result() {
    let chat = MockChatApi::new();
    let (sender, scheduler) = wrap(
        &chat,
        SchedulerConfig::default().with_toggle(AutoDeleteToggle::new(false)),
    );

    let message = sender
        .send_message(-100, "results", &SendOptions::default())
        .await
        .unwrap();
    assert_eq!(message.chat.id, -100);
    assert_eq!(scheduler.pending_count().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_delete_and_member_lookup_pass_through() {
    let chat = MockChatApi::new();
    let (sender, _scheduler) = wrap(&chat, SchedulerConfig::default());

    sender.delete_messages(-100, &[1, 2]).await.unwrap();
    assert_eq!(chat.deleted_ids(), vec![1, 2]);

    let status = sender.get_chat_member(-100, 7).await.unwrap();
    assert_eq!(status, mediadex_core::MemberStatus::Member);
}
