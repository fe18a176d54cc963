//! Delayed message-deletion scheduler.
//!
//! One lightweight task per scheduled deletion. The pending-task table is
//! the only shared mutable state; every insert, remove, and supersede runs
//! under its lock, which linearizes schedule/cancel/complete transitions
//! for the same key. Cancellation is cooperative: it is observed at the
//! staged sleep points, never raced against the terminal delete call, so a
//! deletion already in flight may still complete.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, oneshot, Mutex};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use mediadex_core::{
    defaults, ChatApi, DeletionTask, MessageKind, TaskHandle, TaskKey, TaskState,
};

use crate::config::{countdown_checkpoints, SchedulerConfig};

/// Event emitted by the deletion scheduler.
///
/// Countdown events are advisory telemetry; they never affect behavior.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// A deletion was scheduled.
    Scheduled { key: TaskKey, kind: MessageKind },
    /// Countdown notification at a fixed offset before expiry.
    Countdown { key: TaskKey, remaining_secs: u64 },
    /// The message was deleted.
    Deleted { key: TaskKey, kind: MessageKind },
    /// The delete call failed; the task is discarded without retry.
    DeleteFailed { key: TaskKey, error: String },
    /// The task was cancelled before its delay elapsed.
    Cancelled { key: TaskKey },
    /// A newer schedule for the same key replaced this task.
    Superseded { key: TaskKey },
}

/// One pending deletion in the task table.
struct PendingEntry {
    /// Generation tag: a superseding schedule gets a fresh id, and task
    /// self-removal is compare-and-remove against it.
    task_id: Uuid,
    kind: MessageKind,
    scheduled_at: chrono::DateTime<Utc>,
    cancel_tx: oneshot::Sender<()>,
}

/// Tracks pending delayed deletions keyed by `(chat_id, message_id)`.
///
/// One live task per key: scheduling over an existing key cancels the old
/// task before the new one starts. Every task started is removed from the
/// pending table on exactly one of completed/cancelled/failed.
pub struct DeletionScheduler {
    chat: Arc<dyn ChatApi>,
    config: SchedulerConfig,
    pending: Arc<Mutex<HashMap<TaskKey, PendingEntry>>>,
    event_tx: broadcast::Sender<SchedulerEvent>,
}

impl DeletionScheduler {
    /// Create a new scheduler deleting through the given chat client.
    pub fn new(chat: Arc<dyn ChatApi>, config: SchedulerConfig) -> Self {
        let (event_tx, _) = broadcast::channel(defaults::EVENT_CHANNEL_CAPACITY);
        Self {
            chat,
            config,
            pending: Arc::new(Mutex::new(HashMap::new())),
            event_tx,
        }
    }

    /// Get a receiver for scheduler events.
    pub fn events(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.event_tx.subscribe()
    }

    /// The shared feature toggle.
    pub fn toggle(&self) -> &crate::toggle::AutoDeleteToggle {
        &self.config.enabled
    }

    /// Schedule deletion of a message after the configured delay.
    ///
    /// Returns `None` when the feature toggle is off; the toggle is checked
    /// only here, so tasks already pending ignore later toggling. A task
    /// pending for the key is cancelled before the new one starts, so the
    /// two never race to deletion.
    pub async fn schedule(&self, key: TaskKey, kind: MessageKind) -> Option<TaskHandle> {
        if !self.config.enabled.is_enabled() {
            debug!(
                subsystem = "scheduler",
                op = "schedule",
                chat_id = key.chat_id,
                message_id = key.message_id,
                "Auto-delete disabled, not scheduling"
            );
            return None;
        }

        let task_id = Uuid::new_v4();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        {
            let mut pending = self.pending.lock().await;
            if let Some(prev) = pending.remove(&key) {
                // Supersede: signal the old task before the new one exists.
                let _ = prev.cancel_tx.send(());
                let _ = self.event_tx.send(SchedulerEvent::Superseded { key });
                info!(
                    subsystem = "scheduler",
                    op = "supersede",
                    chat_id = key.chat_id,
                    message_id = key.message_id,
                    "Superseded pending deletion with a fresh delay window"
                );
            }
            pending.insert(
                key,
                PendingEntry {
                    task_id,
                    kind,
                    scheduled_at: Utc::now(),
                    cancel_tx,
                },
            );
        }

        let chat = self.chat.clone();
        let pending = self.pending.clone();
        let event_tx = self.event_tx.clone();
        let delay = self.config.delay;
        tokio::spawn(async move {
            run_countdown(chat, pending, event_tx, key, kind, task_id, delay, cancel_rx).await;
        });

        let _ = self.event_tx.send(SchedulerEvent::Scheduled { key, kind });
        info!(
            subsystem = "scheduler",
            op = "schedule",
            chat_id = key.chat_id,
            message_id = key.message_id,
            kind = kind.as_str(),
            delay_secs = delay.as_secs(),
            "Scheduled message deletion"
        );
        Some(TaskHandle { key, task_id })
    }

    /// Cancel the pending deletion for a key.
    ///
    /// Returns `false` when nothing was pending (a no-op, not an error). A
    /// task already past its sleep stages may still complete its deletion
    /// (cancellation is cooperative).
    pub async fn cancel(&self, key: TaskKey) -> bool {
        let removed = {
            let mut pending = self.pending.lock().await;
            pending.remove(&key)
        };
        match removed {
            Some(entry) => {
                let _ = entry.cancel_tx.send(());
                info!(
                    subsystem = "scheduler",
                    op = "cancel",
                    chat_id = key.chat_id,
                    message_id = key.message_id,
                    "Cancelled pending deletion"
                );
                true
            }
            None => {
                debug!(
                    subsystem = "scheduler",
                    op = "cancel",
                    chat_id = key.chat_id,
                    message_id = key.message_id,
                    "No pending deletion for key"
                );
                false
            }
        }
    }

    /// Number of pending deletions.
    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Whether a deletion is pending for the key.
    pub async fn is_pending(&self, key: TaskKey) -> bool {
        self.pending.lock().await.contains_key(&key)
    }

    /// Snapshot of all pending deletions, for status reporting.
    pub async fn pending_tasks(&self) -> Vec<DeletionTask> {
        let pending = self.pending.lock().await;
        pending
            .iter()
            .map(|(key, entry)| DeletionTask {
                key: *key,
                kind: entry.kind,
                scheduled_at: entry.scheduled_at,
                state: TaskState::Pending,
            })
            .collect()
    }

    /// Cancel every pending deletion (process shutdown).
    pub async fn shutdown(&self) {
        let entries: Vec<(TaskKey, PendingEntry)> = {
            let mut pending = self.pending.lock().await;
            pending.drain().collect()
        };
        let count = entries.len();
        for (_, entry) in entries {
            let _ = entry.cancel_tx.send(());
        }
        if count > 0 {
            info!(
                subsystem = "scheduler",
                op = "shutdown",
                result_count = count,
                "Cancelled all pending deletions"
            );
        }
    }
}

/// Remove the key's entry only if it still belongs to this task.
///
/// A superseding schedule replaces the entry with a fresh `task_id`; the
/// old task must not remove its successor.
async fn remove_if_current(
    pending: &Mutex<HashMap<TaskKey, PendingEntry>>,
    key: TaskKey,
    task_id: Uuid,
) {
    let mut map = pending.lock().await;
    if map.get(&key).map(|e| e.task_id) == Some(task_id) {
        map.remove(&key);
    }
}

/// The per-task delay/cancel state machine.
///
/// Sleeps in stages so countdown notifications fire at the configured
/// offsets; cancellation is observed only between stages. The terminal
/// delete is performed outside any cancellation race.
#[allow(clippy::too_many_arguments)]
async fn run_countdown(
    chat: Arc<dyn ChatApi>,
    pending: Arc<Mutex<HashMap<TaskKey, PendingEntry>>>,
    event_tx: broadcast::Sender<SchedulerEvent>,
    key: TaskKey,
    kind: MessageKind,
    task_id: Uuid,
    delay: std::time::Duration,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut remaining = delay;
    for checkpoint in countdown_checkpoints(delay) {
        let segment = remaining - checkpoint;
        tokio::select! {
            _ = &mut cancel_rx => {
                finish_cancelled(&pending, &event_tx, key, kind, task_id).await;
                return;
            }
            _ = sleep(segment) => {}
        }
        remaining = checkpoint;
        let _ = event_tx.send(SchedulerEvent::Countdown {
            key,
            remaining_secs: checkpoint.as_secs(),
        });
        info!(
            subsystem = "scheduler",
            component = "countdown",
            chat_id = key.chat_id,
            message_id = key.message_id,
            kind = kind.as_str(),
            remaining_secs = checkpoint.as_secs(),
            "Message will be deleted soon"
        );
    }

    tokio::select! {
        _ = &mut cancel_rx => {
            finish_cancelled(&pending, &event_tx, key, kind, task_id).await;
            return;
        }
        _ = sleep(remaining) => {}
    }

    // Terminal transition. Not raced against cancellation: a cancel
    // arriving from here on no longer stops the delete.
    match chat.delete_messages(key.chat_id, &[key.message_id]).await {
        Ok(()) => {
            let _ = event_tx.send(SchedulerEvent::Deleted { key, kind });
            info!(
                subsystem = "scheduler",
                op = "delete",
                chat_id = key.chat_id,
                message_id = key.message_id,
                kind = kind.as_str(),
                "Deleted message after delay"
            );
        }
        Err(e) => {
            let _ = event_tx.send(SchedulerEvent::DeleteFailed {
                key,
                error: e.to_string(),
            });
            warn!(
                subsystem = "scheduler",
                op = "delete",
                chat_id = key.chat_id,
                message_id = key.message_id,
                kind = kind.as_str(),
                error = %e,
                "Failed to delete message, task discarded"
            );
        }
    }

    remove_if_current(&pending, key, task_id).await;
}

async fn finish_cancelled(
    pending: &Mutex<HashMap<TaskKey, PendingEntry>>,
    event_tx: &broadcast::Sender<SchedulerEvent>,
    key: TaskKey,
    kind: MessageKind,
    task_id: Uuid,
) {
    remove_if_current(pending, key, task_id).await;
    let _ = event_tx.send(SchedulerEvent::Cancelled { key });
    info!(
        subsystem = "scheduler",
        op = "cancelled",
        chat_id = key.chat_id,
        message_id = key.message_id,
        kind = kind.as_str(),
        "Deletion cancelled"
    );
}
