//! Administrative console: dispatches commands onto the federated index.
//!
//! Destructive operations are gated behind an explicit confirmation: the
//! `cleanup` command arms a pending action for the calling admin, a literal
//! `yes` executes it, and anything else disarms it. Store failures abort
//! the operation and surface to the caller with their error kind; counts
//! in replies are always accurate as-of the failure point.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};

use mediadex_autodelete::{AutoDeleteToggle, DeletionScheduler};
use mediadex_core::{defaults, Error, Result};
use mediadex_index::{DuplicateReport, FederatedIndex};

use crate::commands::{AdminCommand, AdminList, AutoDeleteCommand, HELP_TEXT};

/// Handles for the auto-delete feature, when the console manages one.
pub struct AutoDeleteControls {
    pub toggle: AutoDeleteToggle,
    pub scheduler: Arc<DeletionScheduler>,
    pub delay: Duration,
}

/// Stateful command dispatcher for the administrative surface.
pub struct AdminConsole {
    index: FederatedIndex,
    admins: AdminList,
    autodelete: Option<AutoDeleteControls>,
    /// Admins with an armed cleanup awaiting their `yes`.
    pending_cleanup: Mutex<HashSet<i64>>,
}

impl AdminConsole {
    /// Create a console over the federated index.
    pub fn new(index: FederatedIndex, admins: AdminList) -> Self {
        Self {
            index,
            admins,
            autodelete: None,
            pending_cleanup: Mutex::new(HashSet::new()),
        }
    }

    /// Attach auto-delete controls.
    pub fn with_autodelete(mut self, controls: AutoDeleteControls) -> Self {
        self.autodelete = Some(controls);
        self
    }

    /// Handle one command line from `user_id`, returning the reply text.
    ///
    /// Non-admins are rejected with `Error::Unauthorized`; data-layer
    /// failures bubble up for user-facing reporting.
    pub async fn handle(&self, user_id: i64, input: &str) -> Result<String> {
        if !self.admins.is_admin(user_id) {
            warn!(
                subsystem = "admin",
                op = "handle",
                user_id,
                "Rejected command from non-admin"
            );
            return Err(Error::Unauthorized(user_id));
        }

        let command = AdminCommand::parse(input);

        // An armed cleanup is released only by a literal `yes`; any other
        // input disarms it.
        let was_armed = {
            let mut pending = self.pending_cleanup.lock().await;
            pending.remove(&user_id)
        };
        if was_armed {
            return if command == Some(AdminCommand::Confirm) {
                self.run_cleanup().await
            } else {
                Ok("Cleanup cancelled.".to_string())
            };
        }

        match command {
            Some(AdminCommand::Status) => self.report_status().await,
            Some(AdminCommand::Duplicates) => self.report_duplicates().await,
            Some(AdminCommand::Search { query }) => self.report_search(&query).await,
            Some(AdminCommand::Pattern { pattern }) => self.report_pattern(&pattern).await,
            Some(AdminCommand::Cleanup) => {
                let mut pending = self.pending_cleanup.lock().await;
                pending.insert(user_id);
                Ok(
                    "This removes every secondary-shard record whose file id also exists \
                     in the primary shard. Reply 'yes' to confirm."
                        .to_string(),
                )
            }
            Some(AdminCommand::Confirm) => Ok("Nothing awaiting confirmation.".to_string()),
            Some(AdminCommand::AutoDelete(sub)) => self.handle_autodelete(sub).await,
            Some(AdminCommand::Help) => Ok(HELP_TEXT.to_string()),
            None => Ok("Unrecognized command, try 'help'.".to_string()),
        }
    }

    async fn run_cleanup(&self) -> Result<String> {
        let report = self.index.cleanup_duplicates().await?;
        info!(
            subsystem = "admin",
            op = "cleanup",
            removed_count = report.removed,
            "Cleanup executed"
        );
        Ok(if report.removed == 0 {
            "No duplicates found to remove.".to_string()
        } else {
            format!(
                "Removed {} duplicate record(s) from the secondary shard.",
                report.removed
            )
        })
    }

    async fn report_status(&self) -> Result<String> {
        let status = self.index.status().await?;
        Ok(format!(
            "Primary shard:   {} files\nSecondary shard: {} files\nTotal:           {} files",
            status.primary,
            status.secondary,
            status.total()
        ))
    }

    async fn report_duplicates(&self) -> Result<String> {
        let report = self
            .index
            .duplicate_report(defaults::DUPLICATE_SAMPLE_LIMIT)
            .await?;
        Ok(format_duplicate_report(&report))
    }

    async fn report_search(&self, query: &str) -> Result<String> {
        let page = self
            .index
            .search(query, defaults::SEARCH_MAX_RESULTS, 0)
            .await?;
        if page.records.is_empty() {
            return Ok(format!("No results for '{query}'."));
        }
        let mut out = format!(
            "Total results: {} (showing {})\n",
            page.total_count,
            page.records.len()
        );
        for (idx, record) in page.records.iter().enumerate() {
            let _ = writeln!(out, "{:3}. {}", idx + 1, record.file_name);
        }
        if page.next_offset.is_some() {
            out.push_str("...more available\n");
        }
        Ok(out.trim_end().to_string())
    }

    async fn report_pattern(&self, pattern: &str) -> Result<String> {
        let hits = self.index.find_by_pattern(pattern).await?;
        if hits.is_empty() {
            return Ok(format!("No files match pattern '{pattern}'."));
        }
        let mut out = format!("{} file(s) match pattern '{pattern}':\n", hits.len());
        for (idx, (file, shard)) in hits.iter().enumerate() {
            let _ = writeln!(out, "{:3}. {} ({})", idx + 1, file.file_name, shard);
        }
        Ok(out.trim_end().to_string())
    }

    async fn handle_autodelete(&self, sub: AutoDeleteCommand) -> Result<String> {
        let Some(controls) = &self.autodelete else {
            return Ok("Auto-delete is not configured in this console.".to_string());
        };
        match sub {
            AutoDeleteCommand::On => {
                controls.toggle.enable();
                Ok("Auto-delete is now ENABLED.".to_string())
            }
            AutoDeleteCommand::Off => {
                controls.toggle.disable();
                Ok("Auto-delete is now DISABLED. Pending deletions still run.".to_string())
            }
            AutoDeleteCommand::Status => {
                let pending = controls.scheduler.pending_count().await;
                let state = if controls.toggle.is_enabled() {
                    "ENABLED"
                } else {
                    "DISABLED"
                };
                Ok(format!(
                    "Auto-delete: {state}\nPending deletions: {pending}\nDelete delay: {}s\nApplies to: group and supergroup chats",
                    controls.delay.as_secs()
                ))
            }
        }
    }
}

fn format_duplicate_report(report: &DuplicateReport) -> String {
    if report.total == 0 {
        return "No duplicate files across shards.".to_string();
    }
    let mut out = format!("Duplicate files found: {}\n", report.total);
    for file in &report.samples {
        let _ = writeln!(out, "  - {}", file.file_name);
    }
    if report.total > report.samples.len() {
        let _ = writeln!(out, "... and {} more", report.total - report.samples.len());
    }
    out.trim_end().to_string()
}
