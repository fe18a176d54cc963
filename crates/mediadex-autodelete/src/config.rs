//! Configuration for the deletion scheduler.

use std::time::Duration;

use mediadex_core::defaults;

use crate::toggle::AutoDeleteToggle;

/// Configuration for the deletion scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Total delay between scheduling and deletion.
    pub delay: Duration,
    /// Shared runtime toggle, read at `schedule` call time only.
    pub enabled: AutoDeleteToggle,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(defaults::AUTO_DELETE_DELAY_SECS),
            enabled: AutoDeleteToggle::default(),
        }
    }
}

impl SchedulerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `AUTO_DELETE_ENABLED` | `true` | Enable/disable scheduling |
    /// | `AUTO_DELETE_DELAY_SECS` | `20` | Delay before deletion |
    pub fn from_env() -> Self {
        let enabled = std::env::var("AUTO_DELETE_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults::AUTO_DELETE_ENABLED);

        let delay_secs = std::env::var("AUTO_DELETE_DELAY_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::AUTO_DELETE_DELAY_SECS);

        Self {
            delay: Duration::from_secs(delay_secs),
            enabled: AutoDeleteToggle::new(enabled),
        }
    }

    /// Set the total deletion delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Use an existing shared toggle.
    pub fn with_toggle(mut self, toggle: AutoDeleteToggle) -> Self {
        self.enabled = toggle;
        self
    }
}

/// Countdown checkpoints for a given total delay, in seconds remaining,
/// ordered from earliest to latest notification.
///
/// The reference checkpoints are kept only when they fit strictly inside
/// the delay window, so a shortened delay drops the ones it cannot reach
/// instead of producing negative sleeps.
pub fn countdown_checkpoints(delay: Duration) -> Vec<Duration> {
    defaults::COUNTDOWN_CHECKPOINTS_SECS
        .iter()
        .copied()
        .filter(|&secs| secs < delay.as_secs())
        .map(Duration::from_secs)
        .collect()
}
