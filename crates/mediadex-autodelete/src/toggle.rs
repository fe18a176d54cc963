//! Runtime on/off switch for the auto-delete feature.
//!
//! Injected shared state rather than a mutable global: clones observe the
//! same flag, and the scheduler reads it only at `schedule` time, so tasks
//! already pending are unaffected by later toggling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::info;

use mediadex_core::defaults;

/// Shared auto-delete toggle. Clones share the same flag.
///
/// The hot path (`is_enabled`) is a lock-free atomic read.
#[derive(Clone, Debug)]
pub struct AutoDeleteToggle {
    enabled: Arc<AtomicBool>,
}

impl AutoDeleteToggle {
    /// Create a toggle with the given initial state.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Check whether auto-deletion is enabled (hot path, lock-free).
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Enable the feature.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        info!(subsystem = "scheduler", "Auto-delete ENABLED");
    }

    /// Disable the feature. Tasks already pending continue to completion.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        info!(subsystem = "scheduler", "Auto-delete DISABLED");
    }

    /// Flip the flag and return the new state.
    pub fn toggle(&self) -> bool {
        let new_state = !self.enabled.fetch_xor(true, Ordering::SeqCst);
        info!(
            subsystem = "scheduler",
            enabled = new_state,
            "Auto-delete toggled"
        );
        new_state
    }
}

impl Default for AutoDeleteToggle {
    fn default() -> Self {
        Self::new(defaults::AUTO_DELETE_ENABLED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_shared_between_clones() {
        let toggle = AutoDeleteToggle::new(true);
        let clone = toggle.clone();
        clone.disable();
        assert!(!toggle.is_enabled());
        toggle.enable();
        assert!(clone.is_enabled());
    }

    #[test]
    fn test_toggle_flip_returns_new_state() {
        let toggle = AutoDeleteToggle::new(false);
        assert!(toggle.toggle());
        assert!(toggle.is_enabled());
        assert!(!toggle.toggle());
    }

    #[test]
    fn test_default_follows_defaults() {
        assert_eq!(
            AutoDeleteToggle::default().is_enabled(),
            defaults::AUTO_DELETE_ENABLED
        );
    }
}
