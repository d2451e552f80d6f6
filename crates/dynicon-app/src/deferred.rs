//! Deferred icon switching
//!
//! On blacklisted devices the switcher records the request and hands a
//! [`DeferredTask`] to the host. The host runs the task at its next
//! app-closing lifecycle event via [`IconSwitcher::run_deferred`].
//!
//! [`IconSwitcher::run_deferred`]: crate::switcher::IconSwitcher::run_deferred

use dynicon_core::prelude::*;
use tokio::sync::mpsc;

/// Work the host must run at its next lifecycle point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Apply the icon stored in the pending selection
    ApplyPending,
    /// Restore the main entry point
    ResetToDefault,
}

/// Hands deferred tasks to the host environment
pub trait DeferredTrigger: Send + Sync {
    fn schedule(&self, task: DeferredTask);
}

/// Trigger backed by an unbounded channel the host drains on app close
#[derive(Debug, Clone)]
pub struct ChannelTrigger {
    tx: mpsc::UnboundedSender<DeferredTask>,
}

impl ChannelTrigger {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DeferredTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DeferredTrigger for ChannelTrigger {
    fn schedule(&self, task: DeferredTask) {
        debug!("Scheduling deferred task: {:?}", task);
        if self.tx.send(task).is_err() {
            warn!("Deferred task {:?} dropped: host receiver closed", task);
        }
    }
}

/// Drain every queued task, returning only the one that still matters
///
/// The pending selection already holds the latest request, so running the
/// most recently scheduled task alone reaches the same end state.
pub fn take_latest(rx: &mut mpsc::UnboundedReceiver<DeferredTask>) -> Option<DeferredTask> {
    let mut latest = None;
    while let Ok(task) = rx.try_recv() {
        if latest.is_some() {
            trace!("Superseding deferred task {:?} with {:?}", latest, task);
        }
        latest = Some(task);
    }
    latest
}

/// Trigger that records scheduled tasks for inspection
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct RecordingTrigger {
    tasks: std::sync::Mutex<Vec<DeferredTask>>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl RecordingTrigger {
    fn recorded(&self) -> std::sync::MutexGuard<'_, Vec<DeferredTask>> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Tasks scheduled so far, oldest first
    pub fn tasks(&self) -> Vec<DeferredTask> {
        self.recorded().clone()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl DeferredTrigger for RecordingTrigger {
    fn schedule(&self, task: DeferredTask) {
        self.recorded().push(task);
    }
}
