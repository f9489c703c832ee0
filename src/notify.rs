use std::sync::{Arc, Mutex};

use serde::Serialize;

/// How an outcome should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// One user-facing outcome message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Receives the outcome of each bookmark action
///
/// Display and timing belong to the host; the controller only picks the text.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Writes notifications to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success => tracing::info!(message = %message, "Bookmark notification"),
            Severity::Error => tracing::warn!(message = %message, "Bookmark notification"),
        }
    }
}

/// Collects notifications in memory for hosts that poll for them
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Removes and returns everything collected so far
    pub fn drain(&self) -> Vec<Notification> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::take(&mut *entries)
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().last().cloned()
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification {
                severity,
                message: message.to_string(),
            });
    }
}
