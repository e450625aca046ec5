//! Notification side channel.
//!
//! Phase boundaries of the pomodoro timer raise one of four fixed messages.
//! Delivery is fire-and-forget: a [`Notifier`] never reports failure back to
//! the engine, and once permission has been denied every message is dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// The fixed set of user-visible notification texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMessage {
    FocusStart,
    FocusEnd,
    BreakStart,
    BreakEnd,
}

impl NotificationMessage {
    pub fn text(&self) -> &'static str {
        match self {
            NotificationMessage::FocusStart => "Focus session started",
            NotificationMessage::FocusEnd => "Focus session ended",
            NotificationMessage::BreakStart => "Break time started",
            NotificationMessage::BreakEnd => "Break time ended",
        }
    }

    /// Message for entering a phase.
    pub fn phase_start(is_break: bool) -> Self {
        if is_break {
            NotificationMessage::BreakStart
        } else {
            NotificationMessage::FocusStart
        }
    }

    /// Message for leaving a phase.
    pub fn phase_end(was_break: bool) -> Self {
        if was_break {
            NotificationMessage::BreakEnd
        } else {
            NotificationMessage::FocusEnd
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

/// A sink for user-visible notifications (desktop popups, logs, ...).
pub trait Notifier: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Asked once when the channel is opened.
    fn request_permission(&self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, message: NotificationMessage);
}

/// A notifier paired with the permission it was granted at startup.
#[derive(Clone)]
pub struct NotificationChannel {
    notifier: Arc<dyn Notifier>,
    permission: Permission,
}

impl NotificationChannel {
    /// Open the channel, asking the notifier for permission exactly once.
    pub fn open(notifier: Arc<dyn Notifier>) -> Self {
        let permission = notifier.request_permission();
        if permission == Permission::Denied {
            tracing::warn!(notifier = notifier.name(), "notification permission denied");
        }
        Self {
            notifier,
            permission,
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Deliver `message` if `enabled` and permitted. Returns whether it was sent.
    pub fn send(&self, enabled: bool, message: NotificationMessage) -> bool {
        if !enabled || self.permission == Permission::Denied {
            tracing::debug!(%message, enabled, "notification skipped");
            return false;
        }
        self.notifier.notify(message);
        true
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("notifier", &self.notifier.name())
            .field("permission", &self.permission)
            .finish()
    }
}

/// Writes notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, message: NotificationMessage) {
        tracing::info!(target: "ambiroom::notify", "{message}");
    }
}

/// Keeps every delivered message in memory.
#[derive(Debug)]
pub struct MemoryNotifier {
    permission: Permission,
    requests: AtomicUsize,
    sent: Mutex<Vec<NotificationMessage>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::with_permission(Permission::Granted)
    }

    pub fn denied() -> Self {
        Self::with_permission(Permission::Denied)
    }

    pub fn with_permission(permission: Permission) -> Self {
        Self {
            permission,
            requests: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages delivered so far, oldest first.
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn permission_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MemoryNotifier {
    fn name(&self) -> &str {
        "memory"
    }

    fn request_permission(&self) -> Permission {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    fn notify(&self, message: NotificationMessage) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_texts() {
        assert_eq!(NotificationMessage::FocusStart.text(), "Focus session started");
        assert_eq!(NotificationMessage::FocusEnd.text(), "Focus session ended");
        assert_eq!(NotificationMessage::BreakStart.text(), "Break time started");
        assert_eq!(NotificationMessage::BreakEnd.text(), "Break time ended");
    }

    #[test]
    fn start_and_end_framing_are_inverted() {
        assert_eq!(NotificationMessage::phase_start(true), NotificationMessage::BreakStart);
        assert_eq!(NotificationMessage::phase_end(false), NotificationMessage::FocusEnd);
    }

    #[test]
    fn channel_asks_permission_once() {
        let notifier = Arc::new(MemoryNotifier::new());
        let channel = NotificationChannel::open(notifier.clone());
        channel.send(true, NotificationMessage::FocusStart);
        channel.send(true, NotificationMessage::FocusEnd);
        assert_eq!(notifier.permission_requests(), 1);
        assert_eq!(notifier.sent().len(), 2);
    }

    #[test]
    fn denied_or_disabled_messages_are_dropped() {
        let denied = Arc::new(MemoryNotifier::denied());
        let channel = NotificationChannel::open(denied.clone());
        assert!(!channel.send(true, NotificationMessage::BreakStart));
        assert!(denied.sent().is_empty());

        let granted = Arc::new(MemoryNotifier::new());
        let channel = NotificationChannel::open(granted.clone());
        assert!(!channel.send(false, NotificationMessage::BreakStart));
        assert!(granted.sent().is_empty());
    }
}
