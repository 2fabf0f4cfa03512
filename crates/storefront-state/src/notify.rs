//! # Notifications
//!
//! User-facing messages ("Added to Cart", "Network Error", ...) produced by
//! the state layer. How they are shown is up to the UI; the store only hands
//! them to a [`Notifier`].
//!
//! ```text
//! Storefront / SyncController ──► Notifier::notify(Notification)
//!                                      │
//!                 ┌────────────────────┼─────────────────────┐
//!                 ▼                    ▼                     ▼
//!          TracingNotifier      ChannelNotifier         (UI toast impl)
//!          (log only)           (mpsc → UI / tests)
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sink for user-facing notifications.
///
/// Implementations must not block; they are called while cart operations
/// and background sync pushes run.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.notify(Notification::success(message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::error(message));
    }
}

/// Writes notifications to the log. Used when no UI is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(text = %notification.message, "Notification"),
            NotificationLevel::Error => warn!(text = %notification.message, "Notification"),
        }
    }
}

/// Forwards notifications over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Creates the notifier and the receiving end for the UI.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Receiver gone means the UI was torn down; nothing left to tell.
        let _ = self.tx.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.success("Added to Cart");
        notifier.error("Network Error");

        assert_eq!(rx.try_recv().unwrap(), Notification::success("Added to Cart"));
        let second = rx.try_recv().unwrap();
        assert!(second.is_error());
        assert_eq!(second.message, "Network Error");
    }

    #[test]
    fn test_channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.success("still fine");
    }
}
