//! Notification sinks for the rendering layer.

use biocurate_core::notification::{Notification, NotificationLevel, NotificationSink};
use tokio::sync::mpsc;

/// Forwards notifications to a channel drained by the UI.
///
/// Sends after the receiver is dropped are logged and discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    pub fn new(sender: mpsc::UnboundedSender<Notification>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sender.send(notification) {
            tracing::debug!(
                "[ChannelNotificationSink] Receiver gone, dropping: {}",
                e.0.message
            );
        }
    }
}

/// Writes notifications to the log only. Useful for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        let source = notification.source_id.as_deref().unwrap_or("-");
        match notification.level {
            NotificationLevel::Info | NotificationLevel::Success => {
                tracing::info!("[{}] {} ({})", notification.level, notification.message, source)
            }
            NotificationLevel::Warning => {
                tracing::warn!("[{}] {} ({})", notification.level, notification.message, source)
            }
            NotificationLevel::Error => {
                tracing::error!("[{}] {} ({})", notification.level, notification.message, source)
            }
        }
    }
}
