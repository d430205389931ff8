//! Notification sinks
//!
//! The data loader reports fetch failures as [`Toast`]s. Where they end up is
//! up to the consumer: a UI renders them, a CLI logs them.

mod toast;

pub use toast::*;

use tokio::sync::mpsc;

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Shows a notification.
    fn notify(&self, toast: Toast);
}

/// Notifier that writes toasts to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Error => log::error!("{}", toast.message),
            ToastLevel::Warning => log::warn!("{}", toast.message),
            ToastLevel::Info | ToastLevel::Success => log::info!("{}", toast.message),
        }
    }
}

/// Notifier that forwards toasts over a channel.
///
/// Sending never blocks; toasts are dropped once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver its toasts arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, toast: Toast) {
        let _ = self.tx.send(toast);
    }
}
