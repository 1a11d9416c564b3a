//! Notification surface: a fire-and-forget message sink plus the OS-level
//! permission gate the cooking timers consult lazily on first start. The
//! default implementation renders messages as structured log lines.

use axum::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Unset,
    Granted,
    Denied,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Current OS-level notification permission.
    fn permission(&self) -> NotificationPermission;

    /// Request permission from the surface; returns the resulting state.
    /// Called at most once, lazily, on the first timer start.
    async fn request_permission(&self) -> NotificationPermission;

    async fn success(&self, message: &str);

    async fn error(&self, message: &str);
}

/// Server-side stand-in for the toast layer: every message becomes a log
/// line, and permission is always granted.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    async fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Granted
    }

    async fn success(&self, message: &str) {
        tracing::info!(kind = "success", %message, "notification");
    }

    async fn error(&self, message: &str) {
        tracing::warn!(kind = "error", %message, "notification");
    }
}
