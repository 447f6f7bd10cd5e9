//! Transient toast notifications.
//!
//! Notifications expire on their own after a TTL (3 seconds by default),
//! which `moka` enforces for us; callers only push and list.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;

/// Default lifetime of a notification.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    /// CSS class for the alert box.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
            Self::Info => "alert-info",
        }
    }

    /// Icon name (Font Awesome) shown next to the message.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Success => "check-circle",
            Self::Error => "exclamation-circle",
            Self::Info => "info-circle",
        }
    }

    /// Short label for plain-text output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A single toast message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Monotonic id; later notifications have larger ids.
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

/// Shared queue of active notifications.
///
/// Cheaply cloneable; all clones see the same notifications.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    next_id: AtomicU64,
    active: Cache<u64, Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Notifier {
    /// Create a notifier whose messages expire after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let active = Cache::builder()
            .max_capacity(64)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(NotifierInner {
                next_id: AtomicU64::new(1),
                active,
            }),
        }
    }

    /// Show a message. Returns its id for [`Notifier::dismiss`].
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            kind,
            message: message.into(),
        };
        tracing::debug!(id, kind = kind.label(), message = %notification.message, "Notification");
        self.inner.active.insert(id, notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Info, message)
    }

    /// Unexpired notifications, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        let mut list: Vec<Notification> =
            self.inner.active.iter().map(|(_, value)| value).collect();
        list.sort_by_key(|n| n.id);
        list
    }

    /// Close a notification before it expires.
    pub fn dismiss(&self, id: u64) {
        self.inner.active.invalidate(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_lists_in_push_order() {
        let notifier = Notifier::default();
        notifier.success("iPhone 15 Pro added to cart!");
        notifier.error("Failed to process order. Please try again.");

        let active = notifier.active();
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].kind, NotificationKind::Success);
        assert_eq!(active[1].kind, NotificationKind::Error);
        assert!(active[0].id < active[1].id);
    }

    #[test]
    fn test_dismiss() {
        let notifier = Notifier::default();
        let id = notifier.info("hello");
        notifier.dismiss(id);
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_expires_after_ttl() {
        let notifier = Notifier::new(Duration::from_millis(20));
        notifier.success("short-lived");
        std::thread::sleep(Duration::from_millis(60));
        assert!(notifier.active().is_empty());
    }

    #[test]
    fn test_kind_presentation() {
        assert_eq!(NotificationKind::Error.css_class(), "alert-danger");
        assert_eq!(NotificationKind::Success.icon(), "check-circle");
        assert_eq!(NotificationKind::Info.label(), "info");
    }
}
