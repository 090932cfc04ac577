//! Transient notifications.
//!
//! Each notice lives for a fixed time-to-live (3 seconds by default) and then
//! removes itself. Notices stack: several can be active at once, and each one
//! expires on its own schedule.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default lifetime of a notice.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(3);

/// Whether a notice reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class used by the storefront markup.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notification success",
            Self::Error => "notification error",
        }
    }
}

/// A single transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: NoticeKind, message: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message,
            raised_at: Utc::now(),
        }
    }

    /// Whether this is an error notice.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NoticeKind::Error)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Publishes notices and retires them after their time-to-live.
///
/// Cheap to clone; clones publish to the same list.
#[derive(Clone)]
pub struct NotificationCenter {
    active: Arc<watch::Sender<Vec<Notice>>>,
    ttl: Duration,
}

impl NotificationCenter {
    /// Create a center whose notices live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (active, _) = watch::channel(Vec::new());
        Self {
            active: Arc::new(active),
            ttl,
        }
    }

    /// Lifetime of each notice.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Publish a notice and schedule its removal.
    ///
    /// Outside a Tokio runtime the notice cannot expire on its own and stays
    /// until [`dismiss`](Self::dismiss)ed.
    pub fn notify(&self, kind: NoticeKind, message: impl Into<String>) -> Uuid {
        let notice = Notice::new(kind, message.into());
        let id = notice.id;
        debug!(%id, ?kind, message = %notice.message, "Notice raised");

        self.active.send_modify(|list| list.push(notice));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let active = Arc::clone(&self.active);
                let ttl = self.ttl;
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    active.send_if_modified(|list| remove(list, id));
                });
            }
            Err(_) => warn!(%id, "No runtime available; notice will not expire"),
        }

        id
    }

    /// Publish a success notice.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(NoticeKind::Success, message)
    }

    /// Publish an error notice.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(NoticeKind::Error, message)
    }

    /// Remove a notice before it expires. Returns whether it was active.
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.active.send_if_modified(|list| remove(list, id))
    }

    /// Currently visible notices, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<Notice> {
        self.active.borrow().clone()
    }

    /// Observe the list of visible notices.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notice>> {
        self.active.subscribe()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TTL)
    }
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("active", &self.active.borrow().len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn remove(list: &mut Vec<Notice>, id: Uuid) -> bool {
    let before = list.len();
    list.retain(|n| n.id != id);
    list.len() != before
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    fn messages(center: &NotificationCenter) -> Vec<String> {
        center.active().into_iter().map(|n| n.message).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let center = NotificationCenter::default();
        center.success("Item added to cart!");
        assert_eq!(messages(&center), vec!["Item added to cart!"]);

        assert_eq!(center.ttl(), DEFAULT_NOTICE_TTL);
        sleep(center.ttl() - Duration::from_millis(1)).await;
        assert_eq!(center.active().len(), 1);

        sleep(Duration::from_millis(2)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notices_stack_and_expire_independently() {
        let center = NotificationCenter::default();
        center.error("Network error");
        sleep(Duration::from_millis(1000)).await;
        center.success("Item removed from cart!");

        assert_eq!(messages(&center), vec!["Network error", "Item removed from cart!"]);

        sleep(Duration::from_millis(2001)).await;
        assert_eq!(messages(&center), vec!["Item removed from cart!"]);

        sleep(Duration::from_millis(1000)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_early() {
        let center = NotificationCenter::new(Duration::from_millis(500));
        let id = center.error("Invalid credentials");
        assert!(center.dismiss(id));
        assert!(!center.dismiss(id));
        assert!(center.active().is_empty());

        // The expiry task finds nothing left to remove.
        sleep(Duration::from_millis(501)).await;
        assert!(center.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let center = NotificationCenter::default();
        let mut rx = center.subscribe();

        center.success("Login successful!");
        rx.changed().await.unwrap();
        assert!(!rx.borrow_and_update().first().unwrap().is_error());

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_display_and_classes() {
        let center = NotificationCenter::default();
        center.error("Request failed");
        let notice = center.active().pop().unwrap();
        assert_eq!(notice.to_string(), "[error] Request failed");
        assert_eq!(notice.kind.css_class(), "notification error");
    }
}
