//! In-memory notification queue.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    /// Auto-dismiss delay used when the caller does not pick one.
    pub const fn default_duration(self) -> Duration {
        match self {
            Self::Error => Duration::from_secs(7),
            _ => Duration::from_secs(5),
        }
    }
}

/// Optional extras for [`NotificationCenter::add`].
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    pub title: Option<String>,
    /// Grouping tag, e.g. `proposal`.
    pub category: Option<String>,
    /// `Some(Duration::ZERO)` keeps the notification until removed.
    pub duration: Option<Duration>,
    pub meta: Option<Value>,
}

impl NotificationOptions {
    pub fn sticky() -> Self {
        Self { duration: Some(Duration::ZERO), ..Self::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub category: Option<String>,
    /// Zero means sticky.
    pub duration: Duration,
    pub meta: Option<Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_sticky(&self) -> bool {
        self.duration.is_zero()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.is_sticky() {
            return false;
        }
        chrono::Duration::from_std(self.duration)
            .map(|d| now >= self.created_at + d)
            .unwrap_or(false)
    }
}

/// Shared notification queue; clones see the same queue.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    items: Arc<RwLock<Vec<Notification>>>,
    sender: broadcast::Sender<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { items: Arc::new(RwLock::new(Vec::new())), sender }
    }

    /// Receive every notification added from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn add(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        options: NotificationOptions,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
            title: options.title,
            category: options.category,
            duration: options.duration.unwrap_or_else(|| kind.default_duration()),
            meta: options.meta,
            read: false,
            created_at: Utc::now(),
        };
        let id = notification.id;
        self.items.write().push(notification.clone());
        let _ = self.sender.send(notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::Success, NotificationOptions::default())
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::Error, NotificationOptions::default())
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::Info, NotificationOptions::default())
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.add(message, NotificationKind::Warning, NotificationOptions::default())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|n| n.id != id);
        items.len() != before
    }

    pub fn clear(&self) {
        self.items.write().clear();
    }

    /// Snapshot, oldest first.
    pub fn list(&self) -> Vec<Notification> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.items.read().iter().filter(|n| !n.read).count()
    }

    pub fn mark_all_read(&self) {
        for notification in self.items.write().iter_mut() {
            notification.read = true;
        }
    }

    /// Drop timed notifications older than their duration; returns how many.
    pub fn dismiss_expired(&self, now: DateTime<Utc>) -> usize {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|n| !n.is_expired(now));
        before - items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let center = NotificationCenter::new();
        let a = center.success("Salvo");
        let b = center.error("Falhou");
        center.error("Falhou");

        assert_eq!(center.len(), 3);
        assert_eq!(center.unread_count(), 3);
        assert!(center.remove(a));
        assert!(!center.remove(a));

        let list = center.list();
        assert_eq!(list[0].id, b);
        assert_eq!(list[0].duration, Duration::from_secs(7));
        center.mark_all_read();
        assert_eq!(center.unread_count(), 0);
        center.clear();
        assert!(center.is_empty());
    }

    #[test]
    fn test_dismiss_expired_keeps_sticky() {
        let center = NotificationCenter::new();
        center.info("passageira");
        center.add("fixa", NotificationKind::Info, NotificationOptions::sticky().with_category("proposal"));

        assert_eq!(center.dismiss_expired(Utc::now()), 0);
        let later = Utc::now() + chrono::Duration::seconds(6);
        assert_eq!(center.dismiss_expired(later), 1);

        let remaining = center.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category.as_deref(), Some("proposal"));
        assert!(remaining[0].is_sticky());
    }

    #[test]
    fn test_subscribers_see_additions() {
        let center = NotificationCenter::new();
        let mut rx = center.subscribe();
        let id = center.add(
            "Nova proposta",
            NotificationKind::Info,
            NotificationOptions::default().with_title("Nova proposta recebida!"),
        );

        let received = rx.try_recv().unwrap();
        assert_eq!(received.id, id);
        assert_eq!(received.title.as_deref(), Some("Nova proposta recebida!"));
    }
}
