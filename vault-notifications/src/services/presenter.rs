//! Sorted notification feed

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::notification::Notification;

/// Notifications ordered newest first, alongside the read marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub last_read_timestamp: DateTime<Utc>,
}

impl NotificationFeed {
    pub fn is_unread(&self, notification: &Notification) -> bool {
        notification.is_unread(self.last_read_timestamp)
    }

    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| self.is_unread(n))
    }

    pub fn unread_count(&self) -> usize {
        self.unread().count()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }
}

/// Sort by date descending. Equal dates keep their aggregation order.
pub fn present(mut notifications: Vec<Notification>, last_read: DateTime<Utc>) -> NotificationFeed {
    notifications.sort_by(|a, b| b.date().cmp(&a.date()));

    NotificationFeed {
        notifications,
        last_read_timestamp: last_read,
    }
}
