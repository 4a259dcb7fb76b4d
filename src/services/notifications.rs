// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification panel operations for the signed-in user.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::AppNotification;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<dyn DocumentStore>,
}

impl NotificationService {
    pub fn new(db: Arc<dyn DocumentStore>) -> Self {
        Self { db }
    }

    /// Notifications addressed to `uid`, newest first.
    pub async fn list_for(&self, uid: &str) -> Result<Vec<AppNotification>> {
        let mut notifications = self.db.list_notifications(uid).await?;
        notifications.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(notifications)
    }

    pub fn unread_count(notifications: &[AppNotification]) -> usize {
        notifications.iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read; returns 1 if it was unread, else 0.
    /// Notifications addressed to someone else look the same as missing ones.
    pub async fn mark_read(&self, uid: &str, id: &str) -> Result<usize> {
        let notification = self
            .db
            .get_notification(id)
            .await?
            .filter(|n| n.recipient_uid == uid)
            .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))?;

        if notification.read {
            return Ok(0);
        }

        self.db.mark_notifications_read(&[notification.id]).await?;
        Ok(1)
    }

    /// Mark every unread notification for `uid` read; returns how many
    /// were flipped.
    pub async fn mark_all_read(&self, uid: &str) -> Result<usize> {
        let unread: Vec<String> = self
            .db
            .list_notifications(uid)
            .await?
            .into_iter()
            .filter(|n| !n.read)
            .map(|n| n.id)
            .collect();

        if unread.is_empty() {
            return Ok(0);
        }

        self.db.mark_notifications_read(&unread).await?;
        tracing::debug!(uid, count = unread.len(), "Marked notifications read");
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewNotification, NotificationType};

    async fn seed(store: &MemoryStore, recipient: &str, count: usize) -> Vec<AppNotification> {
        let mut out = Vec::new();
        for i in 0..count {
            out.push(
                store
                    .add_notification(NewNotification::new(
                        recipient,
                        NotificationType::MemberJoined,
                        format!("member {i} joined"),
                    ))
                    .await
                    .unwrap(),
            );
        }
        out
    }

    #[tokio::test]
    async fn mark_all_read_skips_already_read() {
        let store = Arc::new(MemoryStore::new());
        let service = NotificationService::new(store.clone());
        let notes = seed(&store, "u1", 3).await;
        seed(&store, "u2", 1).await;

        assert_eq!(service.mark_read("u1", &notes[0].id).await.unwrap(), 1);
        assert_eq!(service.mark_read("u1", &notes[0].id).await.unwrap(), 0);
        assert_eq!(service.mark_all_read("u1").await.unwrap(), 2);
        assert_eq!(service.mark_all_read("u1").await.unwrap(), 0);

        let listed = service.list_for("u1").await.unwrap();
        assert_eq!(NotificationService::unread_count(&listed), 0);
        let other = service.list_for("u2").await.unwrap();
        assert_eq!(NotificationService::unread_count(&other), 1);
    }

    #[tokio::test]
    async fn cannot_mark_someone_elses_notification() {
        let store = Arc::new(MemoryStore::new());
        let service = NotificationService::new(store.clone());
        let notes = seed(&store, "u1", 1).await;

        let err = service.mark_read("intruder", &notes[0].id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!store.get_notification(&notes[0].id).await.unwrap().unwrap().read);
    }
}
