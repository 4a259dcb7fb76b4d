// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-app notification model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AccountApproved,
    AccountRejected,
    MapInvite,
    MemberJoined,
    MemberLeft,
    RestaurantAdded,
    System,
}

/// Notification document (`notifications/{id}`).
///
/// Only the `read` flag changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AppNotification {
    #[serde(default)]
    pub id: String,
    pub recipient_uid: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_name: Option<String>,
    /// Write time (ISO 8601), assigned by the store
    pub created_at: String,
}

/// A notification that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient_uid: String,
    pub kind: NotificationType,
    pub message: String,
    pub map_name: Option<String>,
}

impl NewNotification {
    pub fn new(
        recipient_uid: impl Into<String>,
        kind: NotificationType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            recipient_uid: recipient_uid.into(),
            kind,
            message: message.into(),
            map_name: None,
        }
    }

    /// Materialize with the id and timestamp chosen by the store.
    pub fn into_stored(self, id: String, created_at: String) -> AppNotification {
        AppNotification {
            id,
            recipient_uid: self.recipient_uid,
            kind: self.kind,
            message: self.message,
            read: false,
            map_name: self.map_name,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_without_id_deserializes() {
        let notification: AppNotification = serde_json::from_value(serde_json::json!({
            "recipientUid": "u1",
            "type": "member_joined",
            "message": "Alice joined Night Market",
            "createdAt": "2026-03-01T00:00:00.000Z"
        }))
        .unwrap();

        assert!(notification.id.is_empty());
        assert_eq!(notification.kind, NotificationType::MemberJoined);
        assert!(!notification.read);
    }
}
