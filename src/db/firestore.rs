// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides operations for:
//! - Users (approval fields, deletion)
//! - Notifications (creation, read flag)
//! - Maps and restaurants (read-only listing)

use crate::db::{collections, DocumentStore};
use crate::error::AppError;
use crate::models::{
    AppNotification, NewNotification, Restaurant, StatusUpdate, UserMap, UserProfile, UserStatus,
};
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

/// Partial user document carrying only the approval fields.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusFields {
    status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    approved_at: Option<String>,
}

impl From<&StatusUpdate> for StatusFields {
    fn from(update: &StatusUpdate) -> Self {
        Self {
            status: update.status,
            approved_by: update.approved_by.clone(),
            approved_at: update.approved_at.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReadFlag {
    read: bool,
}

/// A document read back from Firestore, with its id taken from the
/// document name. Documents written by the web client (`addDoc`) carry no
/// `id` field in their body.
#[derive(Debug, Deserialize)]
struct Stored<T> {
    #[serde(rename = "_firestore_id")]
    doc_id: String,
    #[serde(flatten)]
    body: T,
}

trait HasDocId {
    fn set_id(&mut self, id: String);
}

impl HasDocId for UserProfile {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HasDocId for AppNotification {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HasDocId for UserMap {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl HasDocId for Restaurant {
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl<T: HasDocId> Stored<T> {
    fn into_inner(self) -> T {
        let mut body = self.body;
        body.set_id(self.doc_id);
        body
    }
}

fn unwrap_all<T: HasDocId>(docs: Vec<Stored<T>>) -> Vec<T> {
    docs.into_iter().map(Stored::into_inner).collect()
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Seeding (signup backend / map backend stand-ins) ────────

    /// Create or replace a whole user profile.
    pub async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError> {
        let _: Stored<UserProfile> = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn upsert_map(&self, map: &UserMap) -> Result<(), AppError> {
        let _: Stored<UserMap> = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::MAPS)
            .document_id(&map.id)
            .object(map)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn upsert_restaurant(&self, restaurant: &Restaurant) -> Result<(), AppError> {
        let _: Stored<Restaurant> = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RESTAURANTS)
            .document_id(&restaurant.id)
            .object(restaurant)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        let docs: Vec<Stored<UserProfile>> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(unwrap_all(docs))
    }

    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        let doc: Option<Stored<UserProfile>> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(uid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.map(Stored::into_inner))
    }

    async fn update_user_status(
        &self,
        uid: &str,
        update: &StatusUpdate,
    ) -> Result<UserProfile, AppError> {
        let fields = StatusFields::from(update);

        let doc: Stored<UserProfile> = self
            .get_client()?
            .fluent()
            .update()
            .fields(update.field_paths())
            .in_col(collections::USERS)
            .document_id(uid)
            .object(&fields)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.into_inner())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(uid)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Notification Operations ─────────────────────────────────

    async fn add_notification(
        &self,
        notification: NewNotification,
    ) -> Result<AppNotification, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let stored = notification.into_stored(id, now_rfc3339());

        let doc: Stored<AppNotification> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::NOTIFICATIONS)
            .document_id(&stored.id)
            .object(&stored)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.into_inner())
    }

    async fn get_notification(&self, id: &str) -> Result<Option<AppNotification>, AppError> {
        let doc: Option<Stored<AppNotification>> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::NOTIFICATIONS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.map(Stored::into_inner))
    }

    async fn list_notifications(
        &self,
        recipient_uid: &str,
    ) -> Result<Vec<AppNotification>, AppError> {
        let recipient_uid = recipient_uid.to_string();
        let docs: Vec<Stored<AppNotification>> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::NOTIFICATIONS)
            .filter(move |q| q.for_all([q.field("recipientUid").eq(recipient_uid.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(unwrap_all(docs))
    }

    /// Uses concurrent writes with a limit to avoid overloading Firestore.
    async fn mark_notifications_read(&self, ids: &[String]) -> Result<(), AppError> {
        let client = self.get_client()?;

        stream::iter(ids.to_vec())
            .map(|id| async move {
                let _: Stored<AppNotification> = client
                    .fluent()
                    .update()
                    .fields(["read"])
                    .in_col(collections::NOTIFICATIONS)
                    .document_id(&id)
                    .object(&ReadFlag { read: true })
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                Ok::<_, AppError>(())
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<(), AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<()>, AppError>>()?;

        Ok(())
    }

    // ─── Map & Restaurant Operations ─────────────────────────────

    async fn list_maps(&self) -> Result<Vec<UserMap>, AppError> {
        let docs: Vec<Stored<UserMap>> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MAPS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(unwrap_all(docs))
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppError> {
        let docs: Vec<Stored<Restaurant>> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::RESTAURANTS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(unwrap_all(docs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_fields_round_trip_through_firestore_bounds() {
        fn assert_object<T: Serialize + Sync + Send + for<'de> Deserialize<'de>>() {}
        assert_object::<StatusFields>();
        assert_object::<ReadFlag>();

        let update = StatusUpdate {
            status: UserStatus::Approved,
            approved_by: None,
            approved_at: Some("2026-03-02T00:00:00.000Z".to_string()),
        };
        let json = serde_json::to_value(StatusFields::from(&update)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "approved", "approvedAt": "2026-03-02T00:00:00.000Z"})
        );

        let back: StatusFields = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, UserStatus::Approved);
        assert!(back.approved_by.is_none());
    }

    #[test]
    fn stored_document_takes_id_from_document_name() {
        // Written by the web client: no `id` in the body.
        let doc: Stored<AppNotification> = serde_json::from_value(serde_json::json!({
            "_firestore_id": "n-from-client",
            "_firestore_full_id": "projects/p/databases/(default)/documents/notifications/n-from-client",
            "recipientUid": "u1",
            "type": "member_joined",
            "message": "Alice joined Night Market",
            "mapName": "Night Market",
            "createdAt": "2026-03-01T00:00:00.000Z"
        }))
        .unwrap();
        let notification = doc.into_inner();
        assert_eq!(notification.id, "n-from-client");
        assert_eq!(notification.map_name.as_deref(), Some("Night Market"));
        assert!(!notification.read);

        // Written by this service: the body id is kept in step with the name.
        let doc: Stored<UserProfile> = serde_json::from_value(serde_json::json!({
            "_firestore_id": "u2",
            "id": "u2",
            "email": "u2@example.com",
            "createdAt": "2026-03-01T00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(doc.into_inner().id, "u2");
    }
}
