// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Run with:
//! `FIRESTORE_EMULATOR_HOST=localhost:8080 cargo test --test firestore_integration`
//!
//! Each test uses fresh document ids, so runs do not interfere.

use tracebook::db::DocumentStore;
use tracebook::models::{
    NewNotification, NotificationType, StatusUpdate, UserMap, UserRole, UserStatus,
};

mod common;
use common::{profile, test_db};

/// Generate a unique uid for test isolation.
fn unique_uid(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}

#[tokio::test]
async fn test_status_update_writes_only_named_fields() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");

    let mut user = profile(&uid, false, UserStatus::Pending, UserRole::User);
    user.display_name = Some("Keep Me".to_string());
    db.upsert_user(&user).await.unwrap();

    let update = StatusUpdate {
        status: UserStatus::Approved,
        approved_by: Some("admin-1".to_string()),
        approved_at: Some("2026-03-02T00:00:00.000Z".to_string()),
    };
    db.update_user_status(&uid, &update).await.unwrap();

    let stored = db.get_user(&uid).await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Approved);
    assert_eq!(stored.approved_by.as_deref(), Some("admin-1"));
    assert_eq!(stored.display_name.as_deref(), Some("Keep Me"));
    assert!(!stored.email_verified);
    assert!(stored.manually_approved());
}

#[tokio::test]
async fn test_delete_user() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("user");
    db.upsert_user(&profile(&uid, true, UserStatus::Approved, UserRole::User))
        .await
        .unwrap();

    db.delete_user(&uid).await.unwrap();

    assert!(db.get_user(&uid).await.unwrap().is_none());
}

#[tokio::test]
async fn test_notification_lifecycle() {
    require_emulator!();

    let db = test_db().await;
    let uid = unique_uid("recipient");

    let first = db
        .add_notification(NewNotification::new(
            &uid,
            NotificationType::AccountApproved,
            "welcome",
        ))
        .await
        .unwrap();
    db.add_notification(NewNotification::new(
        &uid,
        NotificationType::System,
        "maintenance tonight",
    ))
    .await
    .unwrap();

    assert!(!first.id.is_empty());
    assert!(!first.created_at.is_empty());

    let listed = db.list_notifications(&uid).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|n| !n.read && n.recipient_uid == uid));

    let ids: Vec<String> = listed.iter().map(|n| n.id.clone()).collect();
    db.mark_notifications_read(&ids).await.unwrap();

    let listed = db.list_notifications(&uid).await.unwrap();
    assert!(listed.iter().all(|n| n.read));
    assert_eq!(
        db.get_notification(&first.id).await.unwrap().unwrap().message,
        "welcome"
    );
}

#[tokio::test]
async fn test_list_maps_includes_seeded_map() {
    require_emulator!();

    let db = test_db().await;
    let map_id = unique_uid("map");
    db.upsert_map(&UserMap {
        id: map_id.clone(),
        name: "Night Market".to_string(),
        created_by: "u1".to_string(),
        members: vec!["u1".to_string(), "u2".to_string()],
        created_at: "2026-03-01T00:00:00.000Z".to_string(),
    })
    .await
    .unwrap();

    let maps = db.list_maps().await.unwrap();
    let map = maps.iter().find(|m| m.id == map_id).unwrap();
    assert!(map.is_member("u2"));
}

#[tokio::test]
async fn test_offline_mock_errors() {
    let db = tracebook::db::FirestoreDb::new_mock();
    assert!(db.list_users().await.is_err());
    assert!(db.get_user("anyone").await.is_err());
}
