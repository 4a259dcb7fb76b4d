// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin console tests: approval workflow, confirmation gates and stats.

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use tracebook::db::DocumentStore;
use tracebook::models::{
    Grade, NotificationType, Restaurant, UserMap, UserRole, UserStatus, Visit,
};

mod common;
use common::{authed_request, body_json, create_test_app, profile, seed_admin};

#[tokio::test]
async fn test_approve_sets_status_and_sends_one_notification() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/new-1/approve",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "approved");

    let stored = app.store.get_user("new-1").await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Approved);
    assert!(stored.approved_by.is_none());

    let notifications = app.store.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].recipient_uid, "new-1");
    assert_eq!(notifications[0].kind, NotificationType::AccountApproved);
    assert!(!notifications[0].read);
}

#[tokio::test]
async fn test_reapprove_duplicates_notification() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));

    for _ in 0..2 {
        let response = app
            .router
            .clone()
            .oneshot(authed_request(
                "POST",
                "/api/admin/users/new-1/approve",
                &admin,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.store.all_notifications().len(), 2);
}

#[tokio::test]
async fn test_approve_uses_request_language() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));

    let mut request = authed_request("POST", "/api/admin/users/new-1/approve", &admin, None);
    request
        .headers_mut()
        .insert(header::ACCEPT_LANGUAGE, "zh-TW".parse().unwrap());

    let response = app.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let notifications = app.store.all_notifications();
    assert!(notifications[0].message.contains("TraceBook"));
    assert!(notifications[0].message.starts_with("您的帳號"));
}

#[tokio::test]
async fn test_manual_approve_records_admin() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("unverified", false, UserStatus::Pending, UserRole::User));

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/unverified/manual-approve",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["approvedBy"], admin.as_str());
    assert!(body["approvedAt"].is_string());

    let stored = app.store.get_user("unverified").await.unwrap().unwrap();
    assert!(stored.manually_approved());
    assert!(stored.is_active());
    assert!(!stored.email_verified);
    assert_eq!(app.store.all_notifications().len(), 1);
}

#[tokio::test]
async fn test_reject_without_confirmation_changes_nothing() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/new-1/reject",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/new-1/reject",
            &admin,
            Some(json!({ "confirm": false })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "confirmation_required");

    let stored = app.store.get_user("new-1").await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Pending);
    assert!(app.store.all_notifications().is_empty());
}

#[tokio::test]
async fn test_reject_with_confirmation() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/new-1/reject",
            &admin,
            Some(json!({ "confirm": true })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.store.get_user("new-1").await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Rejected);

    let notifications = app.store.all_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationType::AccountRejected);
}

#[tokio::test]
async fn test_delete_admin_is_forbidden_even_when_confirmed() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("admin-2", true, UserStatus::Approved, UserRole::Admin));

    let response = app
        .router
        .oneshot(authed_request(
            "DELETE",
            "/api/admin/users/admin-2?confirm=true",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.store.get_user("admin-2").await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_requires_confirmation() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("u1", true, UserStatus::Approved, UserRole::User));

    let response = app
        .router
        .clone()
        .oneshot(authed_request("DELETE", "/api/admin/users/u1", &admin, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);
    assert!(app.store.get_user("u1").await.unwrap().is_some());

    let response = app
        .router
        .oneshot(authed_request(
            "DELETE",
            "/api/admin/users/u1?confirm=true",
            &admin,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.store.get_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_approve_unknown_user_is_not_found() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/nobody/approve",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(app.store.all_notifications().is_empty());
}

#[tokio::test]
async fn test_failed_notification_keeps_status_change() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("new-1", true, UserStatus::Pending, UserRole::User));
    app.store.set_fail_notification_writes(true);

    let response = app
        .router
        .oneshot(authed_request(
            "POST",
            "/api/admin/users/new-1/approve",
            &admin,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let stored = app.store.get_user("new-1").await.unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::Approved);
    assert!(app.store.all_notifications().is_empty());
}

#[tokio::test]
async fn test_list_users_partitions_buckets() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("unverified", false, UserStatus::Approved, UserRole::User));
    app.store
        .insert_user(profile("waiting", true, UserStatus::Pending, UserRole::User));
    app.store
        .insert_user(profile("rejected", true, UserStatus::Rejected, UserRole::User));

    let response = app
        .router
        .oneshot(authed_request("GET", "/api/admin/users", &admin, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let ids = |bucket: &str| {
        let mut ids: Vec<String> = body[bucket]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    };

    assert_eq!(ids("pending"), vec!["rejected", "unverified", "waiting"]);
    assert_eq!(ids("approved"), vec!["admin-1"]);
}

#[tokio::test]
async fn test_users_stats() {
    let app = create_test_app();
    let admin = seed_admin(&app.store);
    app.store
        .insert_user(profile("u1", true, UserStatus::Approved, UserRole::User));

    app.store.insert_map(UserMap {
        id: "m1".to_string(),
        name: "Lunch".to_string(),
        created_by: "u1".to_string(),
        members: vec!["u1".to_string(), admin.clone()],
        created_at: "2026-02-01T00:00:00Z".to_string(),
    });
    app.store.insert_restaurant(Restaurant {
        id: "r1".to_string(),
        map_id: "m1".to_string(),
        name: "Noodle Bar".to_string(),
        address: "1 Main St".to_string(),
        lat: None,
        lng: None,
        visits: vec![
            Visit {
                id: "v1".to_string(),
                grade: Grade::A,
                added_by: "u1".to_string(),
                comment: String::new(),
                photo_url: None,
                ai_description: None,
                date: "2026-02-02".to_string(),
            },
            Visit {
                id: "v2".to_string(),
                grade: Grade::B,
                added_by: admin.clone(),
                comment: String::new(),
                photo_url: None,
                ai_description: None,
                date: "2026-02-03".to_string(),
            },
        ],
        created_by: Some("u1".to_string()),
    });

    let response = app
        .router
        .oneshot(authed_request("GET", "/api/admin/users/stats", &admin, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body.as_array().unwrap();
    let row = |uid: &str| {
        rows.iter()
            .find(|r| r["user"]["id"] == uid)
            .cloned()
            .unwrap()
    };

    let u1 = row("u1");
    assert_eq!(u1["mapsCreated"], 1);
    assert_eq!(u1["mapsJoined"], 0);
    assert_eq!(u1["restaurantsAdded"], 1);
    assert_eq!(u1["visitsAdded"], 1);

    let admin_row = row(admin.as_str());
    assert_eq!(admin_row["mapsCreated"], 0);
    assert_eq!(admin_row["mapsJoined"], 1);
    assert_eq!(admin_row["visitsAdded"], 1);
}
