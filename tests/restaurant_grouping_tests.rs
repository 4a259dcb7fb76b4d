// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header bar search API tests.

use axum::http::StatusCode;
use tower::ServiceExt;
use tracebook::db::MemoryStore;
use tracebook::models::{Grade, Restaurant, UserMap, Visit};

mod common;
use common::{authed_request, body_json, create_test_app};

fn map(id: &str, name: &str, members: &[&str]) -> UserMap {
    UserMap {
        id: id.to_string(),
        name: name.to_string(),
        created_by: members[0].to_string(),
        members: members.iter().map(|m| m.to_string()).collect(),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

fn restaurant(id: &str, map_id: &str, name: &str, grades: &[Grade]) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        map_id: map_id.to_string(),
        name: name.to_string(),
        address: format!("{id} Market Street"),
        lat: Some(25.03),
        lng: Some(121.56),
        visits: grades
            .iter()
            .enumerate()
            .map(|(i, grade)| Visit {
                id: format!("{id}-v{i}"),
                grade: *grade,
                added_by: "u1".to_string(),
                comment: String::new(),
                photo_url: None,
                ai_description: None,
                date: "2026-01-02".to_string(),
            })
            .collect(),
        created_by: Some("u1".to_string()),
    }
}

fn seed(store: &MemoryStore) {
    store.insert_map(map("m-work", "Work", &["u1", "u2"]));
    store.insert_map(map("m-home", "Home", &["u1"]));
    store.insert_map(map("m-secret", "Secret", &["u2"]));

    store.insert_restaurant(restaurant("r1", "m-work", "ramen ya", &[Grade::B]));
    store.insert_restaurant(restaurant("r2", "m-work", "Dumpling King", &[Grade::S, Grade::C]));
    store.insert_restaurant(restaurant("r3", "m-home", "Beef Noodles", &[]));
    store.insert_restaurant(restaurant("r4", "m-secret", "Hidden Gem", &[Grade::S]));
}

fn layout(body: &serde_json::Value) -> Vec<(String, Vec<String>)> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|g| {
            (
                g["mapId"].as_str().unwrap().to_string(),
                g["restaurants"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|r| r["id"].as_str().unwrap().to_string())
                    .collect(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_groups_only_member_maps_active_first() {
    let app = create_test_app();
    seed(&app.store);

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            "/api/restaurants/grouped?activeMap=m-work",
            "u1",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(
        layout(&body),
        vec![
            (
                "m-work".to_string(),
                vec!["r2".to_string(), "r1".to_string()]
            ),
            ("m-home".to_string(), vec!["r3".to_string()]),
        ]
    );
    assert_eq!(body[0]["isActive"], true);
    assert_eq!(body[0]["mapName"], "Work");
    assert_eq!(body[0]["restaurants"][0]["mapName"], "Work");
    assert_eq!(body[0]["restaurants"][0]["bestGrade"], "S");
}

#[tokio::test]
async fn test_filters_by_grade_and_query() {
    let app = create_test_app();
    seed(&app.store);

    let response = app
        .router
        .clone()
        .oneshot(authed_request(
            "GET",
            "/api/restaurants/grouped?minGrade=a",
            "u1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        layout(&body),
        vec![("m-work".to_string(), vec!["r2".to_string()])]
    );

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            "/api/restaurants/grouped?q=NOODLE",
            "u1",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        layout(&body),
        vec![("m-home".to_string(), vec!["r3".to_string()])]
    );
}

#[tokio::test]
async fn test_invalid_grade_is_bad_request() {
    let app = create_test_app();
    seed(&app.store);

    let response = app
        .router
        .oneshot(authed_request(
            "GET",
            "/api/restaurants/grouped?minGrade=Z",
            "u1",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
