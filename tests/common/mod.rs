// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use std::sync::Arc;
use tracebook::config::Config;
use tracebook::db::{FirestoreDb, MemoryStore};
use tracebook::error::AppError;
use tracebook::models::{UserProfile, UserRole, UserStatus};
use tracebook::routes::create_router;
use tracebook::services::caption::{ImageFetcher, InlineImage};
use tracebook::services::{CaptionModel, CaptionService, FirebaseTokenVerifier};
use tracebook::AppState;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Caption model answering with a fixed text, or failing when `None`.
#[allow(dead_code)]
pub struct StubCaption(pub Option<String>);

#[async_trait]
impl CaptionModel for StubCaption {
    async fn describe(&self, _image: &InlineImage, _prompt: &str) -> Result<String, AppError> {
        self.0
            .clone()
            .ok_or_else(|| AppError::Upstream("stub model failure".to_string()))
    }
}

/// Router plus handles on its in-memory store and state.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
}

/// Create a test app backed by the in-memory store and a stub caption
/// model that always answers.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_caption(Some("A glossy bowl of tonkotsu ramen."))
}

#[allow(dead_code)]
pub fn create_test_app_with_caption(reply: Option<&str>) -> TestApp {
    let config = Config::test_default();
    let store = Arc::new(MemoryStore::new());
    let auth = FirebaseTokenVerifier::from_config(&config).expect("test verifier");
    let model: Arc<dyn CaptionModel> = Arc::new(StubCaption(reply.map(str::to_string)));
    let fetcher = ImageFetcher::new(&config.caption_image_origins).expect("image fetcher");
    let captions = CaptionService::new(Some(model)).with_image_fetcher(fetcher);

    let state = Arc::new(AppState::new(config, store.clone(), auth, captions));

    TestApp {
        router: create_router(state.clone()),
        store,
        state,
    }
}

/// HS256 ID token for `uid` accepted by the test verifier.
#[allow(dead_code)]
pub fn id_token(uid: &str, email_verified: bool) -> String {
    let config = Config::test_default();
    let secret = config.test_token_secret.expect("test secret");
    let now = chrono::Utc::now().timestamp();

    let claims = json!({
        "iss": format!("https://securetoken.google.com/{}", config.gcp_project_id),
        "aud": config.gcp_project_id,
        "sub": uid,
        "iat": now,
        "exp": now + 3600,
        "email": format!("{uid}@example.com"),
        "email_verified": email_verified,
        "firebase": { "sign_in_provider": "password" }
    });

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(&secret),
    )
    .unwrap()
}

/// Stored profile fixture.
#[allow(dead_code)]
pub fn profile(uid: &str, email_verified: bool, status: UserStatus, role: UserRole) -> UserProfile {
    UserProfile {
        id: uid.to_string(),
        email: format!("{uid}@example.com"),
        display_name: Some(format!("User {uid}")),
        photo_url: None,
        email_verified,
        status,
        role,
        provider: None,
        created_at: "2026-03-01T12:00:00.000Z".to_string(),
        approved_by: None,
        approved_at: None,
    }
}

/// Insert an approved, verified admin and return its uid.
#[allow(dead_code)]
pub fn seed_admin(store: &MemoryStore) -> String {
    let uid = "admin-1".to_string();
    store.insert_user(profile(&uid, true, UserStatus::Approved, UserRole::Admin));
    uid
}

/// Authenticated request with an optional JSON body.
#[allow(dead_code)]
pub fn authed_request(method: &str, uri: &str, uid: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", id_token(uid, true)));

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
