// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin console routes (site management).
//!
//! `require_admin` is applied in routes/mod.rs.

use super::request_language;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserProfile;
use crate::services::site_management::{Confirmation, UserBuckets, UserUsage};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/stats", get(list_users_with_stats))
        .route("/api/admin/users/{uid}/approve", post(approve_user))
        .route("/api/admin/users/{uid}/manual-approve", post(manual_approve_user))
        .route("/api/admin/users/{uid}/reject", post(reject_user))
        .route("/api/admin/users/{uid}", delete(delete_user))
}

/// Answer to the confirmation prompt. Missing means not confirmed.
#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteUserResponse {
    pub success: bool,
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<UserBuckets>> {
    Ok(Json(state.site_management.list_users().await?))
}

async fn list_users_with_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserUsage>>> {
    Ok(Json(state.site_management.list_users_with_stats().await?))
}

async fn approve_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>> {
    let user = state
        .site_management
        .approve(&uid, request_language(&headers))
        .await?;
    Ok(Json(user))
}

async fn manual_approve_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(uid): Path<String>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>> {
    let user = state
        .site_management
        .manual_approve(&uid, &admin.uid, request_language(&headers))
        .await?;
    Ok(Json(user))
}

async fn reject_user(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
    headers: HeaderMap,
    body: Option<Json<ConfirmParams>>,
) -> Result<Json<UserProfile>> {
    let confirmed = body.is_some_and(|Json(params)| params.confirm);
    let user = state
        .site_management
        .reject(&uid, Confirmation::from(confirmed), request_language(&headers))
        .await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<AuthUser>,
    Path(uid): Path<String>,
    Query(params): Query<ConfirmParams>,
) -> Result<Json<DeleteUserResponse>> {
    tracing::info!(admin_uid = %admin.uid, uid = %uid, "Admin-initiated user deletion");

    state
        .site_management
        .delete(&uid, Confirmation::from(params.confirm))
        .await?;

    Ok(Json(DeleteUserResponse { success: true }))
}
