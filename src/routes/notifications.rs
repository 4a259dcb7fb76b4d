// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Notification panel routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::AppNotification;
use crate::services::NotificationService;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/read-all", post(mark_all_read))
        .route("/api/notifications/{id}/read", post(mark_read))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub notifications: Vec<AppNotification>,
    pub unread_count: usize,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MarkReadResponse {
    pub updated: usize,
}

async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<NotificationsResponse>> {
    let notifications = state.notifications.list_for(&user.uid).await?;
    let unread_count = NotificationService::unread_count(&notifications);

    Ok(Json(NotificationsResponse {
        notifications,
        unread_count,
    }))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MarkReadResponse>> {
    let updated = state.notifications.mark_read(&user.uid, &id).await?;
    Ok(Json(MarkReadResponse { updated }))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MarkReadResponse>> {
    let updated = state.notifications.mark_all_read(&user.uid).await?;
    tracing::debug!(uid = %user.uid, updated, "Marked notifications read");
    Ok(Json(MarkReadResponse { updated }))
}
