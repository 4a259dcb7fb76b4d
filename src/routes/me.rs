// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in user's profile and post-signup gate status.

use super::request_language;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{LoginProvider, UserProfile};
use crate::services::pending::{PendingView, RESEND_COOLDOWN_SECS};
use crate::AppState;
use axum::{extract::State, http::HeaderMap, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/me/status", get(get_status))
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub profile: UserProfile,
    pub login_provider: LoginProvider,
    /// Localized provider name for the account menu
    pub login_provider_label: String,
    pub pending_view: PendingView,
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>> {
    let mut profile = state
        .db
        .get_user(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.uid)))?;

    // The token is fresher than the profile when the user just verified.
    profile.email_verified |= user.email_verified;

    let language = request_language(&headers);
    let login_provider = LoginProvider::infer(
        user.sign_in_provider
            .as_deref()
            .or(profile.provider.as_deref()),
        &profile.email,
    );
    let pending_view = PendingView::from_flags(profile.email_verified, profile.admin_approved());

    Ok(Json(MeResponse {
        login_provider_label: login_provider.label(language),
        login_provider,
        pending_view,
        profile,
    }))
}

/// Inputs of the waiting screen.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PendingStatus {
    pub view: PendingView,
    pub title: String,
    pub email_verified: bool,
    pub admin_approved: bool,
    pub can_proceed: bool,
    pub offers_resend: bool,
    pub resend_cooldown_secs: u32,
}

/// "Refresh status" on the waiting screen polls this.
///
/// A user without a profile document yet is treated as not approved.
async fn get_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<Json<PendingStatus>> {
    let profile = state.db.get_user(&user.uid).await?;

    let email_verified =
        user.email_verified || profile.as_ref().is_some_and(|p| p.email_verified);
    let admin_approved = profile.as_ref().is_some_and(UserProfile::admin_approved);
    let view = PendingView::from_flags(email_verified, admin_approved);

    Ok(Json(PendingStatus {
        view,
        title: view.title(request_language(&headers)),
        email_verified,
        admin_approved,
        can_proceed: view.can_proceed(),
        offers_resend: view.offers_resend(),
        resend_cooldown_secs: RESEND_COOLDOWN_SECS,
    }))
}
