// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase ID token authentication middleware.

use crate::error::AppError;
use crate::services::firebase_auth::{TokenError, VerifiedIdentity};
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie the web client may use instead of an Authorization header.
pub const TOKEN_COOKIE: &str = "tracebook_token";

/// Authenticated user extracted from the ID token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    /// `email_verified` claim at token issue time
    pub email_verified: bool,
    pub sign_in_provider: Option<String>,
}

impl From<VerifiedIdentity> for AuthUser {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            uid: identity.uid,
            email: identity.email,
            email_verified: identity.email_verified,
            sign_in_provider: identity.sign_in_provider,
        }
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

/// Middleware that requires a valid Firebase ID token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Header first, then cookie
    let token = bearer_token(&request)
        .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
        .ok_or(AppError::Unauthorized)?;

    let identity = state.auth.verify(&token).await.map_err(|e| match e {
        TokenError::Invalid(reason) => {
            tracing::debug!(reason = %reason, "Rejected ID token");
            AppError::InvalidToken
        }
        TokenError::Transient(reason) => AppError::Upstream(reason),
    })?;

    request.extensions_mut().insert(AuthUser::from(identity));

    Ok(next.run(request).await)
}

/// Middleware for admin-only routes. Must run after [`require_auth`].
///
/// The role is read from the stored profile on every request, so a demoted
/// admin loses access immediately.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let is_admin = state
        .db
        .get_user(&user.uid)
        .await?
        .is_some_and(|profile| profile.is_admin());

    if !is_admin {
        tracing::warn!(uid = %user.uid, "Non-admin attempted admin route");
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }

    Ok(next.run(request).await)
}
