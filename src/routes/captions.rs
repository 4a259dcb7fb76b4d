// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI caption for a food photo.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    routing::post,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Photos arrive inline as data URLs; allow well above axum's 2 MB default.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/captions", post(create_caption))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    /// Data URL, http(s) URL or raw base64
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
    #[validate(length(min = 1, max = 200))]
    pub restaurant_name: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CaptionResponse {
    pub description: String,
}

/// Always answers 200 once the request is well-formed; model failures
/// yield the fallback description.
async fn create_caption(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CaptionRequest>,
) -> Result<Json<CaptionResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(uid = %user.uid, restaurant = %req.restaurant_name, "Generating caption");

    let description = state
        .captions
        .generate_food_description(&req.image, &req.comment, &req.restaurant_name)
        .await;

    Ok(Json(CaptionResponse { description }))
}
