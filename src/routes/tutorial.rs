// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Onboarding tour definition.

use crate::services::tutorial::{TutorialStep, STEPS};
use crate::AppState;
use axum::{routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/tutorial", get(get_steps))
}

async fn get_steps() -> Json<&'static [TutorialStep]> {
    Json(&STEPS[..])
}
