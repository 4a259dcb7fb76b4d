// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Header bar search over the caller's maps.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Grade, UserMap};
use crate::services::search::{self, MapGroup, RestaurantFilter};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/restaurants/grouped", get(grouped_restaurants))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupedQuery {
    /// Map currently shown; its group is listed first
    active_map: Option<String>,
    q: Option<String>,
    min_grade: Option<String>,
}

async fn grouped_restaurants(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<GroupedQuery>,
) -> Result<Json<Vec<MapGroup>>> {
    let min_grade = params
        .min_grade
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(str::parse::<Grade>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let (maps, restaurants) =
        tokio::try_join!(state.db.list_maps(), state.db.list_restaurants())?;

    let maps: Vec<UserMap> = maps
        .into_iter()
        .filter(|m| m.is_member(&user.uid))
        .collect();

    let filter = RestaurantFilter {
        query: params.q,
        min_grade,
    };

    let groups = search::search(
        search::enrich(restaurants, &maps),
        &filter,
        params.active_map.as_deref(),
    );

    tracing::debug!(
        uid = %user.uid,
        maps = maps.len(),
        groups = groups.len(),
        "Grouped restaurants"
    );

    Ok(Json(groups))
}
