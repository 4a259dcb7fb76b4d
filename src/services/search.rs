// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Restaurant search projection for the header bar.
//!
//! Everything here is pure and recomputed per request.

use crate::models::{Grade, Restaurant, RestaurantWithMap, UserMap};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Restaurants of one map, as listed in the search dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MapGroup {
    pub map_id: String,
    pub map_name: String,
    pub is_active: bool,
    pub restaurants: Vec<RestaurantWithMap>,
}

/// Search box text and grade filter.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub query: Option<String>,
    pub min_grade: Option<Grade>,
}

impl RestaurantFilter {
    pub fn matches(&self, restaurant: &RestaurantWithMap) -> bool {
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let r = &restaurant.restaurant;
            if !r.name.to_lowercase().contains(&query)
                && !r.address.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        if let Some(min) = self.min_grade {
            match restaurant.best_grade {
                Some(best) if best.is_at_least(min) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Tag restaurants with their map's name. Restaurants on unknown maps are
/// dropped.
pub fn enrich(restaurants: Vec<Restaurant>, maps: &[UserMap]) -> Vec<RestaurantWithMap> {
    let names: HashMap<&str, &str> = maps
        .iter()
        .map(|m| (m.id.as_str(), m.name.as_str()))
        .collect();

    restaurants
        .into_iter()
        .filter_map(|r| {
            let name = names.get(r.map_id.as_str())?.to_string();
            Some(RestaurantWithMap::new(r, name))
        })
        .collect()
}

fn by_name(a: &RestaurantWithMap, b: &RestaurantWithMap) -> Ordering {
    a.restaurant
        .name
        .to_lowercase()
        .cmp(&b.restaurant.name.to_lowercase())
        .then_with(|| a.restaurant.name.cmp(&b.restaurant.name))
        .then_with(|| a.restaurant.id.cmp(&b.restaurant.id))
}

/// Group restaurants by map.
///
/// Output does not depend on input order: restaurants are sorted by name
/// within a group, the active map's group comes first and the rest follow
/// by map name.
pub fn group_by_map(
    restaurants: Vec<RestaurantWithMap>,
    active_map_id: Option<&str>,
) -> Vec<MapGroup> {
    let mut groups: HashMap<String, MapGroup> = HashMap::new();

    for restaurant in restaurants {
        let map_id = restaurant.map_id().to_string();
        let group = groups.entry(map_id.clone()).or_insert_with(|| MapGroup {
            is_active: active_map_id == Some(map_id.as_str()),
            map_id,
            map_name: restaurant.map_name.clone(),
            restaurants: Vec::new(),
        });
        group.restaurants.push(restaurant);
    }

    let mut groups: Vec<MapGroup> = groups.into_values().collect();
    for group in &mut groups {
        group.restaurants.sort_by(by_name);
    }

    groups.sort_by(|a, b| {
        b.is_active
            .cmp(&a.is_active)
            .then_with(|| a.map_name.to_lowercase().cmp(&b.map_name.to_lowercase()))
            .then_with(|| a.map_id.cmp(&b.map_id))
    });

    groups
}

/// Filter then group; the full header bar projection.
pub fn search(
    restaurants: Vec<RestaurantWithMap>,
    filter: &RestaurantFilter,
    active_map_id: Option<&str>,
) -> Vec<MapGroup> {
    let matching = restaurants
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect();
    group_by_map(matching, active_map_id)
}
