// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Restaurant and visit models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Letter rating of a visit. Declared best first so that `Ord` ranks
/// `S < A < ... < E`; "better" means "smaller".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub fn is_at_least(self, other: Grade) -> bool {
        self <= other
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "E" => Ok(Self::E),
            other => Err(format!("unknown grade '{other}'")),
        }
    }
}

/// One logged food experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub grade: Grade,
    /// uid of the user who logged the visit
    pub added_by: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Caption generated from the photo, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_description: Option<String>,
    pub date: String,
}

/// Restaurant document (`restaurants/{id}`), pinned to one map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(default)]
    pub id: String,
    pub map_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// Ordered oldest first
    #[serde(default)]
    pub visits: Vec<Visit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

impl Restaurant {
    /// Best grade across all visits.
    pub fn best_grade(&self) -> Option<Grade> {
        self.visits.iter().map(|v| v.grade).min()
    }
}

/// Restaurant tagged with the map it came from, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantWithMap {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub map_name: String,
    pub best_grade: Option<Grade>,
}

impl RestaurantWithMap {
    pub fn new(restaurant: Restaurant, map_name: impl Into<String>) -> Self {
        let best_grade = restaurant.best_grade();
        Self {
            restaurant,
            map_name: map_name.into(),
            best_grade,
        }
    }

    pub fn map_id(&self) -> &str {
        &self.restaurant.map_id
    }
}
