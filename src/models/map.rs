// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared map model.

use serde::{Deserialize, Serialize};

/// Map document (`maps/{id}`): a named, shared collection of restaurants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMap {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub created_by: String,
    /// Member uids, creator included
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub created_at: String,
}

impl UserMap {
    pub fn is_member(&self, uid: &str) -> bool {
        self.created_by == uid || self.members.iter().any(|m| m == uid)
    }
}
