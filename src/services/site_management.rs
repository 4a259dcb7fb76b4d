// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin console operations: user approval workflow and usage stats.
//!
//! Profile writes and notification writes are independent. If the
//! notification fails after the profile was updated, the error is logged
//! and returned; the profile change stays.

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::i18n::{t, Language};
use crate::models::{
    NewNotification, NotificationType, StatusUpdate, UserProfile, UserStatus,
};
use crate::time_utils::now_rfc3339;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Explicit answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Cancelled
        }
    }
}

/// Users split into the two lists the admin console shows.
#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserBuckets {
    pub pending: Vec<UserProfile>,
    pub approved: Vec<UserProfile>,
}

impl UserBuckets {
    /// Partition users. Each list is ordered newest first.
    pub fn partition(mut users: Vec<UserProfile>) -> Self {
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let (pending, approved) = users.into_iter().partition(UserProfile::is_pending);
        Self { pending, approved }
    }
}

/// Per-user activity counts for the stats view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserUsage {
    pub user: UserProfile,
    pub maps_created: u32,
    /// Maps the user belongs to without having created them
    pub maps_joined: u32,
    pub restaurants_added: u32,
    pub visits_added: u32,
}

#[derive(Default)]
struct UsageCounts {
    maps_created: u32,
    maps_joined: u32,
    restaurants_added: u32,
    visits_added: u32,
}

/// Admin approval workflow over the document store.
#[derive(Clone)]
pub struct SiteManagementService {
    db: Arc<dyn DocumentStore>,
}

impl SiteManagementService {
    pub fn new(db: Arc<dyn DocumentStore>) -> Self {
        Self { db }
    }

    /// List every user, partitioned into pending and approved.
    pub async fn list_users(&self) -> Result<UserBuckets> {
        let users = self.db.list_users().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch users");
            e
        })?;
        Ok(UserBuckets::partition(users))
    }

    /// Approve a user and send them a welcome notification.
    ///
    /// Calling this twice sends two notifications.
    pub async fn approve(&self, uid: &str, language: Language) -> Result<UserProfile> {
        self.require_user(uid).await?;

        let user = self
            .db
            .update_user_status(uid, &StatusUpdate::status(UserStatus::Approved))
            .await?;
        tracing::info!(uid, "User approved");

        self.notify(
            uid,
            NotificationType::AccountApproved,
            t(language, "notification.approved"),
        )
        .await?;

        Ok(user)
    }

    /// Approve a user without waiting for email verification, recording
    /// which admin did it.
    pub async fn manual_approve(
        &self,
        uid: &str,
        admin_uid: &str,
        language: Language,
    ) -> Result<UserProfile> {
        self.require_user(uid).await?;

        let update = StatusUpdate {
            status: UserStatus::Approved,
            approved_by: Some(admin_uid.to_string()),
            approved_at: Some(now_rfc3339()),
        };
        let user = self.db.update_user_status(uid, &update).await?;
        tracing::info!(uid, admin_uid, "User manually approved");

        self.notify(
            uid,
            NotificationType::AccountApproved,
            t(language, "notification.manualApproved"),
        )
        .await?;

        Ok(user)
    }

    /// Mark a user rejected. Nothing is written unless confirmed.
    pub async fn reject(
        &self,
        uid: &str,
        confirmation: Confirmation,
        language: Language,
    ) -> Result<UserProfile> {
        if confirmation != Confirmation::Confirmed {
            return Err(AppError::ConfirmationRequired(format!(
                "rejecting user {uid} must be confirmed"
            )));
        }

        self.require_user(uid).await?;

        let user = self
            .db
            .update_user_status(uid, &StatusUpdate::status(UserStatus::Rejected))
            .await?;
        tracing::info!(uid, "User rejected");

        self.notify(
            uid,
            NotificationType::AccountRejected,
            t(language, "notification.rejected"),
        )
        .await?;

        Ok(user)
    }

    /// Delete a user document. Admin accounts can never be deleted here.
    pub async fn delete(&self, uid: &str, confirmation: Confirmation) -> Result<()> {
        let user = self.require_user(uid).await?;

        if user.is_admin() {
            tracing::warn!(uid, "Refusing to delete admin account");
            return Err(AppError::Forbidden(
                "admin accounts cannot be deleted".to_string(),
            ));
        }

        if confirmation != Confirmation::Confirmed {
            return Err(AppError::ConfirmationRequired(format!(
                "deleting user {uid} must be confirmed"
            )));
        }

        self.db.delete_user(uid).await?;
        tracing::info!(uid, "User deleted");
        Ok(())
    }

    /// Every user with usage counts aggregated from maps and restaurants.
    pub async fn list_users_with_stats(&self) -> Result<Vec<UserUsage>> {
        let (users, maps, restaurants) = tokio::try_join!(
            self.db.list_users(),
            self.db.list_maps(),
            self.db.list_restaurants(),
        )?;

        let mut counts: HashMap<&str, UsageCounts> = HashMap::new();

        for map in &maps {
            counts.entry(map.created_by.as_str()).or_default().maps_created += 1;
            for member in &map.members {
                if *member != map.created_by {
                    counts.entry(member.as_str()).or_default().maps_joined += 1;
                }
            }
        }

        for restaurant in &restaurants {
            if let Some(creator) = &restaurant.created_by {
                counts.entry(creator.as_str()).or_default().restaurants_added += 1;
            }
            for visit in &restaurant.visits {
                counts.entry(visit.added_by.as_str()).or_default().visits_added += 1;
            }
        }

        let mut usage: Vec<UserUsage> = users
            .iter()
            .map(|user| {
                let c = counts.get(user.id.as_str());
                UserUsage {
                    user: user.clone(),
                    maps_created: c.map_or(0, |c| c.maps_created),
                    maps_joined: c.map_or(0, |c| c.maps_joined),
                    restaurants_added: c.map_or(0, |c| c.restaurants_added),
                    visits_added: c.map_or(0, |c| c.visits_added),
                }
            })
            .collect();

        usage.sort_by(|a, b| {
            b.user
                .created_at
                .cmp(&a.user.created_at)
                .then_with(|| a.user.id.cmp(&b.user.id))
        });

        Ok(usage)
    }

    async fn require_user(&self, uid: &str) -> Result<UserProfile> {
        self.db
            .get_user(uid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {uid} not found")))
    }

    async fn notify(&self, uid: &str, kind: NotificationType, message: String) -> Result<()> {
        self.db
            .add_notification(NewNotification::new(uid, kind, message))
            .await
            .map_err(|e| {
                tracing::error!(uid, error = %e, "Status updated but notification write failed");
                e
            })?;
        Ok(())
    }
}
