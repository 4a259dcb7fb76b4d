// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document store.

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::models::{
    AppNotification, NewNotification, Restaurant, StatusUpdate, UserMap, UserProfile,
};
use crate::time_utils::now_rfc3339;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory [`DocumentStore`], one map per collection keyed by document id.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, UserProfile>,
    notifications: DashMap<String, AppNotification>,
    maps: DashMap<String, UserMap>,
    restaurants: DashMap<String, Restaurant>,
    fail_notification_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: UserProfile) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_map(&self, map: UserMap) {
        self.maps.insert(map.id.clone(), map);
    }

    pub fn insert_restaurant(&self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id.clone(), restaurant);
    }

    pub fn insert_notification(&self, notification: AppNotification) {
        self.notifications
            .insert(notification.id.clone(), notification);
    }

    /// Every stored notification regardless of recipient.
    pub fn all_notifications(&self) -> Vec<AppNotification> {
        self.notifications.iter().map(|e| e.value().clone()).collect()
    }

    /// Make `add_notification` fail, to exercise partial-failure paths.
    pub fn set_fail_notification_writes(&self, fail: bool) {
        self.fail_notification_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }

    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.get(uid).map(|e| e.value().clone()))
    }

    async fn update_user_status(
        &self,
        uid: &str,
        update: &StatusUpdate,
    ) -> Result<UserProfile, AppError> {
        let mut entry = self
            .users
            .get_mut(uid)
            .ok_or_else(|| AppError::Database(format!("No document to update: users/{uid}")))?;
        update.apply_to(entry.value_mut());
        Ok(entry.value().clone())
    }

    async fn delete_user(&self, uid: &str) -> Result<(), AppError> {
        self.users.remove(uid);
        Ok(())
    }

    async fn add_notification(
        &self,
        notification: NewNotification,
    ) -> Result<AppNotification, AppError> {
        if self.fail_notification_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database(
                "notification write rejected".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let stored = notification.into_stored(id, now_rfc3339());
        self.notifications.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_notification(&self, id: &str) -> Result<Option<AppNotification>, AppError> {
        Ok(self.notifications.get(id).map(|e| e.value().clone()))
    }

    async fn list_notifications(
        &self,
        recipient_uid: &str,
    ) -> Result<Vec<AppNotification>, AppError> {
        Ok(self
            .notifications
            .iter()
            .filter(|e| e.value().recipient_uid == recipient_uid)
            .map(|e| e.value().clone())
            .collect())
    }

    async fn mark_notifications_read(&self, ids: &[String]) -> Result<(), AppError> {
        for id in ids {
            if let Some(mut entry) = self.notifications.get_mut(id) {
                entry.read = true;
            }
        }
        Ok(())
    }

    async fn list_maps(&self) -> Result<Vec<UserMap>, AppError> {
        Ok(self.maps.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppError> {
        Ok(self.restaurants.iter().map(|e| e.value().clone()).collect())
    }
}
