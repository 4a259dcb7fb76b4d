//! Database layer (document store).
//!
//! Components talk to the hosted store through [`DocumentStore`]. The
//! Firestore binding is used in production; [`MemoryStore`] backs local
//! development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::AppError;
use crate::models::{
    AppNotification, NewNotification, Restaurant, StatusUpdate, UserMap, UserProfile,
};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const MAPS: &str = "maps";
    pub const RESTAURANTS: &str = "restaurants";
}

/// Document store operations used by the service.
///
/// No operation is transactional with any other; callers sequence writes
/// themselves and live with partial failure.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    /// Read every user profile.
    async fn list_users(&self) -> Result<Vec<UserProfile>, AppError>;

    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Write only the approval fields named by `update`; returns the profile
    /// as stored afterwards.
    async fn update_user_status(
        &self,
        uid: &str,
        update: &StatusUpdate,
    ) -> Result<UserProfile, AppError>;

    async fn delete_user(&self, uid: &str) -> Result<(), AppError>;

    // ─── Notifications ───────────────────────────────────────────

    /// Create a notification. The store assigns its id and timestamp.
    async fn add_notification(
        &self,
        notification: NewNotification,
    ) -> Result<AppNotification, AppError>;

    async fn get_notification(&self, id: &str) -> Result<Option<AppNotification>, AppError>;

    /// All notifications addressed to `recipient_uid`, in no particular order.
    async fn list_notifications(
        &self,
        recipient_uid: &str,
    ) -> Result<Vec<AppNotification>, AppError>;

    /// Flip `read` to true on each listed notification.
    async fn mark_notifications_read(&self, ids: &[String]) -> Result<(), AppError>;

    // ─── Maps & Restaurants (read-only here) ─────────────────────

    async fn list_maps(&self) -> Result<Vec<UserMap>, AppError>;

    async fn list_restaurants(&self) -> Result<Vec<Restaurant>, AppError>;
}
