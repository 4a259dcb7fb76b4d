// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod map;
pub mod notification;
pub mod restaurant;
pub mod user;

pub use map::UserMap;
pub use notification::{AppNotification, NewNotification, NotificationType};
pub use restaurant::{Grade, Restaurant, RestaurantWithMap, Visit};
pub use user::{LoginProvider, StatusUpdate, UserProfile, UserRole, UserStatus};
