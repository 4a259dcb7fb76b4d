// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod caption;
pub mod firebase_auth;
pub mod notifications;
pub mod pending;
pub mod search;
pub mod site_management;
pub mod tutorial;

pub use caption::{CaptionModel, CaptionService, GeminiClient, ImageFetcher};
pub use firebase_auth::{FirebaseTokenVerifier, TokenError, VerifiedIdentity};
pub use notifications::NotificationService;
pub use site_management::{Confirmation, SiteManagementService};
