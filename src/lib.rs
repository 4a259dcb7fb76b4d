// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! TraceBook: a shared restaurant journal
//!
//! This crate provides the backend API for the TraceBook web client:
//! account approval, notifications, restaurant search and AI-written
//! captions for food photos.

pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{CaptionService, FirebaseTokenVerifier, NotificationService, SiteManagementService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn DocumentStore>,
    pub auth: FirebaseTokenVerifier,
    pub site_management: SiteManagementService,
    pub notifications: NotificationService,
    pub captions: CaptionService,
}

impl AppState {
    /// Wire services around one store.
    pub fn new(
        config: Config,
        db: Arc<dyn DocumentStore>,
        auth: FirebaseTokenVerifier,
        captions: CaptionService,
    ) -> Self {
        Self {
            site_management: SiteManagementService::new(db.clone()),
            notifications: NotificationService::new(db.clone()),
            config,
            db,
            auth,
            captions,
        }
    }
}
