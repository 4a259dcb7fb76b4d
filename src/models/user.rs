// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User profile model for storage and API.

use crate::i18n::{t, Language};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Approval state of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// User profile stored in Firestore (`users/{uid}`).
///
/// Created by the signup backend. This service only changes the approval
/// fields or deletes the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Firebase Auth uid (also used as document ID)
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub role: UserRole,
    /// Firebase sign-in provider id (`google.com`, `password`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// When the account was created (ISO 8601)
    pub created_at: String,
    /// Admin uid that approved the account through the manual override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Status has been set to approved by an admin (either approval path).
    pub fn admin_approved(&self) -> bool {
        self.status == UserStatus::Approved
    }

    /// Approved through the override that bypasses email verification.
    pub fn manually_approved(&self) -> bool {
        self.admin_approved() && self.approved_by.is_some()
    }

    /// Whether the account may use the app.
    pub fn is_active(&self) -> bool {
        self.admin_approved() && (self.email_verified || self.manually_approved())
    }

    /// Admin console "pending" bucket: unverified OR not approved.
    ///
    /// Rejected accounts land here too.
    pub fn is_pending(&self) -> bool {
        !self.email_verified || self.status != UserStatus::Approved
    }

    pub fn login_provider(&self) -> LoginProvider {
        LoginProvider::infer(self.provider.as_deref(), &self.email)
    }
}

/// Fields written by an approval/rejection. Only `Some` fields are written
/// besides `status`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub status: UserStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<String>,
}

impl StatusUpdate {
    pub fn status(status: UserStatus) -> Self {
        Self {
            status,
            approved_by: None,
            approved_at: None,
        }
    }

    /// Firestore field paths this update touches.
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut fields = vec!["status"];
        if self.approved_by.is_some() {
            fields.push("approvedBy");
        }
        if self.approved_at.is_some() {
            fields.push("approvedAt");
        }
        fields
    }

    /// Apply this update to an in-memory profile.
    pub fn apply_to(&self, user: &mut UserProfile) {
        user.status = self.status;
        if let Some(by) = &self.approved_by {
            user.approved_by = Some(by.clone());
        }
        if let Some(at) = &self.approved_at {
            user.approved_at = Some(at.clone());
        }
    }
}

/// How the user signed in, for display in the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum LoginProvider {
    Google,
    Apple,
    Email,
}

const GOOGLE_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const APPLE_DOMAINS: &[&str] = &["icloud.com", "me.com", "mac.com", "privaterelay.appleid.com"];

impl LoginProvider {
    /// Infer the provider. A recorded provider id wins; older profiles
    /// without one fall back to guessing from the email domain.
    pub fn infer(provider: Option<&str>, email: &str) -> Self {
        match provider {
            Some("google.com") => return Self::Google,
            Some("apple.com") => return Self::Apple,
            Some("password") => return Self::Email,
            _ => {}
        }

        let domain = email
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if GOOGLE_DOMAINS.contains(&domain.as_str()) {
            Self::Google
        } else if APPLE_DOMAINS.contains(&domain.as_str()) {
            Self::Apple
        } else {
            Self::Email
        }
    }

    pub fn label(self, language: Language) -> String {
        let key = match self {
            Self::Google => "provider.google",
            Self::Apple => "provider.apple",
            Self::Email => "provider.email",
        };
        t(language, key)
    }
}

#[cfg(test)]
pub(crate) fn test_profile(id: &str, email_verified: bool, status: UserStatus) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        display_name: None,
        photo_url: None,
        email_verified,
        status,
        role: UserRole::User,
        provider: None,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        approved_by: None,
        approved_at: None,
    }
}
