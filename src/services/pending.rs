// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post-signup gate: which waiting screen to show, and the resend cooldown.

use crate::i18n::{t, Language};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Seconds the resend-verification control stays disabled after use.
pub const RESEND_COOLDOWN_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum PendingView {
    /// Verified and approved; no gate.
    Active,
    /// Approved by an admin before verifying; may proceed.
    ManuallyApproved,
    /// Verified, waiting on an admin.
    AwaitingApproval,
    AwaitingVerification,
}

impl PendingView {
    pub fn from_flags(email_verified: bool, admin_approved: bool) -> Self {
        match (email_verified, admin_approved) {
            (true, true) => Self::Active,
            (false, true) => Self::ManuallyApproved,
            (true, false) => Self::AwaitingApproval,
            (false, false) => Self::AwaitingVerification,
        }
    }

    /// Whether the user may continue into the app.
    pub fn can_proceed(self) -> bool {
        matches!(self, Self::Active | Self::ManuallyApproved)
    }

    /// Only unverified users get a resend control.
    pub fn offers_resend(self) -> bool {
        self == Self::AwaitingVerification
    }

    pub fn title(self, language: Language) -> String {
        let key = match self {
            Self::Active => "pending.active",
            Self::ManuallyApproved => "pending.manuallyApproved",
            Self::AwaitingApproval => "pending.awaitingApproval",
            Self::AwaitingVerification => "pending.awaitingVerification",
        };
        t(language, key)
    }
}

/// Client-side countdown for the resend-verification control.
///
/// Nothing enforces it server-side; it only debounces the button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResendCooldown {
    remaining: u32,
}

impl ResendCooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the countdown after a resend.
    pub fn start(&mut self) {
        self.remaining = RESEND_COOLDOWN_SECS;
    }

    /// Advance one second. Returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn can_resend(&self) -> bool {
        self.remaining == 0
    }
}
