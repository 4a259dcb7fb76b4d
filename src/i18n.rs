// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Translations for the few strings the server writes itself.
//!
//! The web client owns the bulk of the UI text. The server only needs
//! translated text for notification messages it stores and for labels it
//! returns in API responses.

use serde::{Deserialize, Serialize};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    #[default]
    En,
    ZhTw,
}

impl Language {
    /// Pick a language from an `Accept-Language` header value.
    ///
    /// Tags are checked in the order given (quality weights are ignored);
    /// the first supported one wins.
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::default();
        };

        for tag in header.split(',') {
            let tag = tag.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            if tag.starts_with("zh") {
                return Self::ZhTw;
            }
            if tag.starts_with("en") {
                return Self::En;
            }
        }

        Self::default()
    }
}

/// Look up a translated string. Unknown keys come back unchanged.
pub fn t(language: Language, key: &str) -> String {
    let text = match (language, key) {
        (Language::En, "notification.approved") => {
            "Your account has been approved. Welcome to TraceBook!"
        }
        (Language::ZhTw, "notification.approved") => "您的帳號已通過審核，歡迎使用 TraceBook！",
        (Language::En, "notification.manualApproved") => {
            "An administrator approved your account. You can start using TraceBook now."
        }
        (Language::ZhTw, "notification.manualApproved") => "管理員已核准您的帳號，現在就可以開始使用 TraceBook。",
        (Language::En, "notification.rejected") => "Your account request was not approved.",
        (Language::ZhTw, "notification.rejected") => "您的帳號申請未獲核准。",

        (Language::En, "pending.awaitingVerification") => "Please verify your email",
        (Language::ZhTw, "pending.awaitingVerification") => "請驗證您的電子郵件",
        (Language::En, "pending.awaitingApproval") => "Waiting for administrator approval",
        (Language::ZhTw, "pending.awaitingApproval") => "等待管理員審核",
        (Language::En, "pending.manuallyApproved") => "Your account was approved. You may proceed.",
        (Language::ZhTw, "pending.manuallyApproved") => "您的帳號已獲核准，可以繼續使用。",
        (Language::En, "pending.active") => "Your account is active",
        (Language::ZhTw, "pending.active") => "您的帳號已啟用",

        (Language::En, "provider.google") => "Google",
        (Language::ZhTw, "provider.google") => "Google",
        (Language::En, "provider.apple") => "Apple",
        (Language::ZhTw, "provider.apple") => "Apple",
        (Language::En, "provider.email") => "Email",
        (Language::ZhTw, "provider.email") => "電子郵件",

        _ => return key.to_string(),
    };
    text.to_string()
}
