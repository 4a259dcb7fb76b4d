//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_ORIGIN: &str = "https://firebasestorage.googleapis.com";

/// Which document store implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted Firestore (or the emulator when `FIRESTORE_EMULATOR_HOST` is set).
    Firestore,
    /// Process-local store; data is lost on restart.
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(Self::Firestore),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", raw.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID; also the Firebase project whose ID tokens we accept
    pub gcp_project_id: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Store implementation
    pub store_backend: StoreBackend,

    /// Gemini API key. Captions fall back to a fixed string without it.
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini API base URL (overridable for tests and proxies)
    pub gemini_base_url: String,
    /// Origins the caption service may download photos from
    /// (`CAPTION_IMAGE_ORIGINS`, comma-separated). Empty disables remote images.
    pub caption_image_origins: Vec<String>,

    /// Shared HS256 secret accepted instead of Firebase RS256 tokens.
    /// Only ever set by tests.
    pub test_token_secret: Option<Vec<u8>>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            caption_image_origins: vec![DEFAULT_IMAGE_ORIGIN.to_string()],
            test_token_secret: Some(b"test_token_secret_32_bytes_min!!".to_vec()),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match var("STORE_BACKEND") {
            Some(raw) => StoreBackend::parse(&raw)?,
            None => StoreBackend::Firestore,
        };

        Ok(Self {
            gcp_project_id: var("GCP_PROJECT_ID").ok_or(ConfigError::Missing("GCP_PROJECT_ID"))?,
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            port: var("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080),
            store_backend,
            gemini_api_key: var("GEMINI_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            caption_image_origins: var("CAPTION_IMAGE_ORIGINS")
                .map(|v| parse_origin_list(&v))
                .unwrap_or_else(|| vec![DEFAULT_IMAGE_ORIGIN.to_string()]),
            test_token_secret: None,
        })
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|v| v.trim().trim_end_matches('/'))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
