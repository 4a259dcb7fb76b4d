// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Food photo captioning via the Gemini API.
//!
//! Handles:
//! - Normalizing the image (data URL, remote URL or raw base64) to inline base64
//! - One `generateContent` call per caption
//! - Falling back to a fixed string on any failure

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Returned whenever a caption cannot be produced.
pub const FALLBACK_DESCRIPTION: &str = "Could not generate description.";

const DEFAULT_MIME_TYPE: &str = "image/jpeg";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const IMAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Largest photo the service will download; matches the caption route's body limit.
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;

/// Where the photo comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Inline(InlineImage),
    /// Fetched and re-encoded before the model call, if its origin is allowed.
    Remote(String),
}

/// Image payload as the model expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64, no data-URL prefix
    pub data: String,
}

impl ImageSource {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();

        if raw.starts_with("blob:") {
            return Err(AppError::BadRequest(
                "blob references are local to the browser; send a data URL".to_string(),
            ));
        }

        if raw.starts_with("https://") || raw.starts_with("http://") {
            return Ok(Self::Remote(raw.to_string()));
        }

        let (mime_type, data) = match raw.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest
                    .split_once(',')
                    .ok_or_else(|| AppError::BadRequest("malformed data URL".to_string()))?;
                let mime_type = header.strip_suffix(";base64").ok_or_else(|| {
                    AppError::BadRequest("data URL is not base64-encoded".to_string())
                })?;
                let mime_type = if mime_type.is_empty() {
                    DEFAULT_MIME_TYPE
                } else {
                    mime_type
                };
                (mime_type, data)
            }
            None => (DEFAULT_MIME_TYPE, raw),
        };

        if data.is_empty() || STANDARD.decode(data).is_err() {
            return Err(AppError::BadRequest("image is not valid base64".to_string()));
        }

        Ok(Self::Inline(InlineImage {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        }))
    }
}

/// Prompt sent alongside the photo.
pub fn build_prompt(comment: &str, restaurant_name: &str) -> String {
    let comment = comment.trim();
    let comment = if comment.is_empty() {
        "(no comment)"
    } else {
        comment
    };
    format!(
        "You are a friendly food critic. Look at this dish from the restaurant \
         \"{restaurant_name}\" and write a short, appetizing description of it in \
         one or two sentences. The diner's own notes: \"{comment}\". \
         Reply with the description only."
    )
}

/// A multimodal model that can describe an image.
#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn describe(&self, image: &InlineImage, prompt: &str) -> Result<String, AppError>;
}

// ─── Gemini ──────────────────────────────────────────────────

/// Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {e}")))?;
        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Concatenated text of the first candidate.
fn extract_text(body: &str) -> Result<String, AppError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AppError::Upstream(format!("Gemini JSON parse error: {e}")))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Upstream("Gemini returned no text".to_string()));
    }
    Ok(text.to_string())
}

#[async_trait]
impl CaptionModel for GeminiClient {
    async fn describe(&self, image: &InlineImage, prompt: &str) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.data,
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Gemini response read failed: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!("Gemini HTTP {status}: {text}")));
        }

        extract_text(&text)
    }
}

// ─── Remote images ───────────────────────────────────────────

/// Downloads photos from an allowlist of storage origins.
#[derive(Clone)]
pub struct ImageFetcher {
    http: reqwest::Client,
    allowed_origins: Vec<String>,
    max_bytes: usize,
}

impl ImageFetcher {
    /// `allowed_origins` are `scheme://host[:port]` strings. Redirects are
    /// not followed, so a response can never lead outside the allowlist.
    pub fn new(allowed_origins: &[String]) -> Result<Self, AppError> {
        let allowed_origins = allowed_origins
            .iter()
            .map(|raw| {
                reqwest::Url::parse(raw)
                    .map(|url| url.origin().ascii_serialization())
                    .map_err(|e| {
                        AppError::Internal(anyhow::anyhow!("invalid image origin {raw:?}: {e}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let http = reqwest::Client::builder()
            .timeout(IMAGE_FETCH_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client build failed: {e}")))?;

        Ok(Self {
            http,
            allowed_origins,
            max_bytes: MAX_IMAGE_BYTES,
        })
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn check_url(&self, raw: &str) -> Result<reqwest::Url, AppError> {
        let url = reqwest::Url::parse(raw)
            .map_err(|_| AppError::BadRequest("malformed image URL".to_string()))?;
        let origin = url.origin().ascii_serialization();
        if !self.allowed_origins.contains(&origin) {
            return Err(AppError::BadRequest(format!(
                "image origin {origin} is not allowed"
            )));
        }
        Ok(url)
    }

    /// Download an image and re-encode it as base64.
    pub async fn fetch(&self, raw_url: &str) -> Result<InlineImage, AppError> {
        let url = self.check_url(raw_url)?;

        let mut response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("image fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "image fetch returned {}",
                response.status()
            )));
        }

        let too_large =
            || AppError::BadRequest(format!("image exceeds {} bytes", self.max_bytes));

        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes as u64)
        {
            return Err(too_large());
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AppError::Upstream(format!("image read failed: {e}")))?
        {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(InlineImage {
            mime_type,
            data: STANDARD.encode(&bytes),
        })
    }
}

// ─── Service ─────────────────────────────────────────────────

/// Caption generation with a guaranteed answer.
#[derive(Clone)]
pub struct CaptionService {
    model: Option<Arc<dyn CaptionModel>>,
    fetcher: Option<ImageFetcher>,
}

impl CaptionService {
    /// Service that only accepts inline images.
    pub fn new(model: Option<Arc<dyn CaptionModel>>) -> Self {
        Self {
            model,
            fetcher: None,
        }
    }

    pub fn with_image_fetcher(mut self, fetcher: ImageFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Gemini-backed service, or one that always falls back when no API
    /// key is configured.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let model: Option<Arc<dyn CaptionModel>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )?)),
            None => {
                tracing::warn!("GEMINI_API_KEY not set; captions will use the fallback text");
                None
            }
        };

        let service = Self::new(model);
        if config.caption_image_origins.is_empty() {
            return Ok(service);
        }
        Ok(service.with_image_fetcher(ImageFetcher::new(&config.caption_image_origins)?))
    }

    /// Describe a food photo. Never fails: errors are logged and replaced
    /// by [`FALLBACK_DESCRIPTION`].
    pub async fn generate_food_description(
        &self,
        image: &str,
        comment: &str,
        restaurant_name: &str,
    ) -> String {
        match self.try_generate(image, comment, restaurant_name).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, restaurant = restaurant_name, "Caption generation failed");
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }

    async fn try_generate(
        &self,
        image: &str,
        comment: &str,
        restaurant_name: &str,
    ) -> Result<String, AppError> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| AppError::Upstream("no caption model configured".to_string()))?;

        let image = match ImageSource::parse(image)? {
            ImageSource::Inline(inline) => inline,
            ImageSource::Remote(url) => {
                let fetcher = self.fetcher.as_ref().ok_or_else(|| {
                    AppError::BadRequest("remote images are not enabled".to_string())
                })?;
                fetcher.fetch(&url).await?
            }
        };

        let prompt = build_prompt(comment, restaurant_name);
        let text = model.describe(&image, &prompt).await?;

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Upstream("empty caption".to_string()));
        }
        Ok(text.to_string())
    }
}
