//! Core `ModelClient` trait and `GeminiClient` implementation.
//!
//! `GeminiClient` calls the Generative Language `generateContent` endpoint
//! with the prompt as a text part and the photo as a base64 `inlineData`
//! part.  All connection details come from [`ModelConfig`].

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ModelConfig;

// ---------------------------------------------------------------------------
// ModelError
// ---------------------------------------------------------------------------

/// Errors that can occur while asking the hosted model for a reply.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No API key was supplied.
    #[error("no API key supplied; set SMARTBIN_API_KEY or pass --api-key")]
    CredentialMissing,

    /// The service rejected the request (bad key, quota, unknown model …).
    #[error("model unavailable ({status}): {message}")]
    Unavailable { status: u16, message: String },

    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse model response: {0}")]
    Parse(String),

    /// The model returned no usable text (e.g. blocked by safety filters).
    #[error("model returned an empty response")]
    EmptyResponse,
}

impl ModelError {
    /// Whether a bounded retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelError::Timeout | ModelError::Request(_))
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ModelError::Timeout
        } else {
            ModelError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ModelClient trait
// ---------------------------------------------------------------------------

/// Async interface to a hosted multimodal model.
///
/// Implementors must be `Send + Sync` so they can be shared behind
/// `Arc<dyn ModelClient>`.
///
/// # Arguments
/// * `image`     – Raw image bytes.
/// * `mime_type` – MIME type of `image` (`image/jpeg`, `image/png` …).
/// * `prompt`    – Instruction text from [`PromptBuilder`](crate::classify::PromptBuilder).
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, image: &[u8], mime_type: &str, prompt: &str)
        -> Result<String, ModelError>;

    /// Names of the models this credential can call `generateContent` on.
    ///
    /// Used to diagnose [`ModelError::Unavailable`].  Backends without a
    /// catalogue return an empty list.
    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

// ---------------------------------------------------------------------------
// GeminiClient
// ---------------------------------------------------------------------------

/// Calls `{base_url}/v1beta/models/{model}:generateContent`.
pub struct GeminiClient {
    client: reqwest::Client,
    config: ModelConfig,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Build a client from config.
    ///
    /// Fails with [`ModelError::CredentialMissing`] when the config carries
    /// no non-blank API key; analysis must not start without one.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ModelError> {
        let api_key = config
            .credential()
            .ok_or(ModelError::CredentialMissing)?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Request(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn models_endpoint(&self) -> String {
        format!("{}/v1beta/models", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: 512,
            },
        };

        log::debug!(
            "model: POST {} ({} image bytes, {mime_type})",
            self.endpoint(),
            image.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Unavailable {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let text = response.text().await?;
        extract_text(&text)
    }

    async fn list_models(&self) -> Result<Vec<String>, ModelError> {
        let response = self
            .client
            .get(self.models_endpoint())
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ModelError::Unavailable {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let text = response.text().await?;
        generate_capable_models(&text)
    }
}

/// Names of the models in a `models.list` body that support
/// `generateContent`.
fn generate_capable_models(body: &str) -> Result<Vec<String>, ModelError> {
    let parsed: ModelList =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;
    Ok(parsed
        .models
        .into_iter()
        .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
        .map(|m| m.name)
        .collect())
}

/// Pull the concatenated text parts of the first candidate out of a
/// `generateContent` response body.
fn extract_text(body: &str) -> Result<String, ModelError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::EmptyResponse);
    }
    Ok(text)
}

/// Best-effort human-readable message from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
