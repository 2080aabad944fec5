//! Analysis orchestrator: drives one photo through prompt → model → parse →
//! speech.
//!
//! # Flow
//!
//! ```text
//! ImageUpload
//!   └─▶ PromptBuilder::build                       [Classifying]
//!         └─▶ ModelClient::generate
//!               ├─ Err → PipelineError::Model       [Failed]
//!               │        (Unavailable: log the models the key can use)
//!               └─ Ok  → ResponseParser::parse      [Parsing]
//!                          └─▶ speak_instruction    [Synthesizing]
//!                                ├─ Ok  → audio
//!                                └─ Err → warn, audio omitted
//!                          └─▶ AnalysisReport       [Done]
//! ```
//!
//! Only credential and model failures abort a request.  Parse degradations
//! and speech failures still produce a report.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::classify::{
    ClassificationResult, Language, PromptBuilder, ResponseParser, StyleDescriptor, Verbosity,
};
use crate::config::AppConfig;
use crate::model::{GeminiClient, ModelClient, ModelError, RetryingClient};
use crate::speech::{speak_instruction, SpeechSynthesizer, TranslateTts};

use super::state::AnalysisStage;
use super::upload::{ImageUpload, UploadError};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// User-visible failures of an analysis request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No API key was supplied; analysis is blocked.
    #[error("no API key supplied; set SMARTBIN_API_KEY or pass --api-key")]
    CredentialMissing,

    /// The photo could not be read or is not a supported image.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// The hosted model failed (unavailable, timeout, transport …).
    #[error(transparent)]
    Model(ModelError),
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::CredentialMissing => PipelineError::CredentialMissing,
            other => PipelineError::Model(other),
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisReport
// ---------------------------------------------------------------------------

/// Everything the presentation layer renders for one photo.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub result: ClassificationResult,
    pub style: StyleDescriptor,
    /// MP3 audio of the spoken instruction; `None` when speech is disabled
    /// or synthesis failed.
    #[serde(skip)]
    pub audio: Option<Vec<u8>>,
    /// Why audio is missing, when synthesis was attempted and failed.
    pub speech_error: Option<String>,
}

// ---------------------------------------------------------------------------
// Analyzer
// ---------------------------------------------------------------------------

/// Runs analysis requests.  Holds no per-request state, so one instance can
/// serve any number of photos.
pub struct Analyzer {
    model: Arc<dyn ModelClient>,
    speech: Option<Arc<dyn SpeechSynthesizer>>,
    prompt: PromptBuilder,
    parser: ResponseParser,
}

impl Analyzer {
    /// Create an analyzer from explicit adapters.
    ///
    /// * `speech`: `None` disables audio.
    pub fn new(
        model: Arc<dyn ModelClient>,
        speech: Option<Arc<dyn SpeechSynthesizer>>,
        language: Language,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            model,
            speech,
            prompt: PromptBuilder::for_language(language, verbosity),
            parser: ResponseParser::new(language),
        }
    }

    /// Build the production analyzer (Gemini + translate TTS) from config.
    ///
    /// Fails with [`PipelineError::CredentialMissing`] when no API key is
    /// configured.  A speech client that cannot be built disables audio
    /// rather than blocking analysis.
    pub fn from_config(config: &AppConfig) -> Result<Self, PipelineError> {
        let gemini = GeminiClient::from_config(&config.model)?;
        let model: Arc<dyn ModelClient> =
            Arc::new(RetryingClient::new(gemini, config.model.retries()));

        let speech: Option<Arc<dyn SpeechSynthesizer>> = if config.speech.enabled {
            match TranslateTts::from_config(&config.speech) {
                Ok(tts) => Some(Arc::new(tts)),
                Err(e) => {
                    log::warn!("speech disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self::new(model, speech, config.language, config.verbosity))
    }

    pub fn language(&self) -> Language {
        self.parser.language()
    }

    /// Analyze one photo, reporting each stage to `on_stage`.
    pub async fn analyze<F>(
        &self,
        upload: &ImageUpload,
        mut on_stage: F,
    ) -> Result<AnalysisReport, PipelineError>
    where
        F: FnMut(AnalysisStage) + Send,
    {
        let mut enter = |stage: AnalysisStage| {
            log::debug!("stage: {}", stage.label());
            on_stage(stage);
        };

        // ── 1. Model call ────────────────────────────────────────────────
        enter(AnalysisStage::Classifying);
        let prompt = self.prompt.build();
        let raw = match self
            .model
            .generate(&upload.bytes, &upload.mime_type, &prompt)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("analysis failed: {e}");
                if matches!(e, ModelError::Unavailable { .. }) {
                    self.log_available_models().await;
                }
                enter(AnalysisStage::Failed);
                return Err(e.into());
            }
        };
        log::debug!("model reply ({} chars)", raw.chars().count());

        // ── 2. Parse (never fails) ───────────────────────────────────────
        enter(AnalysisStage::Parsing);
        let result = self.parser.parse(&raw);
        let style = result.style();

        // ── 3. Speech (failure only omits audio) ─────────────────────────
        let mut audio = None;
        let mut speech_error = None;
        if let Some(speech) = &self.speech {
            enter(AnalysisStage::Synthesizing);
            match speak_instruction(speech.as_ref(), &result).await {
                Ok(bytes) => audio = Some(bytes),
                Err(e) => {
                    log::warn!("speech synthesis failed, audio omitted: {e}");
                    speech_error = Some(e.to_string());
                }
            }
        }

        enter(AnalysisStage::Done);
        Ok(AnalysisReport {
            result,
            style,
            audio,
            speech_error,
        })
    }

    /// Log which models the credential can use, so a wrong model name or
    /// a key without access is easy to tell apart.
    async fn log_available_models(&self) {
        match self.model.list_models().await {
            Ok(models) if models.is_empty() => {
                log::warn!("no models support generateContent for this API key")
            }
            Ok(models) => log::warn!(
                "models supporting generateContent for this API key: {}",
                models.join(", ")
            ),
            Err(e) => log::warn!("could not list models; the API key may be invalid: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
