//! Text-to-speech synthesis of the translated instruction.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::classify::Language;
use crate::config::SpeechConfig;

/// Longest text the translate TTS endpoint accepts per request.
const MAX_CHUNK_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors from the speech synthesis adapter.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// No voice exists for the requested language code.
    #[error("unsupported speech language: {0}")]
    UnsupportedLanguage(String),

    /// Empty/malformed text, or the service returned an error.
    #[error("speech synthesis failed: {0}")]
    SynthesisFailure(String),

    /// The request did not complete within the configured timeout.
    #[error("speech request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::SynthesisFailure(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechSynthesizer trait
// ---------------------------------------------------------------------------

/// Async interface to a speech service: text + language code → audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError>;
}

// ---------------------------------------------------------------------------
// TranslateTts
// ---------------------------------------------------------------------------

/// Google Translate TTS backend.  Returns MP3.
///
/// Long text is split into chunks of at most 200 characters on word
/// boundaries; the MP3 frames of each chunk are concatenated in order.
/// `timeout_secs` bounds the whole call, not each chunk.
pub struct TranslateTts {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl TranslateTts {
    pub fn from_config(config: &SpeechConfig) -> Result<Self, SpeechError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SpeechError::SynthesisFailure(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        language_code: &str,
        index: usize,
        total: usize,
    ) -> Result<Vec<u8>, SpeechError> {
        let url = format!("{}/translate_tts", self.base_url);
        let idx = index.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language_code),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::SynthesisFailure(format!(
                "TTS service returned {status}"
            )));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(SpeechError::SynthesisFailure(
                "TTS service returned no audio".into(),
            ));
        }
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for TranslateTts {
    async fn synthesize(&self, text: &str, language_code: &str) -> Result<Vec<u8>, SpeechError> {
        let language = Language::from_code(language_code)
            .ok_or_else(|| SpeechError::UnsupportedLanguage(language_code.to_string()))?;

        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::SynthesisFailure("no text to speak".into()));
        }

        log::debug!(
            "speech: synthesizing {} chunk(s) in {}",
            chunks.len(),
            language.name()
        );

        within(self.timeout, async {
            let mut audio = Vec::new();
            for (index, chunk) in chunks.iter().enumerate() {
                let bytes = self
                    .fetch_chunk(chunk, language.code(), index, chunks.len())
                    .await?;
                audio.extend_from_slice(&bytes);
            }
            Ok::<_, SpeechError>(audio)
        })
        .await
    }
}

/// Run `work` under one overall deadline; expiry is [`SpeechError::Timeout`].
async fn within<T, F>(limit: Duration, work: F) -> Result<T, SpeechError>
where
    F: Future<Output = Result<T, SpeechError>>,
{
    tokio::time::timeout(limit, work)
        .await
        .map_err(|_| SpeechError::Timeout)?
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split `text` into whitespace-normalised chunks of at most `max_chars`
/// characters, breaking between words.  A single word longer than
/// `max_chars` is hard-split on character boundaries.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
