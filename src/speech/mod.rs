//! Speech synthesis adapter.
//!
//! * [`SpeechSynthesizer`]: async trait: text + language code → audio bytes.
//! * [`TranslateTts`]: Google Translate TTS backend (MP3).
//! * [`speech_text`] / [`speak_instruction`]: pick what to say for a
//!   [`ClassificationResult`], never speaking an empty translation.

pub mod synth;

pub use synth::{chunk_text, SpeechError, SpeechSynthesizer, TranslateTts};

use crate::classify::{ClassificationResult, Language};

/// Text to synthesize for `result`.
///
/// Returns the model's translation when present, otherwise the fixed
/// fallback phrase for the result's target language (English when the code
/// is not in the selector table).
pub fn speech_text(result: &ClassificationResult) -> &str {
    let translated = result.translated_instruction.trim();
    if !translated.is_empty() {
        return translated;
    }
    let language = Language::from_code(&result.target_language_code).unwrap_or(Language::English);
    log::warn!(
        "speech: empty translation, speaking fallback phrase for {}",
        language.code()
    );
    language.fallback_phrase()
}

/// Synthesize the spoken instruction for `result`.
pub async fn speak_instruction(
    synth: &dyn SpeechSynthesizer,
    result: &ClassificationResult,
) -> Result<Vec<u8>, SpeechError> {
    synth
        .synthesize(speech_text(result), &result.target_language_code)
        .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
